// src/config.rs

//! Run configuration
//!
//! Filled in from the command line (see the binary's `cli` module) or built
//! directly in tests.

use crate::error::{Error, Result};
use crate::repository::Credentials;
use std::path::PathBuf;

pub const DEFAULT_OBS_URL: &str = "https://build.sailfishos.org/";
pub const DEFAULT_OBS_PROJECT: &str = "sailfishos:chum";
pub const DEFAULT_REPO_URL_PREFIX: &str = "https://repo.sailfishos.org/obs/sailfishos:/chum/";
pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:8000/";
pub const DEFAULT_USER_AGENT: &str = "chumweb/1.0";
pub const DEFAULT_FEED_ENTRIES: usize = 20;

/// Settings of one generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub obs_user: Option<String>,
    pub obs_pass: Option<String>,
    /// Downloaded indexes go here, the web site into `{out_dir}/www`
    pub out_dir: PathBuf,
    /// Repositories to process; empty means "list them on OBS"
    pub repos: Vec<String>,
    pub obs_url: String,
    pub obs_project: String,
    /// Repository `{repo}` is served from `{repo_url_prefix}{repo}/`
    pub repo_url_prefix: String,
    pub debug: bool,
    /// Where the generated site will be reachable
    pub public_url: String,
    /// Fetch long descriptions from `Custom.DescriptionMD`
    pub download_extra_metadata: bool,
    /// Read `{repo}-primary.xml.gz` and `{repo}-other.xml.gz` from here
    /// instead of downloading them
    pub repo_data_dir: Option<PathBuf>,
    pub user_agent: String,
    pub feed_entries_count: usize,
    pub job_summary: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            obs_user: None,
            obs_pass: None,
            out_dir: PathBuf::from("out/"),
            repos: Vec::new(),
            obs_url: DEFAULT_OBS_URL.to_string(),
            obs_project: DEFAULT_OBS_PROJECT.to_string(),
            repo_url_prefix: DEFAULT_REPO_URL_PREFIX.to_string(),
            debug: false,
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            download_extra_metadata: true,
            repo_data_dir: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            feed_entries_count: DEFAULT_FEED_ENTRIES,
            job_summary: PathBuf::from("out/summary.md"),
        }
    }
}

impl Config {
    /// Check that the repositories can be determined
    pub fn validate(&self) -> Result<()> {
        if self.repos.is_empty() && self.obs_user.is_none() {
            return Err(Error::ConfigError(
                "Either a list of repositories or an OBS user must be given".to_string(),
            ));
        }
        Ok(())
    }

    /// OBS login, if a user is configured
    pub fn credentials(&self) -> Option<Credentials> {
        self.obs_user.as_ref().map(|user| Credentials {
            user: user.clone(),
            password: self.obs_pass.clone(),
        })
    }

    /// Value of the `User-Agent` header
    pub fn user_agent_header(&self) -> String {
        format!("{} ({}/about-generator.html)", self.user_agent, self.public_url)
    }

    /// Root directory of the generated site
    pub fn www_dir(&self) -> PathBuf {
        self.out_dir.join("www")
    }

    /// Root URL of repository `repo`
    pub fn repo_url(&self, repo: &str) -> String {
        format!("{}{}/", self.repo_url_prefix, repo)
    }
}
