// src/cli.rs
//! CLI definitions for the chumweb generator
//!
//! Every option can also be given as a `CHUM_*` environment variable, which
//! is how CI jobs pass the OBS credentials.

use chumweb::Config;
use chumweb::config::{
    DEFAULT_FEED_ENTRIES, DEFAULT_OBS_PROJECT, DEFAULT_OBS_URL, DEFAULT_PUBLIC_URL,
    DEFAULT_REPO_URL_PREFIX, DEFAULT_USER_AGENT,
};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chumweb")]
#[command(version)]
#[command(about = "Generate the SailfishOS:Chum package web site from repository metadata", long_about = None)]
pub struct Cli {
    /// OBS user, needed to list the repositories of the project
    #[arg(long, env = "CHUM_OBS_USER")]
    pub obs_user: Option<String>,

    /// OBS password
    #[arg(long, env = "CHUM_OBS_PASS", hide_env_values = true)]
    pub obs_pass: Option<String>,

    /// Output directory for downloaded indexes and the site
    #[arg(short, long, env = "CHUM_OUT_DIR", default_value = "out/")]
    pub out_dir: PathBuf,

    /// Repositories to process, e.g. 4.5.0.24_aarch64 (comma-separated).
    /// Without this the newest repositories of the OBS project are used.
    #[arg(long, env = "CHUM_REPOS", value_delimiter = ',')]
    pub repos: Vec<String>,

    /// OBS API root
    #[arg(long, env = "CHUM_OBS_URL", default_value = DEFAULT_OBS_URL)]
    pub obs_url: String,

    /// OBS project to list repositories of
    #[arg(long, env = "CHUM_OBS_PROJECT", default_value = DEFAULT_OBS_PROJECT)]
    pub obs_project: String,

    /// URL prefix the repositories are served from
    #[arg(long, env = "CHUM_REPO_URL_PREFIX", default_value = DEFAULT_REPO_URL_PREFIX)]
    pub repo_url_prefix: String,

    /// Enable debug logging
    #[arg(long, env = "CHUM_DEBUG")]
    pub debug: bool,

    /// URL the site will be published at
    #[arg(long, env = "CHUM_PUBLIC_URL", default_value = DEFAULT_PUBLIC_URL)]
    pub public_url: String,

    /// Fetch long descriptions linked from package metadata
    #[arg(
        long,
        env = "CHUM_DOWNLOAD_EXTRA_METADATA",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub download_extra_metadata: bool,

    /// Read {repo}-primary.xml.gz and {repo}-other.xml.gz from this directory
    /// instead of downloading them
    #[arg(long, env = "CHUM_REPO_DATA_DIR")]
    pub repo_data_dir: Option<PathBuf>,

    /// User agent for HTTP requests
    #[arg(long, env = "CHUM_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Number of entries in the Atom feeds
    #[arg(long, env = "CHUM_FEED_ENTRIES_COUNT", default_value_t = DEFAULT_FEED_ENTRIES)]
    pub feed_entries_count: usize,

    /// Path of the Markdown job summary
    #[arg(long, env = "CHUM_JOB_SUMMARY", default_value = "out/summary.md")]
    pub job_summary: PathBuf,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            obs_user: cli.obs_user,
            obs_pass: cli.obs_pass,
            out_dir: cli.out_dir,
            repos: cli.repos.into_iter().filter(|repo| !repo.is_empty()).collect(),
            obs_url: cli.obs_url,
            obs_project: cli.obs_project,
            repo_url_prefix: cli.repo_url_prefix,
            debug: cli.debug,
            public_url: cli.public_url,
            download_extra_metadata: cli.download_extra_metadata,
            repo_data_dir: cli.repo_data_dir,
            user_agent: cli.user_agent,
            feed_entries_count: cli.feed_entries_count,
            job_summary: cli.job_summary,
        }
    }
}
