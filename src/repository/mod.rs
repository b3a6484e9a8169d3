// src/repository/mod.rs

//! Repository loading
//!
//! This module provides functionality for:
//! - Listing the repositories of an OBS project and picking the newest ones
//! - Downloading (or reading cached) repository indexes
//! - Building package records per repository and linking debug packages
//! - Merging the repositories into one list of packages by name
//! - Fetching long descriptions hosted elsewhere

mod client;
mod download;
mod remote;

pub mod parsers;
pub mod selector;

pub use client::{Credentials, RepositoryClient};
pub use download::{index_file_name, local_repo_data, save_repo_data, RepoDataPaths};
pub use remote::{load_remote_descriptions, render_markdown};
pub use selector::{filter_newest_repos, repo_arch, repo_version};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::packages::{link_debug_packages, Package, PackageMap};
use crate::progress::ProgressTracker;
use parsers::{open_gzip, parse_other, parse_primary};
use std::collections::btree_map::Entry;
use std::fs;
use tracing::{debug, info};

/// All packages of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepoInfo {
    /// Packages sorted by name, one per name
    pub packages: Vec<Package>,
    /// Repositories the packages were read from
    pub repos: Vec<String>,
    /// Version prefix of the first repository, e.g. `4.5.0.24`
    pub version: String,
}

impl RepoInfo {
    /// Architecture of every repository, in repository order
    pub fn repo_archs(&self) -> Vec<&str> {
        self.repos.iter().filter_map(|repo| repo_arch(repo)).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages
            .binary_search_by(|package| package.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.packages[index])
    }

    /// The `-debuginfo` package of `package`
    pub fn debuginfo_of(&self, package: &Package) -> Option<&Package> {
        package.debuginfo_package.as_deref().and_then(|name| self.get(name))
    }

    /// The `-debugsource` package of `package`
    pub fn debugsource_of(&self, package: &Package) -> Option<&Package> {
        package.debugsource_package.as_deref().and_then(|name| self.get(name))
    }
}

/// Add `package` to `packages`, folding it into an existing record of the
/// same name
fn insert_or_merge(packages: &mut PackageMap, package: Package) {
    match packages.entry(package.name.clone()) {
        Entry::Vacant(entry) => {
            entry.insert(package);
        }
        Entry::Occupied(mut entry) => entry.get_mut().merge_arch(&package),
    }
}

/// Build the packages of one repository from its index files
///
/// Duplicate records of a name are merged, changelogs are attached by name.
pub fn read_repo_data(repo: &str, paths: &RepoDataPaths) -> Result<PackageMap> {
    let mut packages = PackageMap::new();

    let Some(primary) = paths.primary.as_deref() else {
        return Ok(packages);
    };
    let source = primary.display().to_string();
    for node in parse_primary(open_gzip(primary)?, &source)? {
        insert_or_merge(&mut packages, Package::from_node(&node, repo));
    }

    if let Some(other) = paths.other.as_deref() {
        let source = other.display().to_string();
        for changelog in parse_other(open_gzip(other)?, &source)? {
            match packages.get_mut(&changelog.name) {
                Some(package) => package.changelog_entries = changelog.entries,
                None => debug!("Changelog for unknown package {} in {}", changelog.name, repo),
            }
        }
    }

    Ok(packages)
}

/// Repositories to process: the configured list, or the newest repositories
/// of the OBS project
fn select_repos(
    config: &Config,
    client: &RepositoryClient,
    progress: &dyn ProgressTracker,
) -> Result<Vec<String>> {
    if !config.repos.is_empty() {
        return Ok(config.repos.clone());
    }

    progress.begin_step("Listing repositories");
    let credentials = config.credentials().ok_or_else(|| {
        Error::ConfigError("An OBS user is needed to list repositories".to_string())
    })?;
    let all = client.list_obs_project_repos(&config.obs_url, &config.obs_project, &credentials)?;
    let newest = filter_newest_repos(&all)?;
    info!("Selected {} of {} repositories", newest.len(), all.len());
    Ok(newest)
}

/// Load, link and merge the packages of all repositories
pub fn load_repo(
    config: &Config,
    client: &RepositoryClient,
    progress: &dyn ProgressTracker,
) -> Result<RepoInfo> {
    let repos = select_repos(config, client, progress)?;

    let paths: Vec<RepoDataPaths> = match config.repo_data_dir.as_deref() {
        Some(data_dir) => repos
            .iter()
            .map(|repo| local_repo_data(data_dir, repo))
            .collect(),
        None => {
            fs::create_dir_all(&config.out_dir).map_err(|e| {
                Error::InitError(format!(
                    "Failed to create {}: {}",
                    config.out_dir.display(),
                    e
                ))
            })?;
            let step = progress.begin_step("Downloading repository data");
            let mut paths = Vec::with_capacity(repos.len());
            for (position, repo) in repos.iter().enumerate() {
                progress.step_progress(step, repo, position, repos.len());
                paths.push(save_repo_data(
                    client,
                    &config.repo_url(repo),
                    repo,
                    &config.out_dir,
                    progress,
                )?);
            }
            paths
        }
    };

    let step = progress.begin_step("Parsing repository data");
    let mut merged = PackageMap::new();
    for (position, (repo, repo_paths)) in repos.iter().zip(&paths).enumerate() {
        progress.step_progress(step, repo, position, repos.len());

        let mut packages = read_repo_data(repo, repo_paths)?;
        link_debug_packages(&mut packages)?;
        info!("Read {} packages from {}", packages.len(), repo);

        for package in packages.into_values() {
            insert_or_merge(&mut merged, package);
        }
    }

    let mut packages: Vec<Package> = merged.into_values().collect();
    if config.download_extra_metadata {
        load_remote_descriptions(&mut packages, client, progress);
    }

    let version = repos
        .first()
        .map(|repo| repo_version(repo).to_string())
        .unwrap_or_default();

    Ok(RepoInfo {
        packages,
        repos,
        version,
    })
}
