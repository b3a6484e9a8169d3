// src/repository/download.rs

//! Repository index download
//!
//! Every repository advertises its index files in `repodata/repomd.xml`. The
//! `primary` (package records) and `other` (changelogs) indexes are fetched
//! and stored as `{repo}-{type}.xml.gz`, the same layout a local data
//! directory uses, so a previous run's output can be fed back in with
//! `--repo-data-dir`.

use super::client::RepositoryClient;
use super::parsers::parse_repomd;
use crate::error::Result;
use crate::progress::ProgressTracker;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Index types downloaded for every repository
const INDEX_TYPES: [&str; 2] = ["primary", "other"];

/// Local paths of the index files of one repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoDataPaths {
    /// `None` if the repository has no package index
    pub primary: Option<PathBuf>,
    /// `None` if the repository has no changelogs
    pub other: Option<PathBuf>,
}

/// File name of a cached index, e.g. `4.5.0.24_aarch64-primary.xml.gz`
pub fn index_file_name(repo_name: &str, index_type: &str) -> String {
    format!("{repo_name}-{index_type}.xml.gz")
}

/// Download the primary and other indexes of a repository into `out_dir`
///
/// `repo_url` is the repository root and must end with a `/`.
pub fn save_repo_data(
    client: &RepositoryClient,
    repo_url: &str,
    repo_name: &str,
    out_dir: &Path,
    progress: &dyn ProgressTracker,
) -> Result<RepoDataPaths> {
    let repomd_url = format!("{repo_url}repodata/repomd.xml");
    let repomd = client.download_to_bytes(&repomd_url)?;
    let locations = parse_repomd(repomd.as_slice(), &repomd_url)?;

    let mut paths = RepoDataPaths::default();
    for index_type in INDEX_TYPES {
        let Some(href) = locations.get(index_type) else {
            debug!("{} advertises no {} index", repo_name, index_type);
            continue;
        };

        let dest = out_dir.join(index_file_name(repo_name, index_type));
        let display_name = format!("{repo_name} {index_type}");
        let bar = progress.download_bar(&display_name);
        client.download_file_with_progress(
            &format!("{repo_url}{href}"),
            &dest,
            &display_name,
            bar.as_ref(),
        )?;

        match index_type {
            "primary" => paths.primary = Some(dest),
            _ => paths.other = Some(dest),
        }
    }

    if paths.primary.is_none() {
        warn!("Repository {} has no primary index, skipping its packages", repo_name);
    }

    Ok(paths)
}

/// Index files of a repository in a local data directory
///
/// A missing `other` index is left out; a missing `primary` index is
/// reported when it is opened.
pub fn local_repo_data(data_dir: &Path, repo_name: &str) -> RepoDataPaths {
    let other = data_dir.join(index_file_name(repo_name, "other"));
    RepoDataPaths {
        primary: Some(data_dir.join(index_file_name(repo_name, "primary"))),
        other: other.exists().then_some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_index_file_name() {
        assert_eq!(
            index_file_name("4.5.0.24_aarch64", "primary"),
            "4.5.0.24_aarch64-primary.xml.gz"
        );
    }

    #[test]
    fn test_local_repo_data() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("4.5.0.24_i486-primary.xml.gz"), b"").unwrap();

        let paths = local_repo_data(dir.path(), "4.5.0.24_i486");
        assert_eq!(
            paths.primary,
            Some(dir.path().join("4.5.0.24_i486-primary.xml.gz"))
        );
        assert_eq!(paths.other, None);

        fs::write(dir.path().join("4.5.0.24_i486-other.xml.gz"), b"").unwrap();
        let paths = local_repo_data(dir.path(), "4.5.0.24_i486");
        assert_eq!(paths.other, Some(dir.path().join("4.5.0.24_i486-other.xml.gz")));
    }
}
