// src/repository/selector.rs

//! Repository selection
//!
//! Repositories are named `{version}_{arch}`, e.g. `4.5.0.24_aarch64`. A
//! project usually builds for several SailfishOS versions at once; only the
//! repositories of the newest version are published.

use crate::error::{Error, Result};
use std::cmp::Ordering;

/// Architecture suffix of a repository name (text after the first `_`)
///
/// Versions never contain `_`, architectures may: `4.5.0.24_x86_64`.
pub fn repo_arch(repo: &str) -> Option<&str> {
    repo.split_once('_').map(|(_, arch)| arch)
}

/// Version prefix of a repository name (text before the first `_`)
pub fn repo_version(repo: &str) -> &str {
    repo.split('_').next().unwrap_or(repo)
}

/// Numeric components of the version prefix of `repo`
fn version_components(repo: &str) -> Result<Vec<u64>> {
    repo_version(repo)
        .split('.')
        .map(|part| {
            part.parse::<u64>()
                .map_err(|_| Error::InvalidRepoName(repo.to_string()))
        })
        .collect()
}

/// Compare the versions of two repositories
///
/// Components are compared pairwise over the length of the shorter version;
/// the first differing component decides. Extra trailing components of the
/// longer version are not looked at, so `4.5` and `4.5.1` compare equal.
fn compare_versions(left: &[u64], right: &[u64]) -> Ordering {
    left.iter()
        .zip(right)
        .map(|(l, r)| l.cmp(r))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Keep only the repositories carrying the newest version
///
/// The architecture is ignored for the comparison; on equal versions the
/// earlier repository wins. The result keeps the input order.
///
/// ```
/// use chumweb::repository::filter_newest_repos;
///
/// let repos = ["4.5.0.24_i486", "4.5.0.24_aarch64", "4.4.0.72_i486"].map(String::from);
/// let newest = filter_newest_repos(&repos).unwrap();
/// assert_eq!(newest, vec!["4.5.0.24_i486", "4.5.0.24_aarch64"]);
/// ```
pub fn filter_newest_repos(repos: &[String]) -> Result<Vec<String>> {
    let mut newest: Option<(&String, Vec<u64>)> = None;

    for repo in repos {
        let version = version_components(repo)?;
        newest = match newest {
            Some((best, best_version))
                if compare_versions(&best_version, &version) != Ordering::Less =>
            {
                Some((best, best_version))
            }
            _ => Some((repo, version)),
        };
    }

    let Some((newest, _)) = newest else {
        return Ok(Vec::new());
    };
    let prefix = format!("{}_", repo_version(newest));

    Ok(repos
        .iter()
        .filter(|repo| repo.starts_with(&prefix))
        .cloned()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(repos: &[&str]) -> Vec<String> {
        repos.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_repo_arch_and_version() {
        assert_eq!(repo_arch("4.5.0.24_aarch64"), Some("aarch64"));
        assert_eq!(repo_arch("4.5.0.24_armv7hl"), Some("armv7hl"));
        assert_eq!(repo_arch("4.5.0.24_x86_64"), Some("x86_64"));
        assert_eq!(repo_arch("noversion"), None);
        assert_eq!(repo_version("4.5.0.24_aarch64"), "4.5.0.24");
    }

    #[test]
    fn test_filter_newest_repos() {
        let repos = names(&["4.5.0.24_i486", "4.5.0.24_aarch64", "4.4.0.72_i486"]);
        assert_eq!(
            filter_newest_repos(&repos).unwrap(),
            names(&["4.5.0.24_i486", "4.5.0.24_aarch64"])
        );
    }

    #[test]
    fn test_newest_not_first() {
        let repos = names(&[
            "4.4.0.72_i486",
            "4.4.0.72_aarch64",
            "4.6.0.13_aarch64",
            "4.5.0.24_aarch64",
        ]);
        assert_eq!(filter_newest_repos(&repos).unwrap(), names(&["4.6.0.13_aarch64"]));
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let repos = names(&["4.10.0.1_i486", "4.9.0.1_i486"]);
        assert_eq!(filter_newest_repos(&repos).unwrap(), names(&["4.10.0.1_i486"]));
    }

    #[test]
    fn test_unequal_length_versions_keep_left() {
        // Only the shared prefix is compared, so these tie and the first wins
        let repos = names(&["4.5_aarch64", "4.5.1_aarch64"]);
        assert_eq!(filter_newest_repos(&repos).unwrap(), names(&["4.5_aarch64"]));

        let repos = names(&["4.5.1_aarch64", "4.5_aarch64"]);
        assert_eq!(filter_newest_repos(&repos).unwrap(), names(&["4.5.1_aarch64"]));
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_newest_repos(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_non_numeric_version_is_rejected() {
        let repos = names(&["latest_aarch64"]);
        assert!(matches!(
            filter_newest_repos(&repos),
            Err(Error::InvalidRepoName(name)) if name == "latest_aarch64"
        ));
    }
}
