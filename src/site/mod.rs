// src/site/mod.rs

//! Site output
//!
//! Writes the machine-readable parts of the web site into `{out_dir}/www`:
//! the package lists, the search documents and index, and the Atom feeds.
//! The job summary goes to its own path. HTML pages are rendered from these
//! by the site templates.

pub mod feed;
pub mod lists;
pub mod search;
pub mod summary;

pub use feed::{Feed, render_feed};
pub use lists::{CATEGORY_PAGES, ListFilter, PackageIndex, PackageLists, write_package_lists};
pub use search::{SearchDocument, build_search_index, write_search_documents, write_search_index};
pub use summary::{MarkdownWriter, render_job_summary, write_job_summary};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::packages::Package;
use crate::progress::ProgressTracker;
use crate::repository::RepoInfo;
use chrono::Utc;
use std::fs;
use std::path::Path;
use tracing::info;

const GENERATION_TASKS: usize = 6;

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| Error::IoError(format!("Failed to create directory {}: {e}", path.display())))
}

/// Non-debug packages ordered by case-insensitive title
pub fn listed_packages(repo: &RepoInfo) -> Vec<&Package> {
    let mut listed: Vec<&Package> = repo.packages.iter().filter(|p| !p.is_debug()).collect();
    listed.sort_by_cached_key(|p| p.title.to_lowercase());
    listed
}

/// Write search documents, feeds and the job summary for `repo`
pub fn generate(repo: &RepoInfo, config: &Config, progress: &dyn ProgressTracker) -> Result<()> {
    let step = progress.begin_step("Generating site");
    let www = config.www_dir();
    let generated = Utc::now();

    create_dir(&www.join("apps"))?;
    create_dir(&www.join("pkgs"))?;

    let listed = listed_packages(repo);

    progress.step_progress(step, "Generating package lists", 0, GENERATION_TASKS);
    write_package_lists(&www.join("package-lists.json"), &PackageLists::new(&listed))?;

    progress.step_progress(step, "Writing search documents", 1, GENERATION_TASKS);
    write_search_documents(&www.join("packages.json"), &listed)?;

    progress.step_progress(step, "Generating search index", 2, GENERATION_TASKS);
    write_search_index(&www.join("packages-index.json"), &listed)?;

    progress.step_progress(step, "Generating atom feeds", 3, GENERATION_TASKS);
    let feeds = [
        Feed::new(
            "Recently updated apps",
            "apps/updates.atom",
            repo.packages.iter().filter(|p| p.is_app()).collect(),
        ),
        Feed::new("Recently updated packages", "pkgs/updates.atom", listed.clone()),
    ];
    for feed in &feeds {
        let xml = render_feed(feed, config, generated)?;
        fs::write(www.join(feed.path), xml)?;
    }

    progress.step_progress(step, "Writing job summary", 4, GENERATION_TASKS);
    write_job_summary(&config.job_summary, repo, config)?;

    progress.step_progress(step, "Done", 5, GENERATION_TASKS);
    info!(
        "Generated site for {} packages in {}",
        listed.len(),
        www.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_packages() {
        let mut zeta = Package::new("aaa");
        zeta.title = "zeta".to_string();
        let mut alpha = Package::new("zzz");
        alpha.title = "Alpha".to_string();
        let repo = RepoInfo {
            packages: vec![zeta, Package::new("beta-debuginfo"), alpha],
            ..Default::default()
        };

        let names: Vec<&str> = listed_packages(&repo).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zzz", "aaa"]);
    }
}
