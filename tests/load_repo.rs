// tests/load_repo.rs

//! Loading repositories from cached index files
//!
//! These tests run the whole loading pipeline (index parsing, debug package
//! linking, changelog attachment and the merge across architectures) on
//! gzip-compressed fixture indexes in a temporary directory.

mod common;

use chumweb::packages::{Description, PackageCategory, PackageType};
use chumweb::{Error, RepositoryClient, SilentProgress, load_repo};
use common::{AARCH64, I486, Pkg, offline_config, write_primary, write_two_arch_fixture};
use tempfile::TempDir;

fn client() -> RepositoryClient {
    RepositoryClient::new("chumweb-tests").unwrap()
}

#[test]
fn test_merges_architectures() {
    let work = TempDir::new().unwrap();
    write_two_arch_fixture(work.path());
    let config = offline_config(&work, work.path(), &[AARCH64, I486]);

    let repo = load_repo(&config, &client(), &SilentProgress::new()).unwrap();

    assert_eq!(repo.version, "4.5.0.24");
    assert_eq!(repo.repo_archs(), vec!["aarch64", "i486"]);

    let names: Vec<&str> = repo.packages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["harbour-foo", "harbour-foo-debuginfo", "libbar"]);

    let foo = repo.get("harbour-foo").unwrap();
    assert_eq!(foo.archs().collect::<Vec<_>>(), vec!["aarch64", "i486"]);
    assert_eq!(foo.repos.len(), 2);
    assert_eq!(
        foo.build("i486").unwrap().checksum_value.as_deref(),
        Some("harbour-foo-i486-sum")
    );
    assert_eq!(
        foo.download_url_for("i486", &config.repo_url_prefix).as_deref(),
        Some("https://repo.example.org/chum/4.5.0.24_i486/i486/harbour-foo-1.0-1.i486.rpm")
    );
}

#[test]
fn test_first_repository_wins_for_metadata() {
    let work = TempDir::new().unwrap();
    write_two_arch_fixture(work.path());
    let config = offline_config(&work, work.path(), &[AARCH64, I486]);

    let repo = load_repo(&config, &client(), &SilentProgress::new()).unwrap();
    let foo = repo.get("harbour-foo").unwrap();

    assert_eq!(foo.title, "Foo Deluxe");
    assert_eq!(foo.package_type, PackageType::DesktopApplication);
    assert_eq!(foo.packager_name.as_deref(), Some("Packager Pete"));
    assert_eq!(
        foo.icon.as_ref().map(|icon| icon.remote_url.as_str()),
        Some("https://example.org/foo.png")
    );
    assert_eq!(foo.links["homepage"], "https://example.org/foo");
    assert!(foo.categories.contains(&PackageCategory::Game));
    assert_eq!(
        foo.description,
        Some(Description::Plain("Foo does things.".to_string()))
    );
    assert!(foo.debug_yaml_errors.is_empty());
}

#[test]
fn test_links_debug_packages_and_changelogs() {
    let work = TempDir::new().unwrap();
    write_two_arch_fixture(work.path());
    let config = offline_config(&work, work.path(), &[AARCH64, I486]);

    let repo = load_repo(&config, &client(), &SilentProgress::new()).unwrap();
    let foo = repo.get("harbour-foo").unwrap();

    assert_eq!(foo.debuginfo_package.as_deref(), Some("harbour-foo-debuginfo"));
    assert_eq!(
        repo.debuginfo_of(foo).map(|p| p.archs().count()),
        Some(2)
    );
    assert!(foo.debugsource_package.is_none());

    assert_eq!(foo.changelog_entries.len(), 1);
    assert_eq!(foo.changelog_entries[0].text, "- Initial release");
    assert_eq!(
        foo.changelog_entries[0].author,
        "Jane Doe <jane@example.org> - 1.0-1"
    );
    assert!(repo.get("ghost").is_none());
}

#[test]
fn test_noarch_library() {
    let work = TempDir::new().unwrap();
    write_two_arch_fixture(work.path());
    let config = offline_config(&work, work.path(), &[AARCH64, I486]);

    let repo = load_repo(&config, &client(), &SilentProgress::new()).unwrap();
    let bar = repo.get("libbar").unwrap();

    assert_eq!(bar.title, "Bar (library)");
    assert!(bar.categories.contains(&PackageCategory::Library));
    assert!(bar.categories.contains(&PackageCategory::Other));
    assert!(!bar.is_app());
    assert_eq!(bar.archs().collect::<Vec<_>>(), vec!["noarch"]);
    assert_eq!(bar.updated.timestamp(), 1_650_000_000);
    assert_eq!(
        bar.download_url_for("noarch", &config.repo_url_prefix).as_deref(),
        Some("https://repo.example.org/chum/4.5.0.24_aarch64/noarch/libbar-1.0-1.noarch.rpm")
    );
}

#[test]
fn test_missing_other_index_is_skipped() {
    let work = TempDir::new().unwrap();
    write_two_arch_fixture(work.path());
    let config = offline_config(&work, work.path(), &[I486]);

    let repo = load_repo(&config, &client(), &SilentProgress::new()).unwrap();
    let foo = repo.get("harbour-foo").unwrap();
    assert!(foo.changelog_entries.is_empty());
    assert_eq!(foo.title, "Foo");
}

#[test]
fn test_debug_package_without_base_fails() {
    let work = TempDir::new().unwrap();
    write_primary(
        work.path(),
        AARCH64,
        &[Pkg::new("harbour-gone-debugsource", "aarch64")],
    );
    let config = offline_config(&work, work.path(), &[AARCH64]);

    let result = load_repo(&config, &client(), &SilentProgress::new());
    assert!(matches!(
        result,
        Err(Error::MissingDebugBase { base_name, .. }) if base_name == "harbour-gone"
    ));
}

#[test]
fn test_missing_primary_index_fails() {
    let work = TempDir::new().unwrap();
    let config = offline_config(&work, work.path(), &[AARCH64]);

    let result = load_repo(&config, &client(), &SilentProgress::new());
    assert!(matches!(result, Err(Error::IoError(_))));
}
