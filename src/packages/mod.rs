// src/packages/mod.rs

//! Package records
//!
//! A [`Package`] is built from one `<package>` node of a repository's primary
//! index and initially holds exactly one architecture. Records of the same
//! name coming from other architectures (or duplicate nodes within one index)
//! are folded into the first record with [`Package::merge_arch`].

pub mod linker;
pub mod metadata;
pub mod types;

pub use linker::link_debug_packages;
pub use metadata::{AppMetadata, MetadataError, extract_metadata, last_paragraph, name_to_title};
pub use types::{
    ArchBuild, ChangelogEntry, Description, PackageCategory, PackageType, RemoteImage,
};

use crate::repository::parsers::PackageNode;
use crate::repository::selector::repo_arch;
use crate::version::PackageVersion;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};
use types::parse_unix_timestamp;

/// Packages keyed by name
pub type PackageMap = BTreeMap<String, Package>;

const DEBUGINFO_SUFFIX: &str = "-debuginfo";
const DEBUGSOURCE_SUFFIX: &str = "-debugsource";

/// A package as published on the web site
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub name: String,
    pub version: PackageVersion,
    pub title: String,
    pub summary: Option<String>,
    pub description: Option<Description>,
    pub licence: Option<String>,
    pub url: Option<String>,

    // Application metadata, from the block embedded in the description
    pub package_type: PackageType,
    /// Never empty, `{Other}` unless the metadata says otherwise
    pub categories: BTreeSet<PackageCategory>,
    pub icon: Option<RemoteImage>,
    pub screenshots: Vec<RemoteImage>,
    pub developer_name: Option<String>,
    pub packager_name: Option<String>,
    /// Link kind (lower-cased) to URL
    pub links: BTreeMap<String, String>,
    pub repo_url: Option<String>,
    pub packaging_repo_url: Option<String>,
    /// Long description in Markdown, fetched when enrichment is enabled
    pub markdown_url: Option<String>,

    /// Raw trailing paragraph of the description, kept for troubleshooting
    pub debug_yaml: Option<String>,
    pub debug_yaml_errors: Vec<MetadataError>,

    /// Per-architecture build data; the keys are the package's architectures
    pub builds: BTreeMap<String, ArchBuild>,
    /// Repositories that contributed a build, e.g. `4.5.0.24_aarch64`
    pub repos: BTreeSet<String>,

    /// Name of the `-debuginfo` package for this one, if any
    pub debuginfo_package: Option<String>,
    /// Name of the `-debugsource` package for this one, if any
    pub debugsource_package: Option<String>,

    pub updated: DateTime<Utc>,
    pub changelog_entries: Vec<ChangelogEntry>,
}

impl Package {
    /// Empty record with the derived title and default categories
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let mut package = Self {
            title: name_to_title(&name),
            name,
            version: PackageVersion::default(),
            summary: None,
            description: None,
            licence: None,
            url: None,
            package_type: PackageType::default(),
            categories: BTreeSet::from([PackageCategory::Other]),
            icon: None,
            screenshots: Vec::new(),
            developer_name: None,
            packager_name: None,
            links: BTreeMap::new(),
            repo_url: None,
            packaging_repo_url: None,
            markdown_url: None,
            debug_yaml: None,
            debug_yaml_errors: Vec::new(),
            builds: BTreeMap::new(),
            repos: BTreeSet::new(),
            debuginfo_package: None,
            debugsource_package: None,
            updated: DateTime::default(),
            changelog_entries: Vec::new(),
        };
        package.apply_library_category();
        package
    }

    /// Build a record from a primary index node found in `repo`
    ///
    /// The record holds exactly one architecture: the node's `<arch>`, or the
    /// architecture suffix of `repo` if the node has none.
    pub fn from_node(node: &PackageNode, repo: &str) -> Self {
        let mut package = Self::new(node.name.clone());

        package.version = PackageVersion::new(
            node.epoch.clone().unwrap_or_default(),
            node.ver.clone().unwrap_or_default(),
            node.rel.clone().unwrap_or_default(),
        );
        package.summary = node.summary.clone();
        package.url = node.url.clone();
        package.licence = node.license.clone();
        package.updated = node
            .file_time
            .as_deref()
            .and_then(parse_unix_timestamp)
            .unwrap_or_default();

        let arch = node
            .arch
            .clone()
            .or_else(|| repo_arch(repo).map(str::to_string))
            .unwrap_or_else(|| "noarch".to_string());
        let build = ArchBuild {
            download_size: node.package_size.as_deref().and_then(|s| s.parse().ok()),
            install_size: node.installed_size.as_deref().and_then(|s| s.parse().ok()),
            download_url: node.location.clone(),
            checksum_type: node.checksum_type.clone(),
            checksum_value: node.checksum.clone(),
        };
        package.builds.insert(arch, build);
        package.repos.insert(repo.to_string());

        if let Some(raw) = node.description.as_deref() {
            package.apply_description(raw);
        }
        package.apply_library_category();

        package
    }

    /// Split the raw description into prose and embedded metadata
    fn apply_description(&mut self, raw: &str) {
        match extract_metadata(raw, &self.name) {
            Ok(extracted) => {
                self.debug_yaml = extracted.debug_yaml;
                self.description = Some(Description::Plain(
                    extracted.description.unwrap_or_else(|| raw.to_string()),
                ));
                if let Some(metadata) = extracted.metadata {
                    self.apply_metadata(metadata);
                }
                self.debug_yaml_errors.extend(extracted.diagnostics);
            }
            Err(e) => {
                debug!("Unusable metadata block in {}: {}", self.name, e);
                self.debug_yaml = last_paragraph(raw);
                self.description = Some(Description::Plain(raw.to_string()));
                self.debug_yaml_errors.push(e);
            }
        }
    }

    /// Overwrite fields with the values present in `metadata`
    pub fn apply_metadata(&mut self, metadata: AppMetadata) {
        if let Some(title) = metadata.title {
            self.title = title;
        }
        if let Some(package_type) = metadata.package_type {
            self.package_type = package_type;
        }
        if let Some(icon) = metadata.icon {
            self.icon = Some(icon);
        }
        if let Some(screenshots) = metadata.screenshots {
            self.screenshots = screenshots;
        }
        if let Some(name) = metadata.developer_name {
            self.developer_name = Some(name);
        }
        if let Some(name) = metadata.packager_name {
            self.packager_name = Some(name);
        }
        if let Some(url) = metadata.repo_url {
            self.repo_url = Some(url);
        }
        if let Some(url) = metadata.packaging_repo_url {
            self.packaging_repo_url = Some(url);
        }
        if let Some(url) = metadata.markdown_url {
            self.markdown_url = Some(url);
        }
        if let Some(links) = metadata.links {
            self.links = links;
        }
        if let Some(categories) = metadata.categories {
            self.categories = categories;
        }
    }

    /// Libraries are always listed under `Library`
    fn apply_library_category(&mut self) {
        if self.name.starts_with("lib") {
            self.categories.insert(PackageCategory::Library);
        }
    }

    /// Fold the architectures of `other` into this record
    ///
    /// Copies every build of `other` and unions its repositories. All other
    /// fields of `self` are kept. Merging the same record twice changes
    /// nothing.
    pub fn merge_arch(&mut self, other: &Package) {
        for (arch, build) in &other.builds {
            self.builds.insert(arch.clone(), build.clone());
        }
        self.repos.extend(other.repos.iter().cloned());
    }

    /// Architectures this package has a build for
    pub fn archs(&self) -> impl Iterator<Item = &str> + '_ {
        self.builds.keys().map(String::as_str)
    }

    pub fn build(&self, arch: &str) -> Option<&ArchBuild> {
        self.builds.get(arch)
    }

    /// Full URL of the RPM for `arch`
    ///
    /// `noarch` builds are served from the first repository (in sorted
    /// order); other builds from the first repository whose architecture
    /// suffix equals `arch`.
    pub fn download_url_for(&self, arch: &str, repo_url_prefix: &str) -> Option<String> {
        let location = self.build(arch)?.download_url.as_deref()?;

        let repo = if arch == "noarch" {
            self.repos.iter().next()
        } else {
            self.repos.iter().find(|repo| repo_arch(repo) == Some(arch))
        };

        match repo {
            Some(repo) => Some(format!("{repo_url_prefix}{repo}/{location}")),
            None => {
                warn!(
                    "No repository for architecture {} of package {} (repos: {:?})",
                    arch, self.name, self.repos
                );
                None
            }
        }
    }

    /// `-debuginfo` and `-debugsource` packages
    pub fn is_debug(&self) -> bool {
        self.name.ends_with(DEBUGINFO_SUFFIX) || self.name.ends_with(DEBUGSOURCE_SUFFIX)
    }

    /// Whether the package is listed as an application
    pub fn is_app(&self) -> bool {
        self.package_type == PackageType::DesktopApplication
            || (self.name.starts_with("harbour-") && !self.is_debug())
    }

    /// Site-relative URL of the package page
    pub fn web_url(&self) -> String {
        if self.is_app() {
            format!("apps/{}/", self.name)
        } else {
            format!("pkgs/{}/", self.name)
        }
    }

    /// Whether building the page needs extra HTTP requests
    pub fn caused_requests(&self) -> bool {
        self.markdown_url.is_some()
    }
}
