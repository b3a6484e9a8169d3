// src/site/search.rs

//! Search documents
//!
//! `packages.json` holds one document per listed package and
//! `packages-index.json` a prebuilt elasticlunr index over them. The search
//! page loads both and matches queries client side.

use crate::error::Result;
use crate::packages::Package;
use elasticlunr::Index;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// What the search page knows about a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchDocument<'a> {
    pub name: &'a str,
    pub title: &'a str,
    /// Site-relative page URL
    pub url: String,
    pub icon: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub description: Option<&'a str>,
    pub version: String,
    pub version_short: &'a str,
    pub is_app: bool,
    pub is_debug: bool,
}

impl<'a> From<&'a Package> for SearchDocument<'a> {
    fn from(package: &'a Package) -> Self {
        Self {
            name: &package.name,
            title: &package.title,
            url: package.web_url(),
            icon: package.icon.as_ref().map(|icon| icon.remote_url.as_str()),
            summary: package.summary.as_deref(),
            description: package.description.as_ref().map(|d| d.as_str()),
            version: package.version.to_full_str(),
            version_short: package.version.to_short_str(),
            is_app: package.is_app(),
            is_debug: package.is_debug(),
        }
    }
}

/// Write the documents of `packages`, in the given order, to `path`
pub fn write_search_documents(path: &Path, packages: &[&Package]) -> Result<()> {
    let documents: Vec<SearchDocument<'_>> =
        packages.iter().map(|package| SearchDocument::from(*package)).collect();
    let json = serde_json::to_string(&documents)?;
    fs::write(path, json)?;
    Ok(())
}

/// Indexed fields, most relevant first; the search page boosts them in
/// this order
pub const INDEX_FIELDS: [&str; 4] = ["name", "title", "summary", "description"];

/// Full-text index over `packages`, referenced by package name
pub fn build_search_index(packages: &[&Package]) -> Index {
    let mut index = Index::new(&INDEX_FIELDS);
    for package in packages {
        let document = SearchDocument::from(*package);
        index.add_doc(
            document.name,
            [
                document.name,
                document.title,
                document.summary.unwrap_or_default(),
                document.description.unwrap_or_default(),
            ],
        );
    }
    index
}

/// Write the search index of `packages` to `path`
pub fn write_search_index(path: &Path, packages: &[&Package]) -> Result<()> {
    let json = serde_json::to_string(&build_search_index(packages))?;
    fs::write(path, json)?;
    Ok(())
}
