// src/site/feed.rs

//! Atom feeds of recently updated packages
//!
//! Entries carry the RPM downloads as `enclosure` links and a copy of the
//! package record in the namespace of the repository `primary.xml`, so feed
//! readers aware of it can show versions without visiting the site.
//!
//! <https://validator.w3.org/feed/docs/atom.html>

use crate::config::Config;
use crate::error::{Error, Result};
use crate::packages::Package;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::writer::Writer;
use std::fmt::Display;

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
/// Namespace of `primary.xml`, reused for the package records in entries
pub const REPO_NS: &str = "http://linux.duke.edu/metadata/common";

const FEED_ICON: &str = "static/img/sailfishos-chum.png";

/// A feed and the packages listed in it, newest first
#[derive(Debug, Clone)]
pub struct Feed<'a> {
    pub title: &'a str,
    /// Site-relative path, e.g. `apps/updates.atom`
    pub path: &'a str,
    pub packages: Vec<&'a Package>,
}

impl<'a> Feed<'a> {
    /// Feed of `packages`, ordered by descending update time
    pub fn new(title: &'a str, path: &'a str, mut packages: Vec<&'a Package>) -> Self {
        packages.sort_by(|a, b| b.updated.cmp(&a.updated));
        Self {
            title,
            path,
            packages,
        }
    }
}

fn write_err<E: Display>(e: E) -> Error {
    Error::IoError(format!("Failed to write feed: {e}"))
}

/// Event writer with shorthands for the element shapes a feed uses
struct AtomWriter {
    writer: Writer<Vec<u8>>,
}

impl AtomWriter {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(write_err)
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for attr in attrs {
            element.push_attribute(*attr);
        }
        self.event(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut element = BytesStart::new(name);
        for attr in attrs {
            element.push_attribute(*attr);
        }
        self.event(Event::Empty(element))
    }

    fn text(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn into_inner(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Render `feed` as an Atom document
///
/// At most `config.feed_entries_count` entries are written. `generated` is
/// the feed's update time when it has no entries.
pub fn render_feed(feed: &Feed<'_>, config: &Config, generated: DateTime<Utc>) -> Result<Vec<u8>> {
    let mut out = AtomWriter::new();
    let feed_url = format!("{}{}", config.public_url, feed.path);
    let updated = feed
        .packages
        .first()
        .map_or(generated, |package| package.updated);

    out.event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    out.start("feed", &[("xmlns", ATOM_NS), ("xmlns:repo", REPO_NS)])?;
    out.text("id", &[], &feed_url)?;
    out.text("title", &[], feed.title)?;
    out.text("updated", &[], &updated.to_rfc3339())?;
    out.text("icon", &[], &format!("{}{}", config.public_url, FEED_ICON))?;
    out.empty("link", &[("rel", "self"), ("href", feed_url.as_str())])?;

    for package in feed.packages.iter().take(config.feed_entries_count) {
        write_entry(&mut out, package, config)?;
    }

    out.end("feed")?;
    Ok(out.into_inner())
}

fn write_entry(out: &mut AtomWriter, package: &Package, config: &Config) -> Result<()> {
    let page_url = format!("{}{}", config.public_url, package.web_url());

    out.start("entry", &[])?;
    out.text("id", &[], &page_url)?;
    out.text("updated", &[], &package.updated.to_rfc3339())?;
    out.text("title", &[], &package.title)?;
    out.empty("link", &[("href", page_url.as_str())])?;
    out.text(
        "content",
        &[("type", "text")],
        &format!(
            "Package {} was updated to version {}",
            package.name,
            package.version.to_short_str()
        ),
    )?;

    for name in [&package.packager_name, &package.developer_name]
        .into_iter()
        .flatten()
    {
        out.start("author", &[])?;
        out.text("name", &[], name)?;
        out.end("author")?;
    }

    for category in &package.categories {
        out.empty("category", &[("term", category.as_str())])?;
    }

    for (arch, build) in &package.builds {
        let Some(url) = package.download_url_for(arch, &config.repo_url_prefix) else {
            continue;
        };
        let length = build.download_size.unwrap_or_default().to_string();
        let title = format!("{}-{}-{}.rpm", package.name, package.version.to_full_str(), arch);
        out.empty(
            "link",
            &[
                ("rel", "enclosure"),
                ("href", url.as_str()),
                ("type", "application/x-rpm"),
                ("length", length.as_str()),
                ("title", title.as_str()),
            ],
        )?;
    }

    for arch in package.archs() {
        write_repo_package(out, package, arch)?;
    }

    out.end("entry")
}

/// The package record as `primary.xml` would have it
fn write_repo_package(out: &mut AtomWriter, package: &Package, arch: &str) -> Result<()> {
    let version = &package.version;

    out.start("repo:package", &[("type", "rpm")])?;
    out.text("repo:name", &[], &package.name)?;
    out.text("repo:arch", &[], arch)?;
    out.empty(
        "repo:version",
        &[
            ("epoch", version.epoch.as_str()),
            ("ver", version.ver.as_str()),
            ("rel", version.rel.as_str()),
        ],
    )?;
    if let Some(summary) = &package.summary {
        out.text("repo:summary", &[], summary)?;
    }
    if let Some(description) = &package.description {
        out.text("repo:description", &[], description.as_str())?;
    }
    if let Some(url) = &package.url {
        out.text("repo:url", &[], url)?;
    }
    out.end("repo:package")
}
