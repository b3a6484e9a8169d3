// src/repository/parsers/other.rs

//! Parser for `other.xml` (changelogs)
//!
//! ```xml
//! <otherdata xmlns="http://linux.duke.edu/metadata/other" packages="1">
//!   <package pkgid="..." name="harbour-foo" arch="aarch64">
//!     <version epoch="0" ver="1.0" rel="1"/>
//!     <changelog author="Jane Doe &lt;jane@example.org&gt; - 1.0-1" date="1700000000">- Initial release</changelog>
//!   </package>
//! </otherdata>
//! ```

use super::{attribute, xml_err};
use crate::error::Result;
use crate::packages::types::parse_unix_timestamp;
use crate::packages::ChangelogEntry;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::BufRead;
use tracing::debug;

/// Changelog of one package, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogNode {
    pub name: String,
    pub entries: Vec<ChangelogEntry>,
}

fn changelog_header(element: &BytesStart<'_>, source: &str) -> Result<(String, DateTime<Utc>)> {
    let author = attribute(element, b"author", source)?.unwrap_or_default();
    let date = attribute(element, b"date", source)?
        .as_deref()
        .and_then(parse_unix_timestamp)
        .unwrap_or_default();
    Ok((author, date))
}

/// Parse the changelogs of all packages in an `other.xml` document
///
/// A `<package>` without a `name` attribute cannot be matched to a primary
/// record and is skipped.
pub fn parse_other<R: BufRead>(input: R, source: &str) -> Result<Vec<ChangelogNode>> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut nodes = Vec::new();
    let mut current: Option<ChangelogNode> = None;
    let mut entry: Option<ChangelogEntry> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err(source))? {
            Event::Start(e) => match e.name().as_ref() {
                b"package" => {
                    current = Some(ChangelogNode {
                        name: attribute(&e, b"name", source)?.unwrap_or_default(),
                        entries: Vec::new(),
                    });
                }
                b"changelog" if current.is_some() => {
                    let (author, date) = changelog_header(&e, source)?;
                    entry = Some(ChangelogEntry {
                        date,
                        author,
                        text: String::new(),
                    });
                }
                _ => {}
            },
            Event::Empty(e) => {
                if e.name().as_ref() == b"changelog" {
                    if let Some(node) = current.as_mut() {
                        let (author, date) = changelog_header(&e, source)?;
                        node.entries.push(ChangelogEntry {
                            date,
                            author,
                            text: String::new(),
                        });
                    }
                }
            }
            Event::Text(t) => {
                if let Some(entry) = entry.as_mut() {
                    entry.text.push_str(&t.unescape().map_err(xml_err(source))?);
                }
            }
            Event::CData(c) => {
                if let Some(entry) = entry.as_mut() {
                    entry.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"changelog" => {
                    if let (Some(done), Some(node)) = (entry.take(), current.as_mut()) {
                        node.entries.push(done);
                    }
                }
                b"package" => {
                    entry = None;
                    if let Some(node) = current.take() {
                        if node.name.is_empty() {
                            debug!("Skipping changelog without package name in {}", source);
                        } else {
                            nodes.push(node);
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(nodes)
}
