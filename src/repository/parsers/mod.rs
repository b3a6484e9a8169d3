// src/repository/parsers/mod.rs

//! Streaming parsers for RPM repository metadata
//!
//! All parsers read with `quick-xml` events and never build a DOM. They are
//! tolerant of missing optional elements: an absent element or attribute is
//! reported as `None`, never as an error. Only malformed XML (and a
//! `<package>` without `<name>`) is an error.
//!
//! - [`primary`]: `primary.xml`, one [`PackageNode`] per `<package>`
//! - [`other`]: `other.xml`, changelog entries per package name
//! - [`repomd`]: `repodata/repomd.xml`, locations of the other index files
//! - [`obs`]: Open Build Service repository listings

pub mod obs;
pub mod other;
pub mod primary;
pub mod repomd;

pub use obs::parse_obs_entries;
pub use other::{parse_other, ChangelogNode};
pub use primary::{parse_primary, PackageNode};
pub use repomd::parse_repomd;

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use quick_xml::events::BytesStart;
use std::fmt::Display;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Open a gzip-compressed index file for streaming
pub fn open_gzip(path: &Path) -> Result<BufReader<GzDecoder<File>>> {
    let file = File::open(path)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
    Ok(BufReader::new(GzDecoder::new(file)))
}

/// Map any XML error into a parse error naming the input
pub(crate) fn xml_err<E: Display>(source: &str) -> impl Fn(E) -> Error + '_ {
    move |e| Error::ParseError(format!("Malformed XML in {source}: {e}"))
}

/// Unescaped value of attribute `key`, if present
pub(crate) fn attribute(element: &BytesStart<'_>, key: &[u8], source: &str) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(xml_err(source))?;
        if attr.key.as_ref() == key {
            let value = attr.unescape_value().map_err(xml_err(source))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Store `value` in `slot` unless an earlier element already filled it
pub(crate) fn set_once(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}
