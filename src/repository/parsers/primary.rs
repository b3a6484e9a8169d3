// src/repository/parsers/primary.rs

//! Parser for `primary.xml`
//!
//! ```xml
//! <package type="rpm">
//!   <name>harbour-foo</name>
//!   <arch>aarch64</arch>
//!   <version epoch="0" ver="1.0" rel="1"/>
//!   <checksum type="sha256" pkgid="YES">abc...</checksum>
//!   <summary>...</summary>
//!   <description>...</description>
//!   <url>https://...</url>
//!   <time file="1700000000" build="1699999000"/>
//!   <size package="1234" installed="5678" archive="6000"/>
//!   <location href="aarch64/harbour-foo-1.0-1.aarch64.rpm"/>
//!   <format><rpm:license>MIT</rpm:license>...</format>
//! </package>
//! ```
//!
//! The first occurrence of every element wins.

use super::{attribute, set_once, xml_err};
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::io::BufRead;

/// Raw fields of one `<package>` element
///
/// Every value is the verbatim element text or attribute value; `None` when
/// the element or attribute is missing or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageNode {
    pub name: String,
    pub arch: Option<String>,
    pub epoch: Option<String>,
    pub ver: Option<String>,
    pub rel: Option<String>,
    pub checksum_type: Option<String>,
    pub checksum: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub license: Option<String>,
    /// `time[@file]`, seconds since the Unix epoch
    pub file_time: Option<String>,
    /// `size[@package]`
    pub package_size: Option<String>,
    /// `size[@installed]`
    pub installed_size: Option<String>,
    /// `location[@href]`
    pub location: Option<String>,
}

impl PackageNode {
    /// Node with only a name, for building records by hand
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Elements whose text content is captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Name,
    Arch,
    Checksum,
    Summary,
    Description,
    Url,
    License,
}

impl TextField {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"name" => Some(Self::Name),
            b"arch" => Some(Self::Arch),
            b"checksum" => Some(Self::Checksum),
            b"summary" => Some(Self::Summary),
            b"description" => Some(Self::Description),
            b"url" => Some(Self::Url),
            b"rpm:license" => Some(Self::License),
            _ => None,
        }
    }
}

/// A `<package>` being read
#[derive(Default)]
struct PartialNode {
    name: Option<String>,
    node: PackageNode,
}

impl PartialNode {
    fn slot(&mut self, field: TextField) -> &mut Option<String> {
        match field {
            TextField::Name => &mut self.name,
            TextField::Arch => &mut self.node.arch,
            TextField::Checksum => &mut self.node.checksum,
            TextField::Summary => &mut self.node.summary,
            TextField::Description => &mut self.node.description,
            TextField::Url => &mut self.node.url,
            TextField::License => &mut self.node.license,
        }
    }

    fn read_attributes(&mut self, element: &BytesStart<'_>, source: &str) -> Result<()> {
        let node = &mut self.node;
        match element.name().as_ref() {
            b"version" => {
                set_once(&mut node.epoch, attribute(element, b"epoch", source)?);
                set_once(&mut node.ver, attribute(element, b"ver", source)?);
                set_once(&mut node.rel, attribute(element, b"rel", source)?);
            }
            b"checksum" => set_once(&mut node.checksum_type, attribute(element, b"type", source)?),
            b"time" => set_once(&mut node.file_time, attribute(element, b"file", source)?),
            b"size" => {
                set_once(&mut node.package_size, attribute(element, b"package", source)?);
                set_once(&mut node.installed_size, attribute(element, b"installed", source)?);
            }
            b"location" => set_once(&mut node.location, attribute(element, b"href", source)?),
            _ => {}
        }
        Ok(())
    }

    fn finish(self, source: &str) -> Result<PackageNode> {
        let name = self
            .name
            .ok_or_else(|| Error::ParseError(format!("Package without <name> in {source}")))?;
        Ok(PackageNode { name, ..self.node })
    }
}

/// Parse all `<package>` elements of a primary index
///
/// `source` names the input in error messages.
pub fn parse_primary<R: BufRead>(input: R, source: &str) -> Result<Vec<PackageNode>> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut packages = Vec::new();
    let mut current: Option<PartialNode> = None;
    let mut capture: Option<(TextField, String)> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err(source))? {
            Event::Start(e) => {
                if e.name().as_ref() == b"package" {
                    current = Some(PartialNode::default());
                } else if let Some(node) = current.as_mut() {
                    node.read_attributes(&e, source)?;
                    if let Some(field) = TextField::from_tag(e.name().as_ref()) {
                        if node.slot(field).is_none() {
                            capture = Some((field, String::new()));
                        }
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(node) = current.as_mut() {
                    node.read_attributes(&e, source)?;
                }
            }
            Event::Text(t) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&t.unescape().map_err(xml_err(source))?);
                }
            }
            Event::CData(c) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(e) => {
                let tag = e.name();
                if tag.as_ref() == b"package" {
                    capture = None;
                    if let Some(node) = current.take() {
                        packages.push(node.finish(source)?);
                    }
                } else if capture
                    .as_ref()
                    .is_some_and(|(field, _)| TextField::from_tag(tag.as_ref()) == Some(*field))
                {
                    if let (Some((field, text)), Some(node)) = (capture.take(), current.as_mut()) {
                        if !text.is_empty() {
                            *node.slot(field) = Some(text);
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(packages)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<metadata xmlns="http://linux.duke.edu/metadata/common" xmlns:rpm="http://linux.duke.edu/metadata/rpm" packages="2">
<package type="rpm">
  <name>harbour-foo</name>
  <arch>aarch64</arch>
  <version epoch="0" ver="1.2+git3" rel="1.1"/>
  <checksum type="sha256" pkgid="YES">deadbeef</checksum>
  <summary>Foo &amp; bar</summary>
  <description>A foo app.

Title: Foo</description>
  <packager></packager>
  <url>https://example.org/foo</url>
  <time file="1700000000" build="1699990000"/>
  <size package="1234" installed="5678" archive="6000"/>
  <location href="aarch64/harbour-foo-1.2+git3-1.1.aarch64.rpm"/>
  <format>
    <rpm:license>GPLv3</rpm:license>
    <rpm:provides>
      <rpm:entry name="harbour-foo" flags="EQ" epoch="0" ver="1.2" rel="1.1"/>
    </rpm:provides>
  </format>
</package>
<package type="rpm">
  <name>bare</name>
</package>
</metadata>"#;

    #[test]
    fn test_parse_full_package() {
        let packages = parse_primary(PRIMARY.as_bytes(), "test").unwrap();
        assert_eq!(packages.len(), 2);

        let foo = &packages[0];
        assert_eq!(foo.name, "harbour-foo");
        assert_eq!(foo.arch.as_deref(), Some("aarch64"));
        assert_eq!(foo.epoch.as_deref(), Some("0"));
        assert_eq!(foo.ver.as_deref(), Some("1.2+git3"));
        assert_eq!(foo.rel.as_deref(), Some("1.1"));
        assert_eq!(foo.checksum_type.as_deref(), Some("sha256"));
        assert_eq!(foo.checksum.as_deref(), Some("deadbeef"));
        assert_eq!(foo.summary.as_deref(), Some("Foo & bar"));
        assert_eq!(foo.description.as_deref(), Some("A foo app.\n\nTitle: Foo"));
        assert_eq!(foo.url.as_deref(), Some("https://example.org/foo"));
        assert_eq!(foo.license.as_deref(), Some("GPLv3"));
        assert_eq!(foo.file_time.as_deref(), Some("1700000000"));
        assert_eq!(foo.package_size.as_deref(), Some("1234"));
        assert_eq!(foo.installed_size.as_deref(), Some("5678"));
        assert_eq!(
            foo.location.as_deref(),
            Some("aarch64/harbour-foo-1.2+git3-1.1.aarch64.rpm")
        );
    }

    #[test]
    fn test_missing_elements_are_none() {
        let packages = parse_primary(PRIMARY.as_bytes(), "test").unwrap();
        assert_eq!(packages[1], PackageNode::new("bare"));
    }

    #[test]
    fn test_cdata_description() {
        let xml = "<metadata><package><name>x</name><description><![CDATA[a <b> c]]></description></package></metadata>";
        let packages = parse_primary(xml.as_bytes(), "test").unwrap();
        assert_eq!(packages[0].description.as_deref(), Some("a <b> c"));
    }

    #[test]
    fn test_package_without_name_is_rejected() {
        let xml = "<metadata><package><arch>noarch</arch></package></metadata>";
        let result = parse_primary(xml.as_bytes(), "broken.xml");
        assert!(matches!(result, Err(Error::ParseError(msg)) if msg.contains("broken.xml")));
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        let xml = "<metadata><package><name>x</nam></package></metadata>";
        assert!(parse_primary(xml.as_bytes(), "test").is_err());
    }
}
