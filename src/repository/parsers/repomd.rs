// src/repository/parsers/repomd.rs

//! Parser for `repodata/repomd.xml`

use super::{attribute, xml_err};
use crate::error::Result;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::collections::BTreeMap;
use std::io::BufRead;

/// Map each `<data type>` to the `href` of its first `<location>`
///
/// Data entries without a location are left out.
pub fn parse_repomd<R: BufRead>(input: R, source: &str) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut locations = BTreeMap::new();
    let mut data_type: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err(source))? {
            Event::Start(e) if e.name().as_ref() == b"data" => {
                data_type = attribute(&e, b"type", source)?;
            }
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"location" => {
                if let Some(kind) = data_type.as_ref() {
                    if !locations.contains_key(kind) {
                        if let Some(href) = attribute(&e, b"href", source)? {
                            locations.insert(kind.clone(), href);
                        }
                    }
                }
            }
            Event::End(e) if e.name().as_ref() == b"data" => data_type = None,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(locations)
}
