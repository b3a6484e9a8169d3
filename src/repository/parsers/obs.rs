// src/repository/parsers/obs.rs

//! Parser for Open Build Service directory listings
//!
//! `GET /build/{project}` answers with
//! `<directory><entry name="4.5.0.24_aarch64"/>...</directory>`.

use super::{attribute, xml_err};
use crate::error::Result;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::BufRead;

/// Names of all `<entry>` elements, in document order
pub fn parse_obs_entries<R: BufRead>(input: R, source: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();
    let mut entries = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err(source))? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"entry" => {
                if let Some(name) = attribute(&e, b"name", source)? {
                    entries.push(name);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}
