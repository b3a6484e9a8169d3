// src/packages/metadata.rs

//! Application metadata embedded in package descriptions
//!
//! Chum packages carry metadata that RPM headers have no room for (icon,
//! screenshots, categories, links, ...) as a YAML block in the last paragraph
//! of the package description. Paragraphs are separated by blank lines:
//!
//! ```text
//! A calculator for Sailfish OS.
//!
//! Title: Calculator
//! Type: desktop-application
//! Categories:
//!  - Utility
//! Links:
//!   Homepage: https://example.org
//! ```
//!
//! The metadata convention follows the Chum GUI client. Packagers write this
//! block by hand, so decoding is tolerant: every field is looked up on its
//! own, a field with the wrong shape is reported as a [`MetadataError`] and
//! skipped while the remaining fields are still decoded.

use super::types::{PackageCategory, PackageType, RemoteImage};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_yaml::{Mapping, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Top-level keys that mark a paragraph as an attempted metadata block
const METADATA_KEYS: [&str; 12] = [
    "Title",
    "PackageName",
    "Type",
    "PackageIcon",
    "Icon",
    "Screenshots",
    "DeveloperName",
    "PackagedBy",
    "Custom",
    "Links",
    "Url",
    "Categories",
];

/// Problem found while decoding the embedded metadata block
///
/// These never abort processing. Shape problems end up in
/// `Package::debug_yaml_errors`; [`MetadataError::NotAMapping`] makes the
/// record builder fall back to the raw description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("'{field}' should be {expected}, found {found}")]
    WrongType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{field}' should not be empty")]
    Empty { field: &'static str },

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),

    #[error("Unknown package type '{0}'")]
    UnknownType(String),

    #[error("Metadata block is a {0}, expected a mapping")]
    NotAMapping(&'static str),

    #[error("'{0}' is given more than once, the last value is used")]
    DuplicateKey(String),

    #[error("Metadata block is not valid YAML: {0}")]
    Unparsable(String),
}

/// Application metadata decoded from the YAML block
///
/// `None` means the field was absent or malformed; the package keeps its
/// previous value in that case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppMetadata {
    pub title: Option<String>,
    pub package_type: Option<PackageType>,
    pub icon: Option<RemoteImage>,
    pub screenshots: Option<Vec<RemoteImage>>,
    pub developer_name: Option<String>,
    pub packager_name: Option<String>,
    pub repo_url: Option<String>,
    pub packaging_repo_url: Option<String>,
    pub markdown_url: Option<String>,
    pub links: Option<BTreeMap<String, String>>,
    pub categories: Option<BTreeSet<PackageCategory>>,
}

/// Result of splitting a description into prose and metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedDescription {
    /// Remaining prose; `None` if the description has no paragraphs at all
    pub description: Option<String>,
    /// The raw last paragraph, whether or not it turned out to be metadata
    pub debug_yaml: Option<String>,
    /// Decoded metadata, if the last paragraph was a YAML mapping
    pub metadata: Option<AppMetadata>,
    pub diagnostics: Vec<MetadataError>,
}

/// Split `description` into prose and the trailing metadata block
///
/// Returns an error only when the last paragraph parses as YAML but is
/// neither a mapping nor prose (a sequence, number or boolean).
pub fn extract_metadata(
    description: &str,
    name: &str,
) -> std::result::Result<ExtractedDescription, MetadataError> {
    let mut paragraphs = split_paragraphs(description);
    let Some(candidate) = paragraphs.pop() else {
        return Ok(ExtractedDescription::default());
    };

    let mut extracted = ExtractedDescription {
        debug_yaml: Some(candidate.clone()),
        ..Default::default()
    };

    match serde_yaml::from_str::<LastWins>(&candidate) {
        Ok(LastWins {
            value: Value::Mapping(map),
            duplicates,
        }) => {
            let mut decoder = Decoder::new(&map, "");
            decoder
                .errors
                .extend(duplicates.into_iter().map(MetadataError::DuplicateKey));
            let metadata = decoder.app_metadata(name);
            extracted.metadata = Some(metadata);
            extracted.diagnostics = decoder.errors;
        }
        Err(e) => {
            // Plain prose often fails to parse; only a block that starts
            // like metadata is worth reporting
            if looks_like_metadata(&candidate) {
                extracted.diagnostics.push(MetadataError::Unparsable(e.to_string()));
            }
            paragraphs.push(candidate);
        }
        Ok(LastWins {
            value: Value::Null | Value::String(_),
            ..
        }) => paragraphs.push(candidate),
        Ok(LastWins { value, .. }) => return Err(MetadataError::NotAMapping(kind(&value))),
    }

    extracted.description = Some(join_paragraphs(&paragraphs));
    Ok(extracted)
}

/// Whether the first line of `block` starts with a known metadata key
fn looks_like_metadata(block: &str) -> bool {
    let first_line = block.lines().next().unwrap_or_default();
    first_line
        .split_once(':')
        .is_some_and(|(key, _)| METADATA_KEYS.contains(&key.trim()))
}

/// The last paragraph of a description, i.e. the candidate metadata block
pub fn last_paragraph(description: &str) -> Option<String> {
    split_paragraphs(description).pop()
}

/// Derive a human readable title from a package name
///
/// `harbour-myapp` becomes `Myapp`, `libfoo-devel` becomes
/// `Foo (library) (development files)`.
pub fn name_to_title(name: &str) -> String {
    let mut parts: Vec<String> = name.split('-').map(str::to_string).collect();

    if parts.len() > 1 && (parts[0] == "harbour" || parts[0] == "openrepos") {
        parts.remove(0);
    }

    let library = match parts[0].strip_prefix("lib") {
        Some(stripped) => {
            parts[0] = stripped.to_string();
            true
        }
        None => false,
    };

    let devel = parts.last().is_some_and(|last| last == "devel");
    if devel {
        parts.pop();
    }
    if library {
        parts.push("(library)".to_string());
    }
    if devel {
        parts.push("(development files)".to_string());
    }

    parts
        .iter()
        .map(|part| capitalize(part))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character and lower-case the rest
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Split text into paragraphs on whitespace-only lines
///
/// Each paragraph keeps its lines joined by `\n`. Runs of blank lines never
/// produce empty paragraphs.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
}

/// Join paragraphs with a blank line, collapsing newlines inside each one
fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs
        .iter()
        .map(|paragraph| paragraph.replace('\n', " "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A YAML document decoded like `serde_yaml::Value`, except that a key
/// repeated within a mapping keeps its last value instead of failing
struct LastWins {
    value: Value,
    /// Repeated keys, nested ones included
    duplicates: Vec<String>,
}

impl LastWins {
    fn leaf(value: Value) -> Self {
        Self {
            value,
            duplicates: Vec::new(),
        }
    }
}

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LastWinsVisitor)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = LastWins;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::Number(v.into())))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::Number(v.into())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::Number(v.into())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::String(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::String(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::Null))
    }

    fn visit_none<E: de::Error>(self) -> Result<LastWins, E> {
        Ok(LastWins::leaf(Value::Null))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<LastWins, D::Error> {
        LastWins::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LastWins, A::Error> {
        let mut items = Vec::new();
        let mut duplicates = Vec::new();
        while let Some(item) = seq.next_element::<LastWins>()? {
            items.push(item.value);
            duplicates.extend(item.duplicates);
        }
        Ok(LastWins {
            value: Value::Sequence(items),
            duplicates,
        })
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LastWins, A::Error> {
        let mut mapping = Mapping::new();
        let mut duplicates = Vec::new();
        while let Some((key, value)) = map.next_entry::<LastWins, LastWins>()? {
            duplicates.extend(key.duplicates);
            duplicates.extend(value.duplicates);
            let label = scalar(&key.value).unwrap_or_else(|| kind(&key.value).to_string());
            if mapping.insert(key.value, value.value).is_some() {
                duplicates.push(label);
            }
        }
        Ok(LastWins {
            value: Value::Mapping(mapping),
            duplicates,
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Empty string, list or mapping
fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

/// Scalars are accepted as text: `Title: 2048` is a valid title
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Typed lookups over one YAML mapping, collecting shape errors
struct Decoder<'a> {
    map: &'a Mapping,
    prefix: &'static str,
    errors: Vec<MetadataError>,
}

impl<'a> Decoder<'a> {
    fn new(map: &'a Mapping, prefix: &'static str) -> Self {
        Self {
            map,
            prefix,
            errors: Vec::new(),
        }
    }

    fn app_metadata(&mut self, name: &str) -> AppMetadata {
        let (repo_url, packaging_repo_url, markdown_url) = self.custom();

        AppMetadata {
            title: Some(
                self.first_string(&["Title", "PackageName"])
                    .unwrap_or_else(|| name_to_title(name)),
            ),
            package_type: self.package_type(),
            icon: self
                .first_string(&["PackageIcon", "Icon"])
                .map(RemoteImage::new),
            screenshots: self.screenshots(),
            developer_name: self.string("DeveloperName"),
            packager_name: self.string("PackagedBy"),
            repo_url,
            packaging_repo_url,
            markdown_url,
            links: self.links(),
            categories: self.categories(),
        }
    }

    /// Value of `key`, treating an explicit null as absent
    fn present(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn wrong_type(&mut self, key: &str, expected: &'static str, found: &Value) {
        self.errors.push(MetadataError::WrongType {
            field: format!("{}{}", self.prefix, key),
            expected,
            found: kind(found),
        });
    }

    /// Non-empty scalar value of `key`
    fn string(&mut self, key: &str) -> Option<String> {
        let value = self.present(key)?;
        match scalar(value) {
            Some(text) if text.is_empty() => None,
            Some(text) => Some(text),
            None => {
                self.wrong_type(key, "a string", value);
                None
            }
        }
    }

    fn first_string(&mut self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.string(key))
    }

    fn package_type(&mut self) -> Option<PackageType> {
        let raw = self.string("Type")?;
        match raw.parse() {
            Ok(package_type) => Some(package_type),
            Err(unknown) => {
                self.errors.push(MetadataError::UnknownType(unknown));
                None
            }
        }
    }

    fn screenshots(&mut self) -> Option<Vec<RemoteImage>> {
        let value = self.present("Screenshots")?;
        let Value::Sequence(items) = value else {
            self.wrong_type("Screenshots", "a list of URLs", value);
            return None;
        };

        let mut screenshots = Vec::with_capacity(items.len());
        for item in items {
            match scalar(item) {
                Some(url) => screenshots.push(RemoteImage::new(url)),
                None => {
                    self.wrong_type("Screenshots", "a list of URLs", item);
                    return None;
                }
            }
        }
        Some(screenshots)
    }

    /// `Custom` is either a mapping or a list of single-entry mappings
    fn custom(&mut self) -> (Option<String>, Option<String>, Option<String>) {
        let Some(value) = self.present("Custom") else {
            return (None, None, None);
        };

        let merged = match value {
            Value::Mapping(map) => map.clone(),
            Value::Sequence(items) => {
                let mut merged = Mapping::new();
                for item in items {
                    match item {
                        Value::Mapping(entry) => {
                            for (key, value) in entry {
                                merged.insert(key.clone(), value.clone());
                            }
                        }
                        other => self.wrong_type("Custom", "a mapping or a list of mappings", other),
                    }
                }
                merged
            }
            other => {
                self.wrong_type("Custom", "a mapping or a list of mappings", other);
                return (None, None, None);
            }
        };

        let mut custom = Decoder::new(&merged, "Custom.");
        let fields = (
            custom.string("Repo"),
            custom.string("PackagingRepo"),
            custom.string("DescriptionMD"),
        );
        self.errors.append(&mut custom.errors);
        fields
    }

    /// `Links`, or `Url` when `Links` is missing or empty, with lower-cased keys
    fn links(&mut self) -> Option<BTreeMap<String, String>> {
        let (key, value) = match self.present("Links").filter(|value| !is_blank(value)) {
            Some(value) => ("Links", value),
            None => ("Url", self.present("Url")?),
        };
        let Value::Mapping(map) = value else {
            self.wrong_type(key, "a mapping", value);
            return None;
        };

        let mut links = BTreeMap::new();
        for (label, url) in map {
            match (scalar(label), scalar(url)) {
                (Some(label), Some(url)) => {
                    links.insert(label.to_lowercase(), url);
                }
                (None, _) => {
                    self.wrong_type(key, "a mapping of strings", label);
                    return None;
                }
                (_, None) => {
                    self.wrong_type(key, "a mapping of strings", url);
                    return None;
                }
            }
        }
        Some(links)
    }

    fn categories(&mut self) -> Option<BTreeSet<PackageCategory>> {
        let value = self.present("Categories")?;
        let Value::Sequence(items) = value else {
            self.wrong_type("Categories", "a list of categories", value);
            return None;
        };

        let mut categories = BTreeSet::new();
        for item in items {
            let Value::String(raw) = item else {
                self.wrong_type("Categories", "a list of categories", item);
                return None;
            };
            match raw.parse() {
                Ok(category) => {
                    categories.insert(category);
                }
                Err(unknown) => {
                    self.errors.push(MetadataError::UnknownCategory(unknown));
                    return None;
                }
            }
        }

        if categories.is_empty() {
            self.errors.push(MetadataError::Empty {
                field: "Categories",
            });
            return None;
        }
        Some(categories)
    }
}
