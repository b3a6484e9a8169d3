// src/packages/types.rs

//! Value types shared by package records

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Type of the application a package provides
///
/// Values follow the AppStream `Type` field, see
/// <https://www.freedesktop.org/software/appstream/docs/sect-AppStream-YAML.html#field-dep11-type>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageType {
    #[default]
    Generic,
    ConsoleApplication,
    DesktopApplication,
    Addon,
    Codec,
    Inputmethod,
    Firmware,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::ConsoleApplication => "console-application",
            Self::DesktopApplication => "desktop-application",
            Self::Addon => "addon",
            Self::Codec => "codec",
            Self::Inputmethod => "inputmethod",
            Self::Firmware => "firmware",
        }
    }
}

impl FromStr for PackageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(Self::Generic),
            "console-application" => Ok(Self::ConsoleApplication),
            "desktop-application" => Ok(Self::DesktopApplication),
            "addon" => Ok(Self::Addon),
            "codec" => Ok(Self::Codec),
            "inputmethod" => Ok(Self::Inputmethod),
            "firmware" => Ok(Self::Firmware),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Desktop application categories
///
/// From <https://specifications.freedesktop.org/menu-spec/latest/apa.html>,
/// plus `Accessibility`, `Library` and `Maps` which Chum packages use as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum PackageCategory {
    Accessibility,
    AudioVideo,
    Audio,
    Video,
    Development,
    Education,
    Game,
    Graphics,
    Library,
    Maps,
    Network,
    Office,
    Science,
    Settings,
    System,
    Utility,
    Other,
}

impl PackageCategory {
    pub const ALL: [PackageCategory; 17] = [
        Self::Accessibility,
        Self::AudioVideo,
        Self::Audio,
        Self::Video,
        Self::Development,
        Self::Education,
        Self::Game,
        Self::Graphics,
        Self::Library,
        Self::Maps,
        Self::Network,
        Self::Office,
        Self::Science,
        Self::Settings,
        Self::System,
        Self::Utility,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accessibility => "Accessibility",
            Self::AudioVideo => "AudioVideo",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Development => "Development",
            Self::Education => "Education",
            Self::Game => "Game",
            Self::Graphics => "Graphics",
            Self::Library => "Library",
            Self::Maps => "Maps",
            Self::Network => "Network",
            Self::Office => "Office",
            Self::Science => "Science",
            Self::Settings => "Settings",
            Self::System => "System",
            Self::Utility => "Utility",
            Self::Other => "Other",
        }
    }
}

impl FromStr for PackageCategory {
    type Err = String;

    /// Parse the exact (case-sensitive) category name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image on a remote server that may be cached locally later on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteImage {
    pub remote_url: String,
    /// Path of the locally cached (and scaled) copy, once one exists
    pub local_path: Option<String>,
}

impl RemoteImage {
    pub fn new(remote_url: impl Into<String>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_path: None,
        }
    }
}

/// Package description, either as found in the index or rendered from Markdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    /// Plain text, paragraphs separated by blank lines
    Plain(String),
    /// Sanitized HTML rendered from a remote Markdown document
    Html(String),
}

impl Description {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Html(text) => text,
        }
    }
}

/// One entry of a package changelog, from `other.xml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub date: DateTime<Utc>,
    pub author: String,
    pub text: String,
}

/// Architecture-specific data of one package build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchBuild {
    /// Size of the RPM file in bytes
    pub download_size: Option<u64>,
    /// Size of the installed files in bytes
    pub install_size: Option<u64>,
    /// Location of the RPM relative to the repository root
    pub download_url: Option<String>,
    pub checksum_type: Option<String>,
    pub checksum_value: Option<String>,
}

/// Parse a Unix timestamp as used in repository metadata (`1700000000` or
/// `1700000000.5`)
pub(crate) fn parse_unix_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let nanos = (seconds.fract() * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(seconds.trunc() as i64, nanos)
}
