// src/version/mod.rs

//! RPM package versions as found in repository metadata
//!
//! Versions are taken verbatim from the `epoch`, `ver` and `rel` attributes of
//! a `<version>` tag. They are opaque strings: nothing is validated or
//! normalized, they are only formatted for display.

use serde::Serialize;
use std::fmt;

/// Version of a package: epoch, version and release
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PackageVersion {
    pub epoch: String,
    pub ver: String,
    pub rel: String,
}

impl PackageVersion {
    /// Create a version from the raw attribute values
    pub fn new(epoch: impl Into<String>, ver: impl Into<String>, rel: impl Into<String>) -> Self {
        Self {
            epoch: epoch.into(),
            ver: ver.into(),
            rel: rel.into(),
        }
    }

    /// Version without build metadata
    ///
    /// Everything from the first `+` in `ver` on is dropped, so
    /// `1.2.3+git1` becomes `1.2.3`.
    pub fn to_short_str(&self) -> &str {
        match self.ver.split_once('+') {
            Some((short, _)) => short,
            None => &self.ver,
        }
    }

    /// Version and release joined with a dash, e.g. `1.2.3+git1-1`
    pub fn to_full_str(&self) -> String {
        format!("{}-{}", self.ver, self.rel)
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ver, self.rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_and_short_version() {
        let version = PackageVersion::new("", "1.2.3+git1", "1");
        assert_eq!(version.to_full_str(), "1.2.3+git1-1");
        assert_eq!(version.to_short_str(), "1.2.3");
    }

    #[test]
    fn test_short_version_without_build_metadata() {
        let version = PackageVersion::new("0", "0.9", "1.2.1.jolla");
        assert_eq!(version.to_short_str(), "0.9");
        assert_eq!(version.to_string(), "0.9-1.2.1.jolla");
    }

    #[test]
    fn test_short_version_cuts_at_first_plus() {
        let version = PackageVersion::new("", "2.0+git3+extra", "1");
        assert_eq!(version.to_short_str(), "2.0");
    }

    #[test]
    fn test_empty_version() {
        let version = PackageVersion::default();
        assert_eq!(version.to_short_str(), "");
        assert_eq!(version.to_full_str(), "-");
    }
}
