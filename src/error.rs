// src/error.rs

//! Error types for chumweb
//!
//! Structural failures (unreachable repository listing, corrupt index files,
//! inconsistent debug packages) are returned as [`Error`] and abort the run.
//! Problems with the metadata embedded in package descriptions are not errors
//! in this sense: they are collected per package as
//! [`MetadataError`](crate::packages::MetadataError) diagnostics.

use thiserror::Error;

/// Errors that abort generation
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to set up a component (HTTP client, output directories)
    #[error("Initialization error: {0}")]
    InitError(String),

    /// Failed to read or write a local file
    #[error("I/O error: {0}")]
    IoError(String),

    /// HTTP request failed or returned a non-success status
    #[error("Download error: {0}")]
    DownloadError(String),

    /// Malformed XML or other unparseable input
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Repository identifier not of the form `{version}_{arch}`
    #[error("Invalid repository name '{0}': expected '<version>_<arch>' with a numeric version")]
    InvalidRepoName(String),

    /// A `-debuginfo`/`-debugsource` package without its base package
    #[error("Debug package '{debug_name}' has no base package '{base_name}' in repository index")]
    MissingDebugBase {
        debug_name: String,
        base_name: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the chumweb error
pub type Result<T> = std::result::Result<T, Error>;
