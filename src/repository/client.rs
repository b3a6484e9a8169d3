// src/repository/client.rs

//! HTTP client for repository operations
//!
//! Thin wrapper around the blocking reqwest client. Requests are made once;
//! a failed request is reported to the caller, which decides whether the run
//! can continue.

use super::parsers::parse_obs_entries;
use crate::error::{Error, Result};
use indicatif::ProgressBar;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, info};

/// Buffer size for streaming downloads (8 KB)
const STREAM_BUFFER_SIZE: usize = 8192;

/// Login for the Open Build Service API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: Option<String>,
}

/// Stream HTTP response to file with optional progress tracking
///
/// Always streams data in chunks, never buffering the entire response in memory.
fn stream_response_to_file(
    mut response: Response,
    file: &mut File,
    total_size: u64,
    progress_bar: Option<&ProgressBar>,
    display_name: &str,
) -> Result<u64> {
    if let Some(pb) = progress_bar {
        if total_size > 0 {
            pb.set_length(total_size);
            pb.set_message(display_name.to_string());
        } else {
            // Unknown size - show bytes downloaded without percentage
            pb.set_message(format!("{} (unknown size)", display_name));
        }
    }

    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; STREAM_BUFFER_SIZE];

    loop {
        let bytes_read = response
            .read(&mut buffer)
            .map_err(|e| Error::IoError(format!("Failed to read response: {e}")))?;

        if bytes_read == 0 {
            break;
        }

        file.write_all(&buffer[..bytes_read])
            .map_err(|e| Error::IoError(format!("Failed to write data: {e}")))?;

        downloaded += bytes_read as u64;

        if let Some(pb) = progress_bar {
            pb.set_position(downloaded);
        }
    }

    Ok(downloaded)
}

/// Fail on any non-success status
fn check_status(response: Response, url: &str) -> Result<Response> {
    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "HTTP {} from {}",
            response.status(),
            url
        )));
    }
    Ok(response)
}

/// HTTP client shared by all network operations of a run
pub struct RepositoryClient {
    client: Client,
}

impl RepositoryClient {
    /// Create a client sending `user_agent` with every request
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {}", url, e)))?;
        check_status(response, url)
    }

    /// Names of all repositories of an OBS project
    ///
    /// `obs_url` is the API root and must end with a `/`.
    pub fn list_obs_project_repos(
        &self,
        obs_url: &str,
        project: &str,
        credentials: &Credentials,
    ) -> Result<Vec<String>> {
        let url = format!("{obs_url}build/{project}");
        info!("Listing repositories of {}", project);

        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.user, credentials.password.as_ref())
            .header(ACCEPT, "application/xml;charset=utf-8")
            .send()
            .map_err(|e| Error::DownloadError(format!("Failed to fetch {}: {}", url, e)))?;
        let body = check_status(response, &url)?
            .bytes()
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {}", e)))?;

        parse_obs_entries(&body[..], &url)
    }

    /// Download a URL to bytes
    pub fn download_to_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let bytes = self
            .get(url)?
            .bytes()
            .map_err(|e| Error::DownloadError(format!("Failed to read response: {}", e)))?;

        Ok(bytes.to_vec())
    }

    /// Download a URL as text
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        self.get(url)?
            .text()
            .map_err(|e| Error::DownloadError(format!("Failed to read response from {}: {}", url, e)))
    }

    /// Download a file with optional progress bar display
    ///
    /// The data is written to a temporary file next to `dest_path` and moved
    /// into place once complete.
    pub fn download_file_with_progress(
        &self,
        url: &str,
        dest_path: &Path,
        display_name: &str,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<()> {
        info!("Downloading {} to {}", url, dest_path.display());

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::IoError(format!("Failed to create directory {}: {e}", parent.display()))
            })?;
        }

        let response = self.get(url)?;
        let total_size = response.content_length().unwrap_or(0);

        let temp_path = dest_path.with_extension("tmp");
        let mut file = File::create(&temp_path).map_err(|e| {
            Error::IoError(format!("Failed to create file {}: {e}", temp_path.display()))
        })?;

        let downloaded =
            stream_response_to_file(response, &mut file, total_size, progress_bar, display_name)?;

        if let Some(pb) = progress_bar {
            pb.finish_with_message(format!("{} [done]", display_name));
        }

        debug!("Downloaded {} bytes", downloaded);

        fs::rename(&temp_path, dest_path).map_err(|e| {
            Error::IoError(format!(
                "Failed to move {} to {}: {e}",
                temp_path.display(),
                dest_path.display()
            ))
        })?;

        Ok(())
    }
}
