// src/lib.rs

//! chumweb: package web site generator for SailfishOS:Chum
//!
//! Reads the RPM repository metadata of every architecture the Chum
//! repository is built for and turns it into one list of packages for the
//! web site.
//!
//! # Architecture
//!
//! - Repositories: listed on OBS, newest SailfishOS version only
//! - Indexes: `primary.xml` and `other.xml`, streamed, never held as a DOM
//! - Packages: one record per name, builds of every architecture merged in
//! - Metadata: YAML block at the end of the description, decoded leniently
//! - Output: package lists, search documents and index, Atom feeds and a
//!   Markdown job summary

pub mod config;
mod error;
pub mod packages;
pub mod progress;
pub mod repository;
pub mod site;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use packages::{Package, PackageMap};
pub use progress::{CliProgress, LogProgress, ProgressTracker, SilentProgress};
pub use repository::{RepoInfo, RepositoryClient, load_repo};
pub use version::PackageVersion;
