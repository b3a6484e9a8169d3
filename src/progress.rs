// src/progress.rs

//! Shared progress tracking trait and implementations
//!
//! A run is a sequence of steps (listing repositories, downloading indexes,
//! parsing, writing output). Each step may report the position of the task it
//! is working on. Progress is purely observational: nothing reads it back.
//!
//! Implementations:
//! - `CliProgress`: step headers on stdout, byte bars for downloads (indicatif)
//! - `LogProgress`: logs progress to tracing
//! - `SilentProgress`: no-op for tests and quiet mode
//!
//! # Example
//!
//! ```ignore
//! use chumweb::progress::{CliProgress, ProgressTracker};
//!
//! let progress = CliProgress::new();
//! let step = progress.begin_step("Parsing repositories");
//! for (i, repo) in repos.iter().enumerate() {
//!     progress.step_progress(step, repo, i, repos.len());
//! }
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Handle of a step returned by [`ProgressTracker::begin_step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepId(usize);

/// Core trait for progress tracking
pub trait ProgressTracker: Send + Sync {
    /// Start a new step; the previous step is implicitly finished
    fn begin_step(&self, name: &str) -> StepId;

    /// Report that `step` is working on task `position` of `total`
    ///
    /// Ignored once another step has begun.
    fn step_progress(&self, step: StepId, task: &str, position: usize, total: usize);

    /// Byte progress bar for a download, if this tracker displays one
    fn download_bar(&self, _name: &str) -> Option<ProgressBar> {
        None
    }
}

/// Numbering of steps shared by all trackers
#[derive(Debug, Default)]
struct StepCounter {
    current: AtomicUsize,
}

impl StepCounter {
    fn next(&self) -> StepId {
        StepId(self.current.fetch_add(1, Ordering::Relaxed) + 1)
    }

    fn is_current(&self, step: StepId) -> bool {
        self.current.load(Ordering::Relaxed) == step.0
    }
}

/// Silent progress tracker (no-op)
///
/// Still numbers steps, so callers behave the same as with any other tracker.
#[derive(Debug, Default)]
pub struct SilentProgress {
    steps: StepCounter,
}

impl SilentProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `step` is the most recently begun step
    pub fn is_current(&self, step: StepId) -> bool {
        self.steps.is_current(step)
    }
}

impl ProgressTracker for SilentProgress {
    fn begin_step(&self, _name: &str) -> StepId {
        self.steps.next()
    }

    fn step_progress(&self, _step: StepId, _task: &str, _position: usize, _total: usize) {}
}

/// Logging progress tracker
///
/// Logs step starts at info level and task positions at debug level.
#[derive(Debug, Default)]
pub struct LogProgress {
    steps: StepCounter,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressTracker for LogProgress {
    fn begin_step(&self, name: &str) -> StepId {
        let step = self.steps.next();
        info!("Step {}: {}", step.0, name);
        step
    }

    fn step_progress(&self, step: StepId, task: &str, position: usize, total: usize) {
        if self.steps.is_current(step) {
            tracing::debug!("({}/{}) {}", position + 1, total, task);
        }
    }
}

/// Terminal progress output
#[derive(Debug, Default)]
pub struct CliProgress {
    steps: StepCounter,
}

impl CliProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

fn step_line(name: &str) -> String {
    format!(":: {name}")
}

/// `position` is zero-based, the displayed position one-based
fn task_line(task: &str, position: usize, total: usize) -> String {
    format!(" - ({}/{}) {}", position + 1, total, task)
}

impl ProgressTracker for CliProgress {
    fn begin_step(&self, name: &str) -> StepId {
        println!("{}", step_line(name));
        self.steps.next()
    }

    fn step_progress(&self, step: StepId, task: &str, position: usize, total: usize) {
        if self.steps.is_current(step) {
            println!("{}", task_line(task, position, total));
        }
    }

    fn download_bar(&self, name: &str) -> Option<ProgressBar> {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        let pb = ProgressBar::new(0);
        pb.set_style(style);
        pb.set_message(name.to_string());
        Some(pb)
    }
}
