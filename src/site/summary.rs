// src/site/summary.rs

//! Job summary
//!
//! A Markdown report of the run, meant for CI job summaries: package counts,
//! packages whose embedded metadata could not be decoded, and apps without an
//! icon (usually a sign of broken metadata too).

use crate::config::Config;
use crate::error::{Error, Result};
use crate::repository::RepoInfo;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Small Markdown emitter
pub struct MarkdownWriter<W: Write> {
    out: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// A mermaid pie chart
    pub fn mermaid_pie(&mut self, title: &str, data: &[(&str, usize)]) -> Result<()> {
        writeln!(self.out, "```mermaid")?;
        writeln!(self.out, "pie showData")?;
        writeln!(self.out, "\ttitle {title}")?;
        for (name, count) in data {
            writeln!(self.out, "\t\"{name}\": {count}")?;
        }
        writeln!(self.out, "```")?;
        Ok(())
    }

    pub fn header(&mut self, title: &str, level: usize) -> Result<()> {
        writeln!(self.out, "{} {}", "#".repeat(level), title)?;
        Ok(())
    }

    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        write!(self.out, "{text}\n\n")?;
        Ok(())
    }

    pub fn table(&mut self, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        writeln!(self.out, "| {} |", header.join(" | "))?;
        writeln!(self.out, "|{}|", vec!["---"; header.len()].join("|"))?;
        for row in rows {
            writeln!(self.out, "| {} |", row.join(" | "))?;
        }
        Ok(())
    }

    pub fn list(&mut self, items: &[&str]) -> Result<()> {
        for item in items {
            writeln!(self.out, "  * {item}")?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Write the report of `repo` to `out`
pub fn render_job_summary<W: Write>(out: W, repo: &RepoInfo, config: &Config) -> Result<W> {
    let packages = &repo.packages;
    let package_count = packages.len();
    let app_count = packages.iter().filter(|p| p.is_app()).count();
    let with_errors: Vec<_> = packages
        .iter()
        .filter(|p| !p.debug_yaml_errors.is_empty())
        .collect();
    let without_icon: Vec<&str> = packages
        .iter()
        .filter(|p| p.is_app() && p.icon.is_none())
        .map(|p| p.name.as_str())
        .collect();

    let mut md = MarkdownWriter::new(out);
    md.header("Output report", 1)?;
    md.paragraph(&format!("Chum has run! Visit it at {}", config.public_url))?;

    md.header("Package statistics", 2)?;
    md.mermaid_pie(
        "Apps and packages",
        &[("Apps", app_count), ("Packages", package_count - app_count)],
    )?;

    md.header("Metadata errors", 2)?;
    md.mermaid_pie(
        "Packages with metadata errors",
        &[
            ("No error", package_count - with_errors.len()),
            ("Error", with_errors.len()),
        ],
    )?;
    md.paragraph("List of packages with errors:")?;
    let rows: Vec<Vec<String>> = with_errors
        .iter()
        .map(|p| {
            let errors: Vec<String> = p.debug_yaml_errors.iter().map(|e| e.to_string()).collect();
            vec![p.name.clone(), errors.join(", ")]
        })
        .collect();
    md.table(&["Package name", "Errors"], &rows)?;

    md.paragraph(
        "Apps without icons are also a pretty good indicator that the metadata could not be \
         read, since most apps have an icon. Here is an overview of apps without icon",
    )?;
    md.mermaid_pie(
        "App icon overview",
        &[
            ("Apps with icon", app_count - without_icon.len()),
            ("Apps without icon", without_icon.len()),
        ],
    )?;
    md.paragraph("List of apps without icon:")?;
    md.list(&without_icon)?;

    Ok(md.into_inner())
}

/// Write the report of `repo` to `path`
pub fn write_job_summary(path: &Path, repo: &RepoInfo, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let out = render_job_summary(BufWriter::new(File::create(path)?), repo, config)?;
    out.into_inner()
        .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
    Ok(())
}
