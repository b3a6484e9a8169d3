// src/repository/remote.rs

//! Long descriptions hosted outside the repository
//!
//! Packages may point to a Markdown document (`Custom.DescriptionMD`) that
//! replaces the short description from the index on the package page.

use super::client::RepositoryClient;
use crate::packages::{Description, Package};
use crate::progress::ProgressTracker;
use pulldown_cmark::{Event, Options, Parser, html};
use tracing::{info, warn};

/// Render Markdown to HTML, dropping any raw HTML in the input
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let events = Parser::new_ext(markdown, options)
        .filter(|event| !matches!(event, Event::Html(_) | Event::InlineHtml(_)));

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Replace the description of every package with a `markdown_url`
///
/// Packages are visited in slice order. A package whose document cannot be
/// fetched keeps its description. Returns the number of descriptions
/// replaced.
pub fn load_remote_descriptions(
    packages: &mut [Package],
    client: &RepositoryClient,
    progress: &dyn ProgressTracker,
) -> usize {
    let step = progress.begin_step("Downloading remote descriptions");
    let total = packages.iter().filter(|p| p.markdown_url.is_some()).count();
    let mut loaded = 0;

    let with_markdown = packages.iter_mut().filter(|p| p.markdown_url.is_some());
    for (position, package) in with_markdown.enumerate() {
        let Some(url) = package.markdown_url.as_deref() else {
            continue;
        };
        progress.step_progress(step, &package.name, position, total);

        match client.fetch_text(url) {
            Ok(markdown) => {
                package.description = Some(Description::Html(render_markdown(&markdown)));
                loaded += 1;
            }
            Err(e) => warn!("Could not load description of {} from {}: {}", package.name, url, e),
        }
    }

    info!("Loaded {} of {} remote descriptions", loaded, total);
    loaded
}
