// src/main.rs

mod cli;

use anyhow::Result;
use chumweb::progress::CliProgress;
use chumweb::repository::{load_repo, RepositoryClient};
use chumweb::{site, Config};
use clap::Parser;
use cli::Cli;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.debug { "debug" } else { "info" };

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::from(cli);
    config.validate()?;

    let client = RepositoryClient::new(&config.user_agent_header())?;
    let progress = CliProgress::new();

    let repo = load_repo(&config, &client, &progress)?;
    info!(
        "Loaded {} packages from {} repositories (version {})",
        repo.packages.len(),
        repo.repos.len(),
        repo.version
    );

    site::generate(&repo, &config, &progress)?;

    Ok(())
}
