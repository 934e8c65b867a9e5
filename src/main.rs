//! `stay-or-go`: score a project's dependencies by the health of their
//! GitHub repositories.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and install the log subscriber.
//! 2. Load score weights ([`config::load_weights`]).
//! 3. Parse the manifest into library records ([`parser`]).
//! 4. Resolve each library to a GitHub URL through its registry ([`registry`]).
//! 5. Fetch and score repository metadata ([`github`], [`score`]).
//! 6. Join records with metadata ([`assembler`]) and render ([`report`]).
//!
//! Per-library failures only mark the row skipped; the table always renders.

mod app;
mod assembler;
mod cli;
mod config;
mod error;
mod github;
mod models;
mod parser;
mod registry;
mod report;
mod score;

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_weights;
use github::GitHubClient;
use models::Ecosystem;

const USER_AGENT: &str = concat!("stay-or-go/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(token) = cli.token() else {
        eprintln!("GITHUB_TOKEN is not set: pass --github-token or export GITHUB_TOKEN");
        std::process::exit(1);
    };

    let ecosystem = Ecosystem::from(&cli.language);
    let manifest = cli.manifest_path();
    let project_dir = manifest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let weights = load_weights(project_dir, cli.config.as_deref())?;
    tracing::debug!(?weights, "loaded score weights");

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("failed to build HTTP client")?;

    let parser = parser::for_ecosystem(ecosystem);
    let resolver = registry::for_ecosystem(ecosystem, client.clone());
    let fetcher = GitHubClient::new(client, token);

    let records = app::analyze(
        parser.as_ref(),
        resolver.as_ref(),
        &fetcher,
        &manifest,
        &weights,
        chrono::Utc::now(),
        !cli.quiet,
    )
    .await?;

    let skipped = records.iter().filter(|r| r.skip()).count();
    tracing::info!(
        language = %ecosystem,
        input = %manifest.display(),
        format = ?cli.format,
        total = records.len(),
        skipped,
        "analysis finished"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        ReportFormat::Markdown => report::plain::markdown(&records, &mut out)?,
        ReportFormat::Csv => report::plain::csv(&records, &mut out)?,
        ReportFormat::Tsv => report::plain::tsv(&records, &mut out)?,
        ReportFormat::Terminal => {
            report::terminal::render(&records, &mut out)?;
            if !cli.quiet {
                eprintln!("{}", report::terminal::summary(&records));
            }
        }
    }
    out.flush()?;

    Ok(())
}

/// `RUST_LOG` wins; otherwise `debug` with `--verbose` and `warn` without.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
