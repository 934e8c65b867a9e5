//! The analysis pipeline: parse, resolve, fetch, assemble.

use std::path::Path;

use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::assembler::assemble;
use crate::config::ScoreWeights;
use crate::error::ReadError;
use crate::github::{collect_metadata, MetadataFetcher};
use crate::models::{AnalyzedRecord, LibraryRecord};
use crate::parser::ManifestParser;
use crate::registry::{resolve_all, RepositoryResolver};

/// Run the whole pipeline over one manifest.
///
/// Only reading the manifest can fail; every per-library failure ends up as a
/// skip flag on the returned record. The output keeps manifest order.
pub async fn analyze(
    parser: &dyn ManifestParser,
    resolver: &dyn RepositoryResolver,
    fetcher: &dyn MetadataFetcher,
    manifest: &Path,
    weights: &ScoreWeights,
    now: DateTime<Utc>,
    show_progress: bool,
) -> Result<Vec<AnalyzedRecord>, ReadError> {
    let mut records = parser.parse(manifest)?;
    tracing::debug!(count = records.len(), "parsed {}", manifest.display());

    resolve_all(resolver, &mut records).await;

    let urls = repository_urls(&records);
    if urls.is_empty() {
        return Ok(assemble(records, &[]));
    }

    let progress = show_progress.then(|| progress_bar(urls.len() as u64));
    let metadata = collect_metadata(fetcher, &urls, weights, now, progress.as_ref()).await;
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(assemble(records, &metadata))
}

/// URLs of unskipped records, in record order (duplicates kept).
fn repository_urls(records: &[LibraryRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.skip && !r.repository_url.is_empty())
        .map(|r| r.repository_url.clone())
        .collect()
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    // The template is static; fall back to the default style if it ever fails.
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
