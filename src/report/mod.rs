//! Report renderers for analyzed dependencies.
//!
//! - [`plain`]: Markdown, CSV and TSV tables for piping or pasting.
//! - [`terminal`]: boxed, colored table with a summary line.
//!
//! Both render the same ordered [`COLUMNS`] list.

use crate::models::AnalyzedRecord;

pub mod plain;
pub mod terminal;

/// Placeholder for values a record does not have.
pub const MISSING: &str = "N/A";

pub type Extractor = fn(&AnalyzedRecord) -> Option<String>;

/// Report columns, in display order.
pub static COLUMNS: &[(&str, Extractor)] = &[
    ("Name", |r| r.name().map(str::to_string)),
    ("RepositoryUrl", |r| r.repository_url().map(str::to_string)),
    ("Watchers", |r| r.watchers().map(|v| v.to_string())),
    ("Stars", |r| r.stars().map(|v| v.to_string())),
    ("Forks", |r| r.forks().map(|v| v.to_string())),
    ("OpenIssues", |r| r.open_issues().map(|v| v.to_string())),
    ("LastCommitDate", |r| r.last_commit_date().map(str::to_string)),
    ("Archived", |r| r.archived().map(|v| v.to_string())),
    ("Score", |r| r.score().map(|v| v.to_string())),
    ("Skip", |r| Some(r.skip().to_string())),
    ("SkipReason", |r| r.skip_reason().map(str::to_string)),
];

pub fn headers() -> impl Iterator<Item = &'static str> {
    COLUMNS.iter().map(|(name, _)| *name)
}

/// Cell values of one record, with [`MISSING`] for absent fields.
pub fn row(record: &AnalyzedRecord) -> Vec<String> {
    COLUMNS
        .iter()
        .map(|(_, extract)| extract(record).unwrap_or_else(|| MISSING.to_string()))
        .collect()
}
