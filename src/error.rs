//! Typed errors for the per-item boundaries of the pipeline.
//!
//! Startup code wraps these in [`anyhow::Error`]; per-item errors
//! ([`ResolveError`], [`FetchError`]) are logged and turned into skip flags.

use std::path::PathBuf;

use thiserror::Error;

/// The manifest file could not be opened or read.
#[derive(Debug, Error)]
#[error("failed to read manifest {}: {source}", path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Failure to map a library record to a GitHub repository URL.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("not a GitHub repository")]
    NotAGitHubRepository,

    #[error("failed to unmarshal registry response: {0}")]
    Unmarshal(#[from] serde_json::Error),

    #[error("registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0} has no module path/version to look up")]
    MissingCoordinates(String),
}

/// Failure to fetch repository metadata from GitHub.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot extract owner/repo from {0}")]
    InvalidRepositoryUrl(String),

    #[error("unexpected status code {status} for URL {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("request for {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode JSON response for URL {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The weights configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported configuration format: {} (expected .toml, .yml, .yaml or .json)", path.display())]
    UnsupportedFormat { path: PathBuf },
}
