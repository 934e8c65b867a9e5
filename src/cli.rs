use std::path::PathBuf;

use clap::Parser;

use crate::models::Ecosystem;

#[derive(Parser, Debug)]
#[command(
    name = "stay-or-go",
    about = "Score your dependencies by GitHub activity and decide which to keep",
    version
)]
pub struct Cli {
    /// Manifest ecosystem to analyze
    #[arg(value_name = "LANGUAGE")]
    pub language: LanguageArg,

    /// Manifest file [default: go.mod or Gemfile]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// GitHub access token
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true, value_name = "TOKEN")]
    pub github_token: Option<String>,

    /// Weights config file [default: ./.stay-or-go/weights.toml, fallback ~/.config/stay-or-go/weights.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS")]
    pub timeout: u64,

    /// Log request and resolved URLs
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Manifest path, falling back to the ecosystem's default file name.
    pub fn manifest_path(&self) -> PathBuf {
        self.input.clone().unwrap_or_else(|| {
            PathBuf::from(Ecosystem::from(&self.language).default_manifest())
        })
    }

    /// The token, if one was given and is not blank.
    pub fn token(&self) -> Option<&str> {
        self.github_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Markdown,
    Csv,
    Tsv,
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LanguageArg {
    Go,
    Ruby,
}

impl From<&LanguageArg> for Ecosystem {
    fn from(arg: &LanguageArg) -> Self {
        match arg {
            LanguageArg::Go => Ecosystem::Go,
            LanguageArg::Ruby => Ecosystem::Ruby,
        }
    }
}
