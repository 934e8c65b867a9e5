use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Coefficients applied to each repository signal when scoring.
///
/// Deserialized from `weights.toml` (or YAML/JSON). Keys that are absent keep
/// their [`Default`] value; unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub watchers: f64,
    pub stars: f64,
    pub forks: f64,
    pub open_issues: f64,
    /// Applied per day elapsed since the last commit on the default branch.
    #[serde(alias = "last_commit_date_days")]
    pub last_commit_date: f64,
    /// Applied once when the repository is archived.
    pub archived: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            watchers: 0.1,
            stars: 0.1,
            forks: 0.1,
            open_issues: 0.01,
            last_commit_date: -0.05,
            archived: -1_000_000.0,
        }
    }
}

/// Load the score weights, searching in order:
///
/// 1. `config_override`: path passed via `--config` (must exist)
/// 2. `<project_path>/.stay-or-go/weights.toml`
/// 3. `~/.config/stay-or-go/weights.toml`
/// 4. Built-in [`ScoreWeights::default`]
pub fn load_weights(
    project_path: &Path,
    config_override: Option<&Path>,
) -> Result<ScoreWeights, ConfigError> {
    if let Some(path) = config_override {
        return read_weights(path);
    }

    let project_config = project_path.join(".stay-or-go").join("weights.toml");
    if project_config.exists() {
        return read_weights(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("stay-or-go").join("weights.toml");
        if home_config.exists() {
            return read_weights(&home_config);
        }
    }

    Ok(ScoreWeights::default())
}

/// Read one weights file, picking the format from its extension.
pub fn read_weights(path: &Path) -> Result<ScoreWeights, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Some("yml" | "yaml") => {
            // An empty YAML document means "all defaults".
            if content.trim().is_empty() {
                return Ok(ScoreWeights::default());
            }
            serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))
        }
        Some("json") => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        _ => Err(ConfigError::UnsupportedFormat {
            path: PathBuf::from(path),
        }),
    }
}
