//! Repository metadata from the GitHub REST API.
//!
//! Two requests per repository: `GET /repos/{owner}/{repo}` for the counters
//! and `GET /repos/{owner}/{repo}/commits/{default_branch}` for the date of the
//! latest commit.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ScoreWeights;
use crate::error::FetchError;
use crate::models::RepositoryMetadata;
use crate::score::score;

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RepoData {
    subscribers_count: u64,
    stargazers_count: u64,
    forks_count: u64,
    open_issues_count: u64,
    archived: bool,
    default_branch: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommitData {
    commit: CommitDetail,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CommitDetail {
    committer: Committer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Committer {
    date: String,
}

#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Fetch the raw (unscored) metadata of one repository URL.
    async fn fetch(&self, repository_url: &str) -> Result<RepositoryMetadata, FetchError>;
}

pub struct GitHubClient {
    client: Client,
    token: String,
}

impl GitHubClient {
    pub fn new(client: Client, token: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        tracing::debug!("Fetching: {}", url);

        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl MetadataFetcher for GitHubClient {
    async fn fetch(&self, repository_url: &str) -> Result<RepositoryMetadata, FetchError> {
        let (owner, repo) = parse_repo_url(repository_url)?;

        let repo_data: RepoData = self
            .get_json(&format!("{}/repos/{}/{}", GITHUB_API, owner, repo))
            .await?;

        let commit: CommitData = self
            .get_json(&format!(
                "{}/repos/{}/{}/commits/{}",
                GITHUB_API, owner, repo, repo_data.default_branch
            ))
            .await?;

        Ok(to_metadata(repository_url, repo_data, commit.commit.committer.date))
    }
}

fn to_metadata(source_url: &str, repo: RepoData, last_commit_date: String) -> RepositoryMetadata {
    RepositoryMetadata {
        source_url: source_url.to_string(),
        watchers: repo.subscribers_count,
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        open_issues: repo.open_issues_count,
        last_commit_date,
        archived: repo.archived,
        score: None,
        skip: false,
        skip_reason: String::new(),
    }
}

/// Extract `(owner, repo)` from a GitHub URL.
///
/// Accepts `https://github.com/o/r`, trailing `/`, `.git`, `/tree/<ref>/...`
/// subpaths, `#fragment`/`?query` suffixes and `git@github.com:o/r` remotes.
pub fn parse_repo_url(url: &str) -> Result<(String, String), FetchError> {
    let invalid = || FetchError::InvalidRepositoryUrl(url.to_string());

    let (_, after_host) = url.split_once("github.com").ok_or_else(invalid)?;
    let path = after_host
        .trim_start_matches([':', '/'])
        .split(['#', '?'])
        .next()
        .unwrap_or_default();

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next().ok_or_else(invalid)?;
    let repo = segments
        .next()
        .map(|r| r.trim_end_matches(".git"))
        .filter(|r| !r.is_empty())
        .ok_or_else(invalid)?;

    Ok((owner.to_string(), repo.to_string()))
}

/// Fetch and score metadata for each distinct URL, in first-appearance order.
///
/// A failed fetch yields a skipped entry without a score; it never aborts the
/// remaining fetches.
pub async fn collect_metadata(
    fetcher: &dyn MetadataFetcher,
    urls: &[String],
    weights: &ScoreWeights,
    now: DateTime<Utc>,
    progress: Option<&ProgressBar>,
) -> Vec<RepositoryMetadata> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut results = Vec::new();

    for url in urls {
        if !seen.insert(url.as_str()) {
            continue;
        }
        if let Some(pb) = progress {
            pb.set_message(url.clone());
        }

        let metadata = match fetcher.fetch(url).await {
            Ok(mut metadata) => {
                metadata.source_url = url.clone();
                score(&mut metadata, weights, now);
                metadata
            }
            Err(err) => {
                tracing::warn!("Failed fetching {}, error details: {}", url, err);
                RepositoryMetadata::failed(url.as_str())
            }
        };
        results.push(metadata);

        if let Some(pb) = progress {
            pb.inc(1);
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Mutex;

    struct StubFetcher {
        calls: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MetadataFetcher for StubFetcher {
        async fn fetch(&self, repository_url: &str) -> Result<RepositoryMetadata, FetchError> {
            self.calls.lock().unwrap().push(repository_url.to_string());
            if repository_url.contains("broken") {
                return Err(FetchError::InvalidRepositoryUrl(repository_url.to_string()));
            }
            Ok(RepositoryMetadata {
                stars: 100,
                last_commit_date: "2024-06-01T00:00:00Z".to_string(),
                ..RepositoryMetadata::default()
            })
        }
    }

    #[test]
    fn test_parse_repo_url_variants() {
        let cases = [
            "https://github.com/user/repo",
            "https://github.com/user/repo/",
            "https://github.com/user/repo.git",
            "https://github.com/user/repo/tree/main",
            "http://github.com/user/repo/tree/main/subdir",
            "https://github.com/user/repo#readme",
            "https://github.com/user/repo?tab=readme",
            "git+https://github.com/user/repo.git",
            "git://github.com/user/repo.git",
            "git@github.com:user/repo.git",
            "https://www.github.com/user/repo",
        ];
        for case in cases {
            let (owner, repo) = parse_repo_url(case).unwrap();
            assert_eq!((owner.as_str(), repo.as_str()), ("user", "repo"), "{}", case);
        }
    }

    #[test]
    fn test_parse_repo_url_rejects() {
        for case in ["https://gitlab.com/user/repo", "https://github.com/user", "https://github.com/"] {
            assert!(
                matches!(parse_repo_url(case), Err(FetchError::InvalidRepositoryUrl(_))),
                "{}",
                case
            );
        }
    }

    #[test]
    fn test_repo_data_mapping() {
        let repo: RepoData = serde_json::from_str(
            r#"{"name":"r","subscribers_count":1,"stargazers_count":2,"forks_count":3,
                "open_issues_count":4,"archived":true,"default_branch":"main","private":false}"#,
        )
        .unwrap();
        assert_eq!(repo.default_branch, "main");

        let meta = to_metadata("https://github.com/u/r", repo, "2024-01-01T00:00:00Z".to_string());
        assert_eq!(
            (meta.watchers, meta.stars, meta.forks, meta.open_issues),
            (1, 2, 3, 4)
        );
        assert!(meta.archived);
        assert_eq!(meta.last_commit_date, "2024-01-01T00:00:00Z");
        assert_eq!(meta.score, None);
    }

    #[test]
    fn test_commit_data_mapping() {
        let commit: CommitData = serde_json::from_str(
            r#"{"sha":"abc","commit":{"committer":{"name":"n","date":"2024-03-04T05:06:07Z"}}}"#,
        )
        .unwrap();
        assert_eq!(commit.commit.committer.date, "2024-03-04T05:06:07Z");
    }

    #[tokio::test]
    async fn test_collect_metadata_scores_dedupes_and_skips() {
        let fetcher = StubFetcher::new();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let urls = vec![
            "https://github.com/u/a".to_string(),
            "https://github.com/u/broken".to_string(),
            "https://github.com/u/a".to_string(),
        ];

        let results =
            collect_metadata(&fetcher, &urls, &ScoreWeights::default(), now, None).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].source_url, "https://github.com/u/a");
        assert_eq!(results[0].score, Some(10));
        assert!(!results[0].skip);

        assert_eq!(results[1].source_url, "https://github.com/u/broken");
        assert!(results[1].skip);
        assert_eq!(
            results[1].skip_reason,
            "Failed fetching https://github.com/u/broken from GitHub"
        );
        assert_eq!(results[1].score, None);

        assert_eq!(fetcher.calls.lock().unwrap().len(), 2);
    }
}
