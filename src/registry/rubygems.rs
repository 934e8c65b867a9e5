use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::RepositoryResolver;
use crate::error::ResolveError;
use crate::models::LibraryRecord;

const RUBYGEMS_API: &str = "https://rubygems.org/api/v1/gems";

/// Subset of the rubygems.org `gems/<name>.json` response.
#[derive(Debug, Default, Deserialize)]
pub struct GemInfo {
    #[serde(default)]
    pub source_code_uri: Option<String>,
    #[serde(default)]
    pub homepage_uri: Option<String>,
}

/// Resolves gems through the rubygems.org API.
pub struct RubyGemsResolver {
    client: Client,
}

impl RubyGemsResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RepositoryResolver for RubyGemsResolver {
    async fn lookup(&self, record: &LibraryRecord) -> Result<String, ResolveError> {
        let url = format!("{}/{}.json", RUBYGEMS_API, record.name);
        tracing::debug!("Fetching: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ResolveError::NotAGitHubRepository);
        }

        let body = response.text().await?;
        let info: GemInfo = serde_json::from_str(&body)?;

        gem_repository_url(&info)
    }
}

/// Prefer `source_code_uri`, fall back to `homepage_uri`; only GitHub URLs pass.
pub fn gem_repository_url(info: &GemInfo) -> Result<String, ResolveError> {
    let url = non_empty(&info.source_code_uri)
        .or_else(|| non_empty(&info.homepage_uri))
        .ok_or(ResolveError::NotAGitHubRepository)?;

    if !url.contains("github.com") {
        return Err(ResolveError::NotAGitHubRepository);
    }
    Ok(url.to_string())
}

fn non_empty(uri: &Option<String>) -> Option<&str> {
    uri.as_deref().filter(|u| !u.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(json: &str) -> GemInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_source_code_uri_preferred() {
        let info = info(
            r#"{"name":"rails","source_code_uri":"https://github.com/rails/rails/tree/v7.1.3",
                "homepage_uri":"https://rubyonrails.org"}"#,
        );
        assert_eq!(
            gem_repository_url(&info).unwrap(),
            "https://github.com/rails/rails/tree/v7.1.3"
        );
    }

    #[test]
    fn test_homepage_fallback() {
        let null_source = info(r#"{"source_code_uri":null,"homepage_uri":"https://github.com/puma/puma"}"#);
        assert_eq!(gem_repository_url(&null_source).unwrap(), "https://github.com/puma/puma");

        let empty_source = info(r#"{"source_code_uri":"","homepage_uri":"https://github.com/puma/puma"}"#);
        assert_eq!(gem_repository_url(&empty_source).unwrap(), "https://github.com/puma/puma");
    }

    #[test]
    fn test_non_github_homepage_rejected() {
        let info = info(r#"{"homepage_uri":"https://example.com/foo","source_code_uri":""}"#);
        assert!(matches!(
            gem_repository_url(&info),
            Err(ResolveError::NotAGitHubRepository)
        ));
    }

    #[test]
    fn test_no_uris_rejected() {
        assert!(matches!(
            gem_repository_url(&GemInfo::default()),
            Err(ResolveError::NotAGitHubRepository)
        ));
    }

    #[test]
    fn test_malformed_body_is_unmarshal_error() {
        let err: ResolveError = serde_json::from_str::<GemInfo>("not-json").unwrap_err().into();
        assert!(matches!(err, ResolveError::Unmarshal(_)));
    }
}
