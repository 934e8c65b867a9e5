use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::RepositoryResolver;
use crate::error::ResolveError;
use crate::models::LibraryRecord;

const DEFAULT_PROXY: &str = "https://proxy.golang.org";

/// Response of the module proxy `/@v/<version>.info` endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ModuleInfo {
    #[serde(default, rename = "Origin", alias = "origin")]
    pub origin: Origin,
}

#[derive(Debug, Default, Deserialize)]
pub struct Origin {
    #[serde(default, rename = "URL", alias = "url")]
    pub url: String,
}

/// Resolves Go modules through a module proxy.
pub struct GoProxyResolver {
    client: Client,
    base_url: String,
}

impl GoProxyResolver {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Use the first HTTP(S) proxy listed in `GOPROXY`, or proxy.golang.org.
    pub fn from_env(client: Client) -> Self {
        let goproxy = std::env::var("GOPROXY").ok();
        Self::new(client, proxy_from_goproxy(goproxy.as_deref()))
    }
}

#[async_trait]
impl RepositoryResolver for GoProxyResolver {
    async fn lookup(&self, record: &LibraryRecord) -> Result<String, ResolveError> {
        let (module, version) = match record.raw_others.as_slice() {
            [module, version, ..] => (module, version),
            _ => return Err(ResolveError::MissingCoordinates(record.name.clone())),
        };

        let url = format!(
            "{}/{}/@v/{}.info",
            self.base_url,
            escape_case(module),
            escape_case(version)
        );
        tracing::debug!("Fetching: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ResolveError::NotAGitHubRepository);
        }

        let body = response.text().await?;
        let info: ModuleInfo = serde_json::from_str(&body)?;

        go_repository_url(module, &info)
    }
}

/// Pick the GitHub URL for `module_path` from a proxy info response.
///
/// The proxy's `Origin.URL` wins when present. Modules without origin data
/// whose path is itself on github.com fall back to `https://<module_path>`.
pub fn go_repository_url(module_path: &str, info: &ModuleInfo) -> Result<String, ResolveError> {
    let origin = info.origin.url.as_str();

    if !origin.is_empty() {
        if origin.contains("github.com") {
            return Ok(origin.to_string());
        }
        return Err(ResolveError::NotAGitHubRepository);
    }

    if module_path.contains("github.com") {
        return Ok(format!("https://{}", module_path));
    }

    Err(ResolveError::NotAGitHubRepository)
}

/// Module proxy case encoding: every upper-case letter becomes `!` + lower-case.
fn escape_case(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            escaped.push('!');
            escaped.push(c.to_ascii_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn proxy_from_goproxy(goproxy: Option<&str>) -> String {
    goproxy
        .into_iter()
        .flat_map(|value| value.split([',', '|']))
        .map(str::trim)
        .find(|entry| entry.starts_with("https://") || entry.starts_with("http://"))
        .unwrap_or(DEFAULT_PROXY)
        .trim_end_matches('/')
        .to_string()
}
