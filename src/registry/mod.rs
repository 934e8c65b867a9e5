//! Resolvers that map library records to GitHub repository URLs through the
//! ecosystem's package registry.
//!
//! Each resolver performs one lookup per record and returns
//! `Ok(url)` for GitHub-hosted libraries or a [`ResolveError`] otherwise.
//! [`resolve_all`] turns those errors into skip flags.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::ResolveError;
use crate::models::{Ecosystem, LibraryRecord, SKIP_NOT_ON_GITHUB};

pub mod go_proxy;
pub mod rubygems;

#[async_trait]
pub trait RepositoryResolver: Send + Sync {
    /// Look up the GitHub URL of one (unskipped) record.
    async fn lookup(&self, record: &LibraryRecord) -> Result<String, ResolveError>;
}

/// Build the resolver for `ecosystem`, sharing `client` for every lookup.
pub fn for_ecosystem(ecosystem: Ecosystem, client: Client) -> Box<dyn RepositoryResolver> {
    match ecosystem {
        Ecosystem::Go => Box::new(go_proxy::GoProxyResolver::from_env(client)),
        Ecosystem::Ruby => Box::new(rubygems::RubyGemsResolver::new(client)),
    }
}

/// Resolve every record in place, one lookup at a time.
///
/// Records that are already skipped are left untouched and never reach the
/// network. A failed lookup skips the record with a fixed reason; the error
/// detail only goes to the log.
pub async fn resolve_all(resolver: &dyn RepositoryResolver, records: &mut [LibraryRecord]) {
    for record in records.iter_mut().filter(|r| !r.skip) {
        match resolver.lookup(record).await {
            Ok(url) => {
                tracing::debug!(library = %record.name, %url, "resolved repository");
                record.repository_url = url;
            }
            Err(err) => {
                tracing::warn!(
                    "{} does not support libraries hosted outside of Github: {}",
                    record.name,
                    err
                );
                record.mark_skipped(SKIP_NOT_ON_GITHUB);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers from a fixed table and records which names were looked up.
    struct StubResolver {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RepositoryResolver for StubResolver {
        async fn lookup(&self, record: &LibraryRecord) -> Result<String, ResolveError> {
            self.calls.lock().unwrap().push(record.name.clone());
            match record.name.as_str() {
                "libone" => Ok("https://github.com/user/libone".to_string()),
                _ => Err(ResolveError::NotAGitHubRepository),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_all_sets_url_and_skips() {
        let resolver = StubResolver {
            calls: Mutex::new(Vec::new()),
        };
        let mut records = vec![
            LibraryRecord::new("libone", vec!["github.com/user/libone".into(), "v1.2.3".into()]),
            LibraryRecord::new("sdk", vec!["code.gitea.io/sdk".into(), "v1.0.0".into()]),
            LibraryRecord::skipped("mod", "replaced module"),
        ];

        resolve_all(&resolver, &mut records).await;

        assert_eq!(records[0].repository_url, "https://github.com/user/libone");
        assert!(!records[0].skip);

        assert!(records[1].skip);
        assert_eq!(
            records[1].skip_reason,
            "Does not support libraries hosted outside of Github"
        );
        assert!(records[1].repository_url.is_empty());

        assert_eq!(records[2].skip_reason, "replaced module");
        assert_eq!(*resolver.calls.lock().unwrap(), vec!["libone", "sdk"]);
    }

    #[tokio::test]
    async fn test_resolve_all_skipped_only_makes_no_calls() {
        let resolver = StubResolver {
            calls: Mutex::new(Vec::new()),
        };
        let mut records = vec![LibraryRecord::skipped("x", "Not hosted on Github")];

        resolve_all(&resolver, &mut records).await;

        assert!(resolver.calls.lock().unwrap().is_empty());
        assert_eq!(records[0].skip_reason, "Not hosted on Github");
    }
}
