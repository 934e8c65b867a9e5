/// Reason attached to records whose registry lookup did not lead to GitHub.
pub const SKIP_NOT_ON_GITHUB: &str = "Does not support libraries hosted outside of Github";

/// One dependency declaration read from a manifest.
///
/// Created by a [`crate::parser::ManifestParser`] in file order. The resolver
/// fills in either `repository_url` or the skip fields, never both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryRecord {
    pub name: String,
    /// Manifest tokens the resolver needs (module path + version, gem options).
    pub raw_others: Vec<String>,
    pub skip: bool,
    pub skip_reason: String,
    pub repository_url: String,
}

impl LibraryRecord {
    pub fn new(name: impl Into<String>, raw_others: Vec<String>) -> Self {
        Self {
            name: name.into(),
            raw_others,
            ..Self::default()
        }
    }

    pub fn skipped(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skip: true,
            skip_reason: reason.into(),
            ..Self::default()
        }
    }

    /// Mark the record as excluded from network analysis.
    pub fn mark_skipped(&mut self, reason: impl Into<String>) {
        self.skip = true;
        self.skip_reason = reason.into();
        self.repository_url.clear();
    }
}

/// Repository signals fetched from GitHub for one resolved URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepositoryMetadata {
    /// Join key back to [`LibraryRecord::repository_url`].
    pub source_url: String,
    pub watchers: u64,
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    pub last_commit_date: String,
    pub archived: bool,
    /// `None` when the fetch failed and nothing could be scored.
    pub score: Option<i64>,
    pub skip: bool,
    pub skip_reason: String,
}

impl RepositoryMetadata {
    pub fn failed(source_url: impl Into<String>) -> Self {
        let source_url = source_url.into();
        Self {
            skip: true,
            skip_reason: format!("Failed fetching {} from GitHub", source_url),
            source_url,
            ..Self::default()
        }
    }
}

/// A library record joined with the metadata of its repository, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedRecord {
    pub library: LibraryRecord,
    pub metadata: Option<RepositoryMetadata>,
}

impl AnalyzedRecord {
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.library.name)
    }

    pub fn repository_url(&self) -> Option<&str> {
        non_empty(&self.library.repository_url)
    }

    pub fn watchers(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.watchers)
    }

    pub fn stars(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.stars)
    }

    pub fn forks(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.forks)
    }

    pub fn open_issues(&self) -> Option<u64> {
        self.metadata.as_ref().map(|m| m.open_issues)
    }

    pub fn last_commit_date(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| non_empty(&m.last_commit_date))
    }

    pub fn archived(&self) -> Option<bool> {
        self.metadata.as_ref().map(|m| m.archived)
    }

    pub fn score(&self) -> Option<i64> {
        self.metadata.as_ref().and_then(|m| m.score)
    }

    pub fn skip(&self) -> bool {
        self.library.skip || self.metadata.as_ref().is_some_and(|m| m.skip)
    }

    /// The library's own reason wins over a metadata-level one.
    pub fn skip_reason(&self) -> Option<&str> {
        if self.library.skip {
            return Some(&self.library.skip_reason);
        }
        self.metadata
            .as_ref()
            .filter(|m| m.skip)
            .map(|m| m.skip_reason.as_str())
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Manifest ecosystem selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecosystem {
    Go,
    Ruby,
}

impl Ecosystem {
    /// Manifest file read when `--input` is not given.
    pub fn default_manifest(&self) -> &'static str {
        match self {
            Ecosystem::Go => "go.mod",
            Ecosystem::Ruby => "Gemfile",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ecosystem::Go => write!(f, "Go"),
            Ecosystem::Ruby => write!(f, "Ruby"),
        }
    }
}
