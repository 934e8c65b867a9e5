use std::collections::HashMap;

use crate::models::{AnalyzedRecord, LibraryRecord, RepositoryMetadata};

/// Join library records with fetched metadata by repository URL.
///
/// The output has one entry per record, in record order. Metadata is looked
/// up by `source_url`, so neither input needs to be ordered relative to the
/// other. Skipped records and records without a URL get no metadata.
pub fn assemble(
    records: Vec<LibraryRecord>,
    metadata: &[RepositoryMetadata],
) -> Vec<AnalyzedRecord> {
    let by_url: HashMap<&str, &RepositoryMetadata> = metadata
        .iter()
        .map(|m| (m.source_url.as_str(), m))
        .collect();

    records
        .into_iter()
        .map(|library| {
            let metadata = if library.skip || library.repository_url.is_empty() {
                None
            } else {
                by_url.get(library.repository_url.as_str()).map(|m| (*m).clone())
            };
            AnalyzedRecord { library, metadata }
        })
        .collect()
}
