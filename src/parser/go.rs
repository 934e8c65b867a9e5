use std::collections::HashSet;

use crate::models::LibraryRecord;

const INDIRECT_MARKER: &str = "// indirect";
const REPLACED_REASON: &str = "replaced module";

/// Parser for Go `go.mod` files.
///
/// Only direct requirements are reported: `// indirect` entries are dropped,
/// and modules named on the left-hand side of a `replace` directive are
/// reported as skipped since their source is not the upstream repository.
pub struct GoModParser;

impl GoModParser {
    pub fn new() -> Self {
        Self
    }
}

impl super::ManifestParser for GoModParser {
    fn parse_str(&self, content: &str) -> Vec<LibraryRecord> {
        let replaced = collect_replaced_modules(content);
        collect_requirements(content, &replaced)
    }
}

/// First pass: module paths replaced by a `replace (...)` block or a
/// single-line `replace` directive.
fn collect_replaced_modules(content: &str) -> HashSet<String> {
    let mut replaced = HashSet::new();
    let mut in_replace_block = false;

    for line in content.lines() {
        let line = line.trim();

        if line == "replace (" {
            in_replace_block = true;
            continue;
        }
        if in_replace_block && line == ")" {
            in_replace_block = false;
            continue;
        }

        let entry = if in_replace_block {
            line
        } else if let Some(rest) = line.strip_prefix("replace ") {
            rest.trim_start()
        } else {
            continue;
        };

        if let Some(module) = entry.split_whitespace().next() {
            if !module.starts_with("//") && module != "(" {
                replaced.insert(module.to_string());
            }
        }
    }

    replaced
}

/// Second pass: one record per direct requirement, in file order.
fn collect_requirements(content: &str, replaced: &HashSet<String>) -> Vec<LibraryRecord> {
    let mut records = Vec::new();
    let mut in_require_block = false;

    for line in content.lines() {
        let line = line.trim();

        if line == "require (" {
            in_require_block = true;
            continue;
        }
        if in_require_block && line == ")" {
            in_require_block = false;
            continue;
        }

        let entry = if in_require_block {
            line
        } else if let Some(rest) = line.strip_prefix("require ") {
            rest.trim_start()
        } else {
            continue;
        };

        if let Some(record) = requirement_record(entry, replaced) {
            records.push(record);
        }
    }

    records
}

fn requirement_record(entry: &str, replaced: &HashSet<String>) -> Option<LibraryRecord> {
    if entry.is_empty() || entry.starts_with("//") || entry.ends_with(INDIRECT_MARKER) {
        return None;
    }

    let mut tokens = entry.split_whitespace();
    let (module, version) = match (tokens.next(), tokens.next()) {
        (Some(module), Some(version)) => (module, version),
        _ => {
            tracing::debug!(entry, "ignoring require entry without a version");
            return None;
        }
    };

    // github.com/spf13/cobra → cobra
    let name = module.rsplit('/').next().unwrap_or(module);

    if replaced.contains(module) {
        Some(LibraryRecord::skipped(name, REPLACED_REASON))
    } else {
        Some(LibraryRecord::new(
            name,
            vec![module.to_string(), version.to_string()],
        ))
    }
}
