use std::sync::OnceLock;

use regex::Regex;

use crate::models::LibraryRecord;

const BLOCK_REASON: &str = "Not hosted on Github";
const KEYWORD_REASON: &str = "does not support libraries hosted outside of Github";

/// Option prefixes that point a gem at somewhere other than rubygems.org.
const NON_REGISTRY_PREFIXES: [&str; 6] = [
    ":source ", ":git ", ":github ", "source:", "git:", "github:",
];

/// Parser for Bundler `Gemfile`s.
///
/// Every `gem ...` line becomes a record. Gems pulled from a custom source,
/// a git remote, or declared inside a `source ... do`, `platforms ... do` or
/// `install_if -> { ... } do` block are marked skipped. When both apply, the
/// block reason is reported.
pub struct GemfileParser;

impl GemfileParser {
    pub fn new() -> Self {
        Self
    }
}

impl super::ManifestParser for GemfileParser {
    fn parse_str(&self, content: &str) -> Vec<LibraryRecord> {
        let mut records = Vec::new();
        // Open `do`/`if` constructs since the enclosing skip block started.
        let mut skip_depth: usize = 0;

        for line in content.lines() {
            let line = line.trim();
            let code = strip_comment(line);

            if skip_depth > 0 {
                if code == "end" {
                    skip_depth -= 1;
                    continue;
                }
                if opens_block(code) {
                    skip_depth += 1;
                    continue;
                }
            } else if is_skip_block_start(code) {
                skip_depth = 1;
                continue;
            }

            if let Some(mut record) = parse_gem_line(line) {
                if skip_depth > 0 {
                    record.skip = true;
                    record.skip_reason = BLOCK_REASON.to_string();
                }
                records.push(record);
            }
        }

        records
    }
}

fn skip_block_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r#"^source\s*\(?\s*['"][^'"]+['"]\s*\)?\s+do\b"#).unwrap(),
            Regex::new(r"^platforms?\s+[:\w,\s]+?\s+do\b").unwrap(),
            Regex::new(r"^install_if\s+->\s*(\(\s*\))?\s*\{.*\}\s*do\b").unwrap(),
        ]
    })
}

fn is_skip_block_start(line: &str) -> bool {
    skip_block_patterns().iter().any(|re| re.is_match(line))
}

/// `line` without a trailing `# ...` comment. A `#` inside a quoted string
/// is kept.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '#') => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}

/// Whether `code` opens a construct closed by a later `end` line.
fn opens_block(code: &str) -> bool {
    static DO_BLOCK: OnceLock<Regex> = OnceLock::new();
    static CLOSED_INLINE: OnceLock<Regex> = OnceLock::new();
    let do_block = DO_BLOCK.get_or_init(|| Regex::new(r"(^|\s)do(\s*\|[^|]*\|)?$").unwrap());
    let closed_inline = CLOSED_INLINE.get_or_init(|| Regex::new(r"(^|[\s;])end$").unwrap());

    if do_block.is_match(code) || code == "begin" {
        return true;
    }
    ["if ", "unless ", "case ", "while ", "until "]
        .iter()
        .any(|kw| code.starts_with(kw))
        && !closed_inline.is_match(code)
}

/// Parse one trimmed Gemfile line; `None` unless it declares a gem.
fn parse_gem_line(line: &str) -> Option<LibraryRecord> {
    if !line.starts_with("gem ") {
        return None;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let name = tokens
        .get(1)
        .map(|t| t.trim_matches(|c| matches!(c, '\'' | '"' | ',')))
        .filter(|n| !n.is_empty());
    let Some(name) = name else {
        tracing::debug!(line, "ignoring gem declaration without a name");
        return None;
    };

    let options: Vec<String> = tokens[2..]
        .join(" ")
        .split(',')
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect();

    let hosted_elsewhere = options.iter().any(|fragment| {
        NON_REGISTRY_PREFIXES
            .iter()
            .any(|prefix| fragment.starts_with(prefix))
    });

    let mut record = LibraryRecord::new(name, options);
    if hosted_elsewhere {
        record.skip = true;
        record.skip_reason = KEYWORD_REASON.to_string();
    }
    Some(record)
}
