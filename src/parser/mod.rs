use std::path::Path;

use crate::error::ReadError;
use crate::models::{Ecosystem, LibraryRecord};

pub mod go;
pub mod ruby;

/// Turns a dependency manifest into library records, in declaration order.
pub trait ManifestParser {
    fn parse_str(&self, content: &str) -> Vec<LibraryRecord>;

    fn parse(&self, path: &Path) -> Result<Vec<LibraryRecord>, ReadError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse_str(&content))
    }
}

/// Build the parser for `ecosystem`.
pub fn for_ecosystem(ecosystem: Ecosystem) -> Box<dyn ManifestParser> {
    match ecosystem {
        Ecosystem::Go => Box::new(go::GoModParser::new()),
        Ecosystem::Ruby => Box::new(ruby::GemfileParser::new()),
    }
}
