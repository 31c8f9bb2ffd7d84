//! DjVu metadata via `djvused -e print-meta`
//!
//! `print-meta` emits one `key<TAB>value` line per metadata field, with
//! string values wrapped in double quotes:
//!
//! ```text
//! keywords	"work, draft"
//! author	"A. Kutejko"
//! ```

use std::path::Path;

use super::command::run_for_output;
use super::error::MetadataError;
use super::types::{DocumentFormat, Metadata};
use super::MetadataExtractor;

/// Default name of the DjVu metadata tool
pub const DEFAULT_PROGRAM: &str = "djvused";

/// Reads DjVu metadata by running `djvused <file> -e print-meta`
#[derive(Debug, Clone)]
pub struct DjvuExtractor {
    program: String,
}

impl DjvuExtractor {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for DjvuExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl MetadataExtractor for DjvuExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Djvu
    }

    fn extract(&self, path: &Path) -> Result<Metadata, MetadataError> {
        let output = run_for_output(
            &self.program,
            [path.as_os_str(), "-e".as_ref(), "print-meta".as_ref()],
        )?;
        Ok(parse_print_meta(&output))
    }
}

/// Parse `print-meta` output into a key/value map.
///
/// Only lines with exactly two tab-separated fields are kept; everything
/// else is ignored. Quoted values are unquoted with [`dequote`].
#[must_use]
pub fn parse_print_meta(output: &str) -> Metadata {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.trim_end().split('\t');
            let key = fields.next()?;
            let value = fields.next()?;
            if fields.next().is_some() {
                return None;
            }
            Some((key.to_string(), dequote(value)))
        })
        .collect()
}

/// Strip one pair of surrounding double quotes and unescape `\"` inside.
///
/// Values that are not fully quoted are returned as-is.
#[must_use]
pub fn dequote(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\\\"", "\""),
        None => value.to_string(),
    }
}
