//! PDF metadata via `pdftk <file> dump_data output -`
//!
//! The document info dictionary is dumped as alternating lines:
//!
//! ```text
//! InfoBegin
//! InfoKey: Keywords
//! InfoValue: finance, q1
//! ```

use std::path::Path;

use super::command::run_for_output;
use super::error::MetadataError;
use super::types::{DocumentFormat, Metadata};
use super::MetadataExtractor;

/// Default name of the PDF metadata tool
pub const DEFAULT_PROGRAM: &str = "pdftk";

const KEY_PREFIX: &str = "InfoKey: ";
const VALUE_PREFIX: &str = "InfoValue: ";

/// Reads PDF document info by running `pdftk <file> dump_data output -`
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    program: String,
}

impl PdfExtractor {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl MetadataExtractor for PdfExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Pdf
    }

    fn extract(&self, path: &Path) -> Result<Metadata, MetadataError> {
        let output = run_for_output(
            &self.program,
            [path.as_os_str(), "dump_data".as_ref(), "output".as_ref(), "-".as_ref()],
        )?;
        Ok(parse_dump_data(&output))
    }
}

/// Parse `dump_data` output into a key/value map.
///
/// An `InfoKey:` line opens a pair and the next `InfoValue:` line closes
/// it. While a key is open, further `InfoKey:` lines are ignored, and a
/// key left open at the end of the output is dropped.
#[must_use]
pub fn parse_dump_data(output: &str) -> Metadata {
    let mut result = Metadata::new();
    let mut pending: Option<&str> = None;

    for line in output.lines() {
        match pending {
            None => {
                if let Some(key) = line.strip_prefix(KEY_PREFIX) {
                    pending = Some(key);
                }
            }
            Some(key) => {
                if let Some(value) = line.strip_prefix(VALUE_PREFIX) {
                    result.insert(key.to_string(), value.to_string());
                    pending = None;
                }
            }
        }
    }

    result
}
