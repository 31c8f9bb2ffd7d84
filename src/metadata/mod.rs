//! Metadata extraction for document formats that carry their own tags
//!
//! Extraction goes through the [`MetadataExtractor`] trait so the indexer
//! never spawns processes directly. The two shipped implementations wrap
//! `djvused` and `pdftk`; tests plug in extractors that return canned maps.
//!
//! [`Extractors`] holds one extractor per [`DocumentFormat`] and is the only
//! entry point the indexer uses. It never fails: a tool that is missing,
//! crashes, or prints garbage leaves the document with empty metadata.

pub mod djvu;
pub mod error;
pub mod pdf;
pub mod types;

mod command;

pub use djvu::DjvuExtractor;
pub use error::MetadataError;
pub use pdf::PdfExtractor;
pub use types::{DocumentFormat, Metadata};

use std::fmt;
use std::path::Path;

use crate::config::ExtractorConfig;

/// Reads the metadata of one document format
pub trait MetadataExtractor: Send + Sync {
    /// Format this extractor understands
    fn format(&self) -> DocumentFormat;

    /// Read all metadata fields of the document at `path`.
    ///
    /// # Errors
    /// Returns `MetadataError` if the underlying tool cannot be run or fails.
    fn extract(&self, path: &Path) -> Result<Metadata, MetadataError>;
}

/// One extractor per supported document format
pub struct Extractors {
    djvu: Box<dyn MetadataExtractor>,
    pdf: Box<dyn MetadataExtractor>,
}

impl Extractors {
    /// Create a registry from explicit extractors
    #[must_use]
    pub fn new(djvu: Box<dyn MetadataExtractor>, pdf: Box<dyn MetadataExtractor>) -> Self {
        Self { djvu, pdf }
    }

    /// Create the process-backed extractors with the configured tool names
    #[must_use]
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(
            Box::new(DjvuExtractor::new(&config.djvused)),
            Box::new(PdfExtractor::new(&config.pdftk)),
        )
    }

    /// Extract metadata for `path`, degrading any failure to an empty map
    #[must_use]
    pub fn extract(&self, format: DocumentFormat, path: &Path) -> Metadata {
        let extractor = match format {
            DocumentFormat::Djvu => &self.djvu,
            DocumentFormat::Pdf => &self.pdf,
        };

        match extractor.extract(path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!(path = %path.display(), %format, error = %e, "metadata extraction failed");
                Metadata::new()
            }
        }
    }
}

impl Default for Extractors {
    fn default() -> Self {
        Self::new(Box::new(DjvuExtractor::default()), Box::new(PdfExtractor::default()))
    }
}

impl fmt::Debug for Extractors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractors")
            .field("djvu", &self.djvu.format())
            .field("pdf", &self.pdf.format())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingExtractor, StaticExtractor};

    #[test]
    fn test_dispatches_by_format() {
        let extractors = Extractors::new(
            Box::new(StaticExtractor::new(DocumentFormat::Djvu).with("keywords", "from djvu")),
            Box::new(StaticExtractor::new(DocumentFormat::Pdf).with("Keywords", "from pdf")),
        );

        let djvu = extractors.extract(DocumentFormat::Djvu, Path::new("a.djvu"));
        let pdf = extractors.extract(DocumentFormat::Pdf, Path::new("a.pdf"));

        assert_eq!(djvu.get("keywords").map(String::as_str), Some("from djvu"));
        assert_eq!(pdf.get("Keywords").map(String::as_str), Some("from pdf"));
    }

    #[test]
    fn test_failure_degrades_to_empty() {
        let extractors = Extractors::new(
            Box::new(FailingExtractor::new(DocumentFormat::Djvu)),
            Box::new(FailingExtractor::new(DocumentFormat::Pdf)),
        );

        assert!(extractors.extract(DocumentFormat::Djvu, Path::new("x.djvu")).is_empty());
        assert!(extractors.extract(DocumentFormat::Pdf, Path::new("x.pdf")).is_empty());
    }

    #[test]
    fn test_missing_tool_degrades_to_empty() {
        let config = ExtractorConfig {
            djvused: "tagfs-missing-djvused".to_string(),
            pdftk: "tagfs-missing-pdftk".to_string(),
        };
        let extractors = Extractors::from_config(&config);

        assert!(extractors.extract(DocumentFormat::Pdf, Path::new("x.pdf")).is_empty());
    }
}
