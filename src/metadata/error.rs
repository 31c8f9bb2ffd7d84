//! Metadata extraction error types
//!
//! Extraction failures are never fatal: the `Extractors` registry logs them
//! and treats the document as having no metadata. They exist as a type so
//! individual extractors stay testable and the log line says what went wrong.

use std::process::ExitStatus;
use thiserror::Error;

/// Errors raised while running an external metadata tool
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The tool could not be started (missing binary, permissions, ...)
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but reported failure
    #[error("'{program}' exited with {status}")]
    ExitStatus { program: String, status: ExitStatus },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
