//! Index build error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an index build
#[derive(Debug, Error)]
pub enum IndexError {
    /// A directory of the underlying tree could not be read. No partial
    /// index is produced.
    #[error("Cannot read underlying tree at {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    pub(crate) fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
