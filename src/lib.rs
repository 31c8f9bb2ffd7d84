//! Tagfs - a read-only filesystem that presents files by tag
//!
//! A directory tree is indexed once: every file and every bracket-tagged
//! directory becomes an entry carrying a set of tags, taken from the name
//! (`report [finance][q1].txt`) or, for DjVu and PDF documents, from the
//! embedded keywords. The filesystem then exposes each tag as a directory;
//! nesting tag directories intersects them, and every entry appears as a
//! symlink to its real path.

use thiserror::Error;

pub mod cli;
pub mod config;
pub mod fs;
pub mod index;
pub mod metadata;
pub mod output;
pub mod resolve;
pub mod tags;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TagfsError {
    /// The underlying tree could not be indexed
    #[error("Index error: {0}")]
    IndexError(#[from] index::IndexError),
    /// A filesystem operation failed
    #[error("Filesystem error: {0}")]
    FsError(#[from] fs::FsError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Failed to encode JSON output
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
