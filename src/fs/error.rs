//! Filesystem operation error types
//!
//! Every error maps onto one errno value through [`FsError::errno`], which
//! is what the FUSE layer replies with.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the filesystem operations
#[derive(Debug, Error)]
pub enum FsError {
    /// The virtual path names neither a tag directory nor a visible entry
    #[error("No such entry: {path}")]
    NotFound { path: String },

    /// The underlying file exists but denies the requested access
    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    /// Reading the underlying file's attributes or permissions failed
    #[error("Storage error on {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    pub(crate) fn not_found(path: &str) -> Self {
        Self::NotFound { path: path.to_string() }
    }

    pub(crate) fn permission_denied(path: &str) -> Self {
        Self::PermissionDenied { path: path.to_string() }
    }

    pub(crate) fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage { path: path.into(), source }
    }

    /// errno reported to the kernel for this error
    #[must_use]
    pub fn errno(&self) -> i32 {
        match self {
            Self::NotFound { .. } => libc::ENOENT,
            Self::PermissionDenied { .. } => libc::EACCES,
            Self::Storage { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
