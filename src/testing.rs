//! Testing utilities for tagfs
//!
//! Stand-ins for the two external seams of the crate: metadata extraction
//! (which normally spawns `djvused`/`pdftk`) and the underlying storage
//! (which normally calls `stat`/`access` on the host). Also provides a small
//! fixed index shared by the resolver and filesystem tests.
//!
//! Only available when compiled with `cfg(test)`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};

use crate::fs::{AccessMode, Storage, StoredAttributes};
use crate::index::{Entry, Index};
use crate::metadata::{DocumentFormat, Metadata, MetadataError, MetadataExtractor};
use crate::tags::TagSet;

/// Create a file with default content.
///
/// Writes "test content" to `path`.
///
/// # Errors
/// Returns an `io::Error` if the file cannot be created or written.
pub fn touch(path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(b"test content")?;
    Ok(())
}

/// Extractor returning the same metadata for every document
pub struct StaticExtractor {
    format: DocumentFormat,
    metadata: Metadata,
}

impl StaticExtractor {
    #[must_use]
    pub fn new(format: DocumentFormat) -> Self {
        Self { format, metadata: Metadata::new() }
    }

    /// Add a metadata field
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }
}

impl MetadataExtractor for StaticExtractor {
    fn format(&self) -> DocumentFormat {
        self.format
    }

    fn extract(&self, _path: &Path) -> Result<Metadata, MetadataError> {
        Ok(self.metadata.clone())
    }
}

/// Extractor that behaves like a missing tool
pub struct FailingExtractor {
    format: DocumentFormat,
}

impl FailingExtractor {
    #[must_use]
    pub const fn new(format: DocumentFormat) -> Self {
        Self { format }
    }
}

impl MetadataExtractor for FailingExtractor {
    fn format(&self) -> DocumentFormat {
        self.format
    }

    fn extract(&self, _path: &Path) -> Result<Metadata, MetadataError> {
        Err(MetadataError::Spawn {
            program: format!("missing-{}", self.format),
            source: io::Error::from(io::ErrorKind::NotFound),
        })
    }
}

/// In-memory storage keyed by underlying path
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, StoredAttributes>,
    denied: Option<AccessMode>,
}

impl MemoryStorage {
    /// Storage holding every underlying path of `index`: files as
    /// `0o644` regular files, directory aliases as `0o755` directories.
    #[must_use]
    pub fn from_index(index: &Index) -> Self {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let files = index
            .entries()
            .iter()
            .map(|entry| {
                let mode = if entry.is_directory_alias() {
                    libc::S_IFDIR | 0o755
                } else {
                    libc::S_IFREG | 0o644
                };
                let attrs = StoredAttributes {
                    mode,
                    uid: 1000,
                    gid: 1000,
                    atime: time,
                    mtime: time,
                    ctime: time,
                };
                (entry.underlying_path().to_path_buf(), attrs)
            })
            .collect();
        Self { files, denied: None }
    }

    /// Deny any access request that includes a bit of `mode`
    #[must_use]
    pub const fn deny(mut self, mode: AccessMode) -> Self {
        self.denied = Some(mode);
        self
    }
}

impl Storage for MemoryStorage {
    fn stat(&self, path: &Path) -> io::Result<StoredAttributes> {
        self.files
            .get(path)
            .copied()
            .ok_or_else(|| io::Error::from_raw_os_error(libc::ENOENT))
    }

    fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool> {
        if !self.files.contains_key(path) {
            return Err(io::Error::from_raw_os_error(libc::ENOENT));
        }
        let denied = self.denied.is_some_and(|d| mode.bits() & d.bits() != 0);
        Ok(!denied)
    }
}

fn tag_set(tags: &[&str]) -> TagSet {
    tags.iter().map(|t| (*t).to_string()).collect()
}

/// Small index used across resolver and filesystem tests.
///
/// | Entry | Tags |
/// |---|---|
/// | `doc [finance][q1].txt` | finance, q1 |
/// | `ledger [finance].txt` | finance |
/// | `notes.djvu` | work, draft |
/// | `archive[old]` (directory alias) | old |
/// | `plain.txt` | none |
#[must_use]
pub fn fixture_index() -> Index {
    let mut entries = vec![
        Entry::file("doc [finance][q1].txt", "/r/doc [finance][q1].txt", tag_set(&["finance", "q1"])),
        Entry::file("ledger [finance].txt", "/r/books/ledger [finance].txt", tag_set(&["finance"])),
        Entry::file("notes.djvu", "/r/notes.djvu", tag_set(&["work", "draft"])),
    ];
    entries.extend(Entry::directory_alias("archive[old]", "/r/archive[old]", tag_set(&["old"])));
    entries.push(Entry::file("plain.txt", "/r/plain.txt", TagSet::new()));
    Index::from_entries(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_touch_writes_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        touch(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "test content");
    }

    #[test]
    fn test_fixture_index_shape() {
        let index = fixture_index();
        assert_eq!(index.len(), 5);
        let universe: Vec<&str> = index.tag_universe().iter().map(String::as_str).collect();
        assert_eq!(universe, vec!["draft", "finance", "old", "q1", "work"]);
    }

    #[test]
    fn test_memory_storage_deny() {
        let index = fixture_index();
        let storage = MemoryStorage::from_index(&index).deny(AccessMode::WRITE);
        let path = Path::new("/r/plain.txt");

        assert!(storage.access(path, AccessMode::READ).unwrap());
        assert!(!storage.access(path, AccessMode::READ | AccessMode::WRITE).unwrap());
        assert!(storage.access(Path::new("/r/nope"), AccessMode::READ).is_err());
    }
}
