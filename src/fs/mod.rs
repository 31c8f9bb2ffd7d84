//! Filesystem operations over the tag index
//!
//! [`TagFs`] answers the four questions a read-only tag filesystem needs,
//! keyed by virtual path:
//!
//! | Operation | Tag directory | Entry | Anything else |
//! |---|---|---|---|
//! | [`attributes`](TagFs::attributes) | synthetic directory | real permissions, symlink type | `NotFound` |
//! | [`read_link`](TagFs::read_link) | `NotFound` | underlying path | `NotFound` |
//! | [`list`](TagFs::list) | `.`, `..`, entries, remaining tags | `.`, `..` | `.`, `..` |
//! | [`access`](TagFs::access) | allowed | delegated to storage | `NotFound` |
//!
//! Every call resolves the path from scratch; nothing is cached between
//! calls and the index is only ever read.

pub mod attr;
pub mod error;
pub mod inode;
pub mod storage;

#[cfg(feature = "fuse")]
pub mod fuse;

pub use attr::{Attributes, NodeKind};
pub use error::FsError;
pub use storage::{AccessMode, HostStorage, Storage, StoredAttributes};

use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::index::{Entry, Index};
use crate::resolve::{Resolution, resolve};

/// One name produced by a directory listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry<'a> {
    pub name: &'a str,
    pub kind: NodeKind,
}

impl<'a> DirEntry<'a> {
    const fn directory(name: &'a str) -> Self {
        Self { name, kind: NodeKind::Directory }
    }

    const fn link(name: &'a str) -> Self {
        Self { name, kind: NodeKind::Symlink }
    }
}

/// Read-only tag filesystem over a shared index
pub struct TagFs<S = HostStorage> {
    index: Arc<Index>,
    storage: S,
    directory: Attributes,
}

impl TagFs<HostStorage> {
    /// Serve `index` backed by the host filesystem
    #[must_use]
    pub fn new(index: Arc<Index>) -> Self {
        Self::with_storage(index, HostStorage)
    }
}

impl<S: Storage> TagFs<S> {
    /// Serve `index` backed by `storage`.
    ///
    /// Tag directories take their owner from the indexed root directory
    /// and their timestamps from the moment the filesystem is created. An
    /// index without a readable root gets owner 0.
    #[must_use]
    pub fn with_storage(index: Arc<Index>, storage: S) -> Self {
        let (uid, gid) = match storage.stat(index.root()) {
            Ok(root) => (root.uid, root.gid),
            Err(e) => {
                tracing::debug!(root = %index.root().display(), error = %e, "cannot stat root, tag directories owned by 0");
                (0, 0)
            }
        };
        Self {
            directory: Attributes::directory(uid, gid, SystemTime::now()),
            index,
            storage,
        }
    }

    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Resolve `path` against the index
    #[must_use]
    pub fn resolve<'a>(&'a self, path: &str) -> Resolution<'a> {
        resolve(&self.index, path)
    }

    /// Attributes of the node at `path`.
    ///
    /// # Errors
    /// * `FsError::NotFound` if `path` names no visible entry.
    /// * `FsError::Storage` if the underlying file cannot be stat'ed.
    pub fn attributes(&self, path: &str) -> Result<Attributes, FsError> {
        let resolution = self.resolve(path);
        if resolution.is_directory() {
            return Ok(self.directory);
        }

        let entry = self.entry_at(&resolution, path)?;
        let stored = self.storage.stat(entry.underlying_path()).map_err(|e| {
            tracing::warn!(path, underlying = %entry.underlying_path().display(), error = %e, "stat failed");
            FsError::storage(entry.underlying_path(), e)
        })?;
        Ok(Attributes::link(entry, &stored))
    }

    /// Target of the link at `path`: the entry's underlying path, verbatim.
    ///
    /// # Errors
    /// Returns `FsError::NotFound` for tag directories and unknown paths.
    pub fn read_link(&self, path: &str) -> Result<&Path, FsError> {
        let resolution = self.resolve(path);
        let entry = self.entry_at(&resolution, path)?;
        Ok(entry.underlying_path())
    }

    /// Names in the directory at `path`.
    ///
    /// Always starts with `.` and `..`. For a tag directory these are
    /// followed by the visible entries in index order, then the tags that
    /// would narrow the selection further in sorted order. An entry whose
    /// name is also a tag is left out: the resolver reads that name as a
    /// tag, so only the tag directory is reachable under it.
    pub fn list<'a>(&'a self, path: &str) -> impl Iterator<Item = DirEntry<'a>> + use<'a, S> {
        let resolution = self.resolve(path);

        let (entries, tags): (Vec<&'a Entry>, Vec<&'a str>) = if resolution.is_directory() {
            let entries = resolution
                .visible_entries()
                .iter()
                .copied()
                .filter(|entry| !self.index.is_tag(entry.name()))
                .collect();
            (entries, resolution.remaining_tags().into_iter().collect())
        } else {
            (Vec::new(), Vec::new())
        };

        [DirEntry::directory("."), DirEntry::directory("..")]
            .into_iter()
            .chain(entries.into_iter().map(|e| DirEntry::link(e.name())))
            .chain(tags.into_iter().map(DirEntry::directory))
    }

    /// Check whether `path` may be accessed with `mode`.
    ///
    /// # Errors
    /// * `FsError::NotFound` if `path` names no visible entry.
    /// * `FsError::PermissionDenied` if the underlying file denies `mode`.
    /// * `FsError::Storage` if the check itself fails.
    pub fn access(&self, path: &str, mode: AccessMode) -> Result<(), FsError> {
        let resolution = self.resolve(path);
        if resolution.is_directory() {
            return Ok(());
        }

        let entry = self.entry_at(&resolution, path)?;
        let allowed = self
            .storage
            .access(entry.underlying_path(), mode)
            .map_err(|e| FsError::storage(entry.underlying_path(), e))?;

        if allowed {
            Ok(())
        } else {
            Err(FsError::permission_denied(path))
        }
    }

    fn entry_at<'a>(&self, resolution: &Resolution<'a>, path: &str) -> Result<&'a Entry, FsError> {
        resolution.entry().ok_or_else(|| FsError::not_found(path))
    }
}
