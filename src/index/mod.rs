//! In-memory tag index of an underlying directory tree
//!
//! The index is built once by walking the tree and is never modified
//! afterwards, so any number of filesystem requests can read it at the
//! same time without locking.
//!
//! # Walk rules
//!
//! - Regular files become entries. Their tags come from [`crate::tags::file_tags`].
//! - A directory whose name carries bracket tags becomes a single
//!   *directory alias* entry; nothing below it is indexed.
//! - A directory without tags is dissolved: its contents are indexed as if
//!   they lived in the parent.
//! - Anything that is neither a file nor a directory (dangling symlinks,
//!   sockets, ...) is skipped.
//!
//! Each directory is visited in name order so that entry order is the same
//! on every build of an unchanged tree.

pub mod error;
pub mod types;

pub use error::IndexError;
pub use types::Entry;

use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;

use crate::metadata::Extractors;
use crate::tags::{self, TagSet};

/// Every visible entry of the tree plus the set of all tags they carry
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    root: PathBuf,
    entries: Vec<Entry>,
    tag_universe: TagSet,
}

/// Something found by the walk, before file tags are derived
enum Found {
    File { name: String, path: PathBuf },
    Alias(Entry),
}

impl Index {
    /// Walk `root` and build the index.
    ///
    /// Document metadata is extracted in parallel once the walk is done;
    /// entry order is still the walk order.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Unreadable` if `root` or any directory below it
    /// cannot be listed. The whole build is abandoned in that case.
    pub fn build(root: impl AsRef<Path>, extractors: &Extractors) -> Result<Self, IndexError> {
        let root = root.as_ref();

        let mut found = Vec::new();
        let mut visited = HashSet::new();
        walk(root, &mut found, &mut visited)?;

        let entries: Vec<Entry> = found
            .into_par_iter()
            .map(|item| match item {
                Found::File { name, path } => {
                    let tags = tags::file_tags(&name, &path, extractors);
                    tracing::debug!(path = %path.display(), ?tags, "indexed file");
                    Entry::file(name, path, tags)
                }
                Found::Alias(entry) => entry,
            })
            .collect();

        let index = Self {
            root: root.to_path_buf(),
            ..Self::from_entries(entries)
        };
        tracing::info!(
            root = %root.display(),
            entries = index.len(),
            tags = index.tag_universe.len(),
            "index built"
        );
        Ok(index)
    }

    /// Build an index from ready-made entries, collecting their tags
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        let tag_universe = entries
            .iter()
            .flat_map(|entry| entry.tags().iter().cloned())
            .collect();
        Self {
            root: PathBuf::new(),
            entries,
            tag_universe,
        }
    }

    /// Directory the index was built from; empty for an index assembled
    /// with [`Index::from_entries`]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in discovery order
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Every tag carried by at least one entry
    #[must_use]
    pub const fn tag_universe(&self) -> &TagSet {
        &self.tag_universe
    }

    #[must_use]
    pub fn is_tag(&self, segment: &str) -> bool {
        self.tag_universe.contains(segment)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries carrying each tag
    #[must_use]
    pub fn tag_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts: BTreeMap<&str, usize> =
            self.tag_universe.iter().map(|tag| (tag.as_str(), 0)).collect();
        for tag in self.entries.iter().flat_map(|entry| entry.tags()) {
            if let Some(count) = counts.get_mut(tag.as_str()) {
                *count += 1;
            }
        }
        counts
    }
}

fn walk(dir: &Path, found: &mut Vec<Found>, visited: &mut HashSet<PathBuf>) -> Result<(), IndexError> {
    let canonical = fs::canonicalize(dir).map_err(|e| IndexError::unreadable(dir, e))?;
    if !visited.insert(canonical) {
        tracing::warn!(path = %dir.display(), "directory already indexed through another path, skipping");
        return Ok(());
    }

    let mut children = fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.file_name()))
                .collect::<Result<Vec<OsString>, _>>()
        })
        .map_err(|e| IndexError::unreadable(dir, e))?;
    children.sort();

    for file_name in children {
        let path = dir.join(&file_name);
        let name = file_name.to_string_lossy().into_owned();

        if path.is_file() {
            found.push(Found::File { name, path });
        } else if path.is_dir() {
            match Entry::directory_alias(&name, &path, tags::directory_tags(&name)) {
                Some(alias) => {
                    tracing::debug!(path = %path.display(), tags = ?alias.tags(), "indexed directory alias");
                    found.push(Found::Alias(alias));
                }
                None => walk(&path, found, visited)?,
            }
        } else {
            tracing::debug!(path = %path.display(), "skipping entry that is neither file nor directory");
        }
    }

    Ok(())
}
