use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::tags::TagSet;

/// One visible node of the tag filesystem: a file, or a tagged directory
/// exposed as a single opaque node
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    name: String,
    underlying_path: PathBuf,
    tags: TagSet,
    is_directory_alias: bool,
}

impl Entry {
    /// Create a file entry. Files may carry no tags at all.
    #[must_use]
    pub fn file(name: impl Into<String>, underlying_path: impl Into<PathBuf>, tags: TagSet) -> Self {
        Self {
            name: name.into(),
            underlying_path: underlying_path.into(),
            tags,
            is_directory_alias: false,
        }
    }

    /// Create a directory alias entry.
    ///
    /// Returns `None` when `tags` is empty: untagged directories are
    /// flattened into their parent and never become entries.
    #[must_use]
    pub fn directory_alias(
        name: impl Into<String>,
        underlying_path: impl Into<PathBuf>,
        tags: TagSet,
    ) -> Option<Self> {
        if tags.is_empty() {
            return None;
        }
        Some(Self {
            name: name.into(),
            underlying_path: underlying_path.into(),
            tags,
            is_directory_alias: true,
        })
    }

    /// Name presented to the filesystem
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Real path this entry links to
    #[must_use]
    pub fn underlying_path(&self) -> &Path {
        &self.underlying_path
    }

    #[must_use]
    pub const fn tags(&self) -> &TagSet {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    #[must_use]
    pub const fn is_directory_alias(&self) -> bool {
        self.is_directory_alias
    }
}
