//! Inode numbers for virtual paths
//!
//! The kernel talks in inode numbers while every filesystem operation is
//! keyed by virtual path. Paths get an inode the first time they are looked
//! up or listed and keep it for the rest of the session.

use std::collections::HashMap;

/// Inode of the filesystem root
pub const ROOT_INO: u64 = 1;

/// Bidirectional map between inode numbers and normalised virtual paths
#[derive(Debug)]
pub struct InodeTable {
    paths: Vec<String>,
    inodes: HashMap<String, u64>,
}

impl InodeTable {
    #[must_use]
    pub fn new() -> Self {
        let root = "/".to_string();
        let mut inodes = HashMap::new();
        inodes.insert(root.clone(), ROOT_INO);
        Self { paths: vec![root], inodes }
    }

    /// Virtual path of `ino`, if it has been handed out
    #[must_use]
    pub fn path(&self, ino: u64) -> Option<&str> {
        let slot = usize::try_from(ino.checked_sub(ROOT_INO)?).ok()?;
        self.paths.get(slot).map(String::as_str)
    }

    /// Inode for `path`, allocating one on first sight
    pub fn intern(&mut self, path: &str) -> u64 {
        if let Some(&ino) = self.inodes.get(path) {
            return ino;
        }
        let ino = self.paths.len() as u64 + ROOT_INO;
        self.paths.push(path.to_string());
        self.inodes.insert(path.to_string(), ino);
        ino
    }

    /// Number of inodes handed out, root included
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of `name` inside the directory at `parent`
#[must_use]
pub fn child_path(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Path of the directory containing `path`
#[must_use]
pub fn parent_path(path: &str) -> &str {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) | None => "/",
        Some((parent, _)) => parent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_preallocated() {
        let table = InodeTable::new();
        assert_eq!(table.path(ROOT_INO), Some("/"));
        assert_eq!(table.len(), 1);
        assert_eq!(table.path(0), None);
        assert_eq!(table.path(2), None);
    }

    #[test]
    fn test_intern_is_stable() {
        let mut table = InodeTable::new();
        let a = table.intern("/finance");
        let b = table.intern("/finance/q1");
        assert_ne!(a, b);
        assert_eq!(table.intern("/finance"), a);
        assert_eq!(table.intern("/"), ROOT_INO);
        assert_eq!(table.path(b), Some("/finance/q1"));
    }

    #[test]
    fn test_child_path() {
        assert_eq!(child_path("/", "finance"), "/finance");
        assert_eq!(child_path("/finance", "q1"), "/finance/q1");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/"), "/");
        assert_eq!(parent_path("/finance"), "/");
        assert_eq!(parent_path("/finance/q1"), "/finance");
    }
}
