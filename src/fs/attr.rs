use std::time::SystemTime;

use super::storage::StoredAttributes;
use crate::index::Entry;

/// Permission bits of every tag directory
pub const DIRECTORY_PERM: u16 = 0o755;

/// Link count reported for tag directories. Constant, not derived from
/// the number of children.
pub const DIRECTORY_NLINK: u32 = 2;

/// Link count reported for entries
pub const LINK_NLINK: u32 = 1;

/// Kind of node the filesystem presents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Tag directory (including the root)
    Directory,
    /// Entry; always a symlink to its underlying path, even for
    /// directory aliases
    Symlink,
}

/// Attributes reported for a virtual path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub kind: NodeKind,
    pub perm: u16,
    pub nlink: u32,
    pub size: u64,
    pub uid: u32,
    pub gid: u32,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

impl Attributes {
    /// Synthetic attributes of a tag directory
    #[must_use]
    pub const fn directory(uid: u32, gid: u32, time: SystemTime) -> Self {
        Self {
            kind: NodeKind::Directory,
            perm: DIRECTORY_PERM,
            nlink: DIRECTORY_NLINK,
            size: 0,
            uid,
            gid,
            atime: time,
            mtime: time,
            ctime: time,
        }
    }

    /// Attributes of an entry: the real file's permissions, owner and
    /// timestamps with the type forced to symlink. The size is the length
    /// of the link target, as for any symlink.
    #[must_use]
    pub fn link(entry: &Entry, stored: &StoredAttributes) -> Self {
        Self {
            kind: NodeKind::Symlink,
            perm: (stored.mode & 0o7777) as u16,
            nlink: LINK_NLINK,
            size: entry.underlying_path().as_os_str().len() as u64,
            uid: stored.uid,
            gid: stored.gid,
            atime: stored.atime,
            mtime: stored.mtime,
            ctime: stored.ctime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::TagSet;
    use std::time::{Duration, UNIX_EPOCH};

    fn stored(mode: u32) -> StoredAttributes {
        let t = UNIX_EPOCH + Duration::from_secs(1_000);
        StoredAttributes { mode, uid: 7, gid: 8, atime: t, mtime: t, ctime: t }
    }

    #[test]
    fn test_directory_attributes() {
        let attrs = Attributes::directory(1, 2, UNIX_EPOCH);
        assert_eq!(attrs.kind, NodeKind::Directory);
        assert_eq!(attrs.perm, 0o755);
        assert_eq!(attrs.nlink, 2);
    }

    #[test]
    fn test_link_from_file_keeps_permissions() {
        let entry = Entry::file("a.txt", "/r/a.txt", TagSet::new());
        let attrs = Attributes::link(&entry, &stored(libc::S_IFREG | 0o640));

        assert_eq!(attrs.kind, NodeKind::Symlink);
        assert_eq!(attrs.perm, 0o640);
        assert_eq!(attrs.uid, 7);
        assert_eq!(attrs.size, "/r/a.txt".len() as u64);
    }

    #[test]
    fn test_link_from_directory_is_still_symlink() {
        let tags: TagSet = ["old".to_string()].into_iter().collect();
        let entry = Entry::directory_alias("d[old]", "/r/d[old]", tags).unwrap();
        let attrs = Attributes::link(&entry, &stored(libc::S_IFDIR | 0o4755));

        assert_eq!(attrs.kind, NodeKind::Symlink);
        assert_eq!(attrs.perm, 0o4755);
    }
}
