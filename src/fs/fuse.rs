//! FUSE binding for [`TagFs`]
//!
//! Translates kernel requests (inode based) into the path based operations
//! of [`TagFs`]. Inodes are handed out by an [`InodeTable`] as paths are
//! looked up or listed.

use std::ffi::OsStr;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::time::Duration;

use fuser::{
    FileAttr, FileType, Filesystem, KernelConfig, MountOption, ReplyAttr, ReplyData,
    ReplyDirectory, ReplyEmpty, ReplyEntry, ReplyOpen, ReplyStatfs, Request,
};
use libc::{ENOENT, ENOTDIR, c_int};

use super::attr::{Attributes, NodeKind};
use super::inode::{InodeTable, ROOT_INO, child_path, parent_path};
use super::storage::{AccessMode, Storage};
use super::{FsError, TagFs};

/// How long the kernel may cache attributes and lookups
const TTL: Duration = Duration::from_secs(1);

const BLOCK_SIZE: u32 = 4096;
const MAX_NAME_LEN: u32 = 255;

/// Options applied when mounting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountOptions {
    pub fsname: String,
    pub allow_other: bool,
    pub auto_unmount: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            fsname: "tagfs".to_string(),
            allow_other: false,
            auto_unmount: false,
        }
    }
}

impl MountOptions {
    /// The option list handed to the kernel. Always read-only.
    #[must_use]
    pub fn to_fuser(&self) -> Vec<MountOption> {
        let mut options = vec![MountOption::RO, MountOption::FSName(self.fsname.clone())];
        if self.allow_other {
            options.push(MountOption::AllowOther);
        }
        if self.auto_unmount {
            options.push(MountOption::AutoUnmount);
            // fusermount refuses auto_unmount unless other users may access
            if !self.allow_other {
                options.push(MountOption::AllowRoot);
            }
        }
        options
    }
}

/// One slot of a `readdir` reply
#[derive(Debug, Clone, PartialEq, Eq)]
struct DirSlot {
    ino: u64,
    /// Offset to pass back to resume after this slot
    offset: i64,
    kind: FileType,
    name: String,
}

/// [`TagFs`] as a `fuser` filesystem
///
/// Each callback is a thin wrapper around a method returning
/// `Result<_, c_int>`, where the error is the errno to reply with.
pub struct FuseAdapter<S: Storage> {
    fs: TagFs<S>,
    inodes: InodeTable,
}

impl<S: Storage> FuseAdapter<S> {
    #[must_use]
    pub fn new(fs: TagFs<S>) -> Self {
        Self { fs, inodes: InodeTable::new() }
    }

    fn path_of(&self, ino: u64) -> Result<String, c_int> {
        self.inodes.path(ino).map(str::to_string).ok_or(ENOENT)
    }

    /// Attributes of `name` under `parent`, interning its inode on success
    fn lookup_child(&mut self, parent: u64, name: &OsStr) -> Result<FileAttr, c_int> {
        let parent = self.path_of(parent)?;
        let name = name.to_str().ok_or(ENOENT)?;
        let path = child_path(&parent, name);
        tracing::trace!(path = path.as_str(), "lookup");

        let attrs = self.fs.attributes(&path).map_err(|e| failure("lookup", &path, &e))?;
        let ino = self.inodes.intern(&path);
        Ok(file_attr(ino, &attrs))
    }

    fn attr_of(&self, ino: u64) -> Result<FileAttr, c_int> {
        let path = self.path_of(ino)?;
        tracing::trace!(ino, path = path.as_str(), "getattr");

        let attrs = self.fs.attributes(&path).map_err(|e| failure("getattr", &path, &e))?;
        Ok(file_attr(ino, &attrs))
    }

    fn link_target(&self, ino: u64) -> Result<Vec<u8>, c_int> {
        let path = self.path_of(ino)?;
        tracing::trace!(ino, path = path.as_str(), "readlink");

        let target = self.fs.read_link(&path).map_err(|e| failure("readlink", &path, &e))?;
        Ok(target.as_os_str().as_bytes().to_vec())
    }

    fn open_dir(&self, ino: u64) -> Result<(), c_int> {
        let path = self.path_of(ino)?;
        let attrs = self.fs.attributes(&path).map_err(|e| failure("opendir", &path, &e))?;
        if attrs.kind == NodeKind::Directory {
            Ok(())
        } else {
            Err(ENOTDIR)
        }
    }

    /// Listing of `ino` starting after `offset`, with an inode for every
    /// child. Resuming from the last slot's `offset` continues the listing.
    fn dir_entries(&mut self, ino: u64, offset: i64) -> Result<Vec<DirSlot>, c_int> {
        let path = self.path_of(ino)?;
        tracing::debug!(ino, path = path.as_str(), offset, "readdir");

        let skip = usize::try_from(offset).unwrap_or(0);
        let mut slots = Vec::new();
        for (i, entry) in self.fs.list(&path).enumerate().skip(skip) {
            let child_ino = match entry.name {
                "." => ino,
                ".." => self.inodes.intern(parent_path(&path)),
                name => self.inodes.intern(&child_path(&path, name)),
            };
            slots.push(DirSlot {
                ino: child_ino,
                offset: i as i64 + 1,
                kind: file_type(entry.kind),
                name: entry.name.to_string(),
            });
        }
        Ok(slots)
    }

    fn check_access(&self, ino: u64, mask: i32) -> Result<(), c_int> {
        let path = self.path_of(ino)?;
        tracing::trace!(ino, path = path.as_str(), mask, "access");

        self.fs
            .access(&path, AccessMode::from_mask(mask))
            .map_err(|e| failure("access", &path, &e))
    }
}

/// Mount `fs` at `mountpoint` and serve requests until unmounted.
///
/// # Errors
/// Returns an error if the mount fails or the session ends abnormally.
pub fn mount<S: Storage + 'static>(
    fs: TagFs<S>,
    mountpoint: &Path,
    options: &MountOptions,
) -> io::Result<()> {
    tracing::info!(
        mountpoint = %mountpoint.display(),
        entries = fs.index().len(),
        tags = fs.index().tag_universe().len(),
        "mounting"
    );
    fuser::mount2(FuseAdapter::new(fs), mountpoint, &options.to_fuser())
}

const fn file_type(kind: NodeKind) -> FileType {
    match kind {
        NodeKind::Directory => FileType::Directory,
        NodeKind::Symlink => FileType::Symlink,
    }
}

fn file_attr(ino: u64, attrs: &Attributes) -> FileAttr {
    FileAttr {
        ino,
        size: attrs.size,
        blocks: attrs.size.div_ceil(512),
        atime: attrs.atime,
        mtime: attrs.mtime,
        ctime: attrs.ctime,
        crtime: attrs.ctime,
        kind: file_type(attrs.kind),
        perm: attrs.perm,
        nlink: attrs.nlink,
        uid: attrs.uid,
        gid: attrs.gid,
        rdev: 0,
        blksize: BLOCK_SIZE,
        flags: 0,
    }
}

fn failure(op: &str, path: &str, err: &FsError) -> c_int {
    match err {
        FsError::NotFound { .. } => tracing::trace!(op, path, "not found"),
        _ => tracing::debug!(op, path, error = %err, "request failed"),
    }
    err.errno()
}

impl<S: Storage> Filesystem for FuseAdapter<S> {
    fn init(&mut self, _req: &Request<'_>, _config: &mut KernelConfig) -> Result<(), c_int> {
        tracing::info!(entries = self.fs.index().len(), "filesystem ready");
        Ok(())
    }

    fn destroy(&mut self) {
        tracing::info!(inodes = self.inodes.len(), "filesystem unmounted");
    }

    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        match self.lookup_child(parent, name) {
            Ok(attr) => reply.entry(&TTL, &attr, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        match self.attr_of(ino) {
            Ok(attr) => reply.attr(&TTL, &attr),
            Err(errno) => reply.error(errno),
        }
    }

    fn readlink(&mut self, _req: &Request<'_>, ino: u64, reply: ReplyData) {
        match self.link_target(ino) {
            Ok(target) => reply.data(&target),
            Err(errno) => reply.error(errno),
        }
    }

    fn opendir(&mut self, _req: &Request<'_>, ino: u64, _flags: i32, reply: ReplyOpen) {
        match self.open_dir(ino) {
            Ok(()) => reply.opened(0, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        _fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        match self.dir_entries(ino, offset) {
            Ok(slots) => {
                for slot in &slots {
                    if reply.add(slot.ino, slot.offset, slot.kind, &slot.name) {
                        break;
                    }
                }
                reply.ok();
            }
            Err(errno) => reply.error(errno),
        }
    }

    fn access(&mut self, _req: &Request<'_>, ino: u64, mask: i32, reply: ReplyEmpty) {
        match self.check_access(ino, mask) {
            Ok(()) => reply.ok(),
            Err(errno) => reply.error(errno),
        }
    }

    fn statfs(&mut self, _req: &Request<'_>, _ino: u64, reply: ReplyStatfs) {
        let files = (self.fs.index().len() + self.fs.index().tag_universe().len()) as u64;
        reply.statfs(0, 0, 0, files, 0, BLOCK_SIZE, MAX_NAME_LEN, BLOCK_SIZE);
    }
}
