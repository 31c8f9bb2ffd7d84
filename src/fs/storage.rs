//! Access to the real files behind the virtual entries

use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// `access(2)` mode bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessMode(i32);

impl AccessMode {
    pub const EXISTS: Self = Self(libc::F_OK);
    pub const READ: Self = Self(libc::R_OK);
    pub const WRITE: Self = Self(libc::W_OK);
    pub const EXECUTE: Self = Self(libc::X_OK);

    /// Wrap a raw mask as received from the kernel
    #[must_use]
    pub const fn from_mask(mask: i32) -> Self {
        Self(mask)
    }

    #[must_use]
    pub const fn bits(self) -> i32 {
        self.0
    }
}

impl std::ops::BitOr for AccessMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The subset of `stat` results the filesystem reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredAttributes {
    /// Full `st_mode`, type bits included
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

/// Read-only view of the underlying storage.
///
/// Both calls are side-effect free and may run concurrently.
pub trait Storage: Send + Sync {
    /// Attributes of `path`, following symlinks.
    ///
    /// # Errors
    /// Returns the OS error if `path` cannot be stat'ed.
    fn stat(&self, path: &Path) -> io::Result<StoredAttributes>;

    /// Whether the calling process may access `path` with `mode`.
    ///
    /// # Errors
    /// Returns an error for failures other than a plain denial.
    fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool>;
}

/// The host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct HostStorage;

impl Storage for HostStorage {
    fn stat(&self, path: &Path) -> io::Result<StoredAttributes> {
        let meta = fs::metadata(path)?;
        Ok(StoredAttributes {
            mode: meta.mode(),
            uid: meta.uid(),
            gid: meta.gid(),
            atime: meta.accessed().unwrap_or(UNIX_EPOCH),
            mtime: meta.modified().unwrap_or(UNIX_EPOCH),
            ctime: unix_time(meta.ctime(), meta.ctime_nsec()),
        })
    }

    fn access(&self, path: &Path, mode: AccessMode) -> io::Result<bool> {
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        // SAFETY: c_path is a valid NUL-terminated string for the duration of the call
        let rc = unsafe { libc::access(c_path.as_ptr(), mode.bits()) };
        if rc == 0 {
            return Ok(true);
        }

        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EACCES | libc::EPERM | libc::EROFS) => Ok(false),
            _ => Err(err),
        }
    }
}

fn unix_time(secs: i64, nsecs: i64) -> SystemTime {
    match (u64::try_from(secs), u32::try_from(nsecs)) {
        (Ok(secs), Ok(nsecs)) => UNIX_EPOCH + Duration::new(secs, nsecs),
        _ => UNIX_EPOCH,
    }
}
