//! Unit tests for filesystem error types

#[cfg(test)]
mod tests {
    use crate::fs::error::FsError;
    use std::io;

    #[test]
    fn test_not_found() {
        let error = FsError::not_found("/finance/missing.txt");
        assert_eq!(error.to_string(), "No such entry: /finance/missing.txt");
        assert_eq!(error.errno(), libc::ENOENT);
    }

    #[test]
    fn test_permission_denied_is_eacces() {
        let error = FsError::permission_denied("/secret.txt");
        assert!(error.to_string().contains("Permission denied"));
        assert_eq!(error.errno(), libc::EACCES);
    }

    #[test]
    fn test_storage_error_keeps_os_errno() {
        let error = FsError::storage("/srv/gone.txt", io::Error::from_raw_os_error(libc::ENOENT));
        assert_eq!(error.errno(), libc::ENOENT);
        assert!(error.to_string().contains("/srv/gone.txt"));
    }

    #[test]
    fn test_storage_error_without_os_errno_is_eio() {
        let error = FsError::storage("/srv/x", io::Error::other("synthetic"));
        assert_eq!(error.errno(), libc::EIO);
    }

    #[test]
    fn test_error_debug() {
        let error = FsError::not_found("/x");
        assert!(format!("{error:?}").contains("NotFound"));
    }
}
