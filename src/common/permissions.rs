use std::path::Path;

/// Grant the owner read/write/execute on a directory so it can be removed.
///
/// Callers ignore the result: removal is attempted regardless, and on some
/// platforms it succeeds without the change.
pub fn grant_dir_access(path: &Path) -> std::io::Result<()> {
    let mut perms = std::fs::metadata(path)?.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o700);
    }
    #[cfg(not(unix))]
    {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
    }
    std::fs::set_permissions(path, perms)
}

/// Clear the read-only attribute on a file (owner read/write on unix).
pub fn clear_readonly(path: &Path) -> std::io::Result<()> {
    let mut perms = std::fs::symlink_metadata(path)?.permissions();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        perms.set_mode(perms.mode() | 0o600);
    }
    #[cfg(not(unix))]
    {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
    }
    std::fs::set_permissions(path, perms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_readonly_makes_file_writable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("Thumbs.db");
        std::fs::write(&file, b"x").unwrap();

        let mut perms = std::fs::metadata(&file).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&file, perms).unwrap();

        clear_readonly(&file).unwrap();
        assert!(!std::fs::metadata(&file).unwrap().permissions().readonly());
    }

    #[test]
    fn test_grant_dir_access_missing_path_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(grant_dir_access(&tmp.path().join("missing")).is_err());
    }
}
