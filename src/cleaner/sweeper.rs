use std::path::Path;

use crate::common::errlog::{self, ErrorSink};
use crate::common::errors::describe_io;
use crate::common::permissions;
use crate::scanner::garbage;

/// Remove known junk files directly inside `dir`, whether or not the folder
/// is otherwise empty.
///
/// Best effort: each file is handled on its own and failures go to `log`.
/// Returns how many files were removed.
pub fn delete_known_garbage(dir: &Path, log: &dyn ErrorSink) -> usize {
    let entries = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            errlog::report(log, dir, &describe_io(&e));
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errlog::report(log, dir, &describe_io(&e));
                continue;
            }
        };

        let ignorable = entry
            .file_name()
            .to_str()
            .map(garbage::is_ignorable)
            .unwrap_or(false);
        if !ignorable {
            continue;
        }

        match entry.file_type() {
            Ok(ft) if ft.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                errlog::report(log, &entry.path(), &describe_io(&e));
                continue;
            }
        }

        let path = entry.path();
        let result = permissions::clear_readonly(&path).and_then(|_| std::fs::remove_file(&path));
        match result {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed junk file");
                removed += 1;
            }
            Err(e) => {
                errlog::report(log, &path, &describe_io(&e));
            }
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errlog::MemoryErrorLog;
    use std::fs;

    #[test]
    fn test_removes_only_junk() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::write(tmp.path().join("Thumbs.db"), b"x").unwrap();
        fs::write(tmp.path().join("desktop.ini"), b"x").unwrap();
        fs::write(tmp.path().join("keep.txt"), b"x").unwrap();
        let log = MemoryErrorLog::new();

        assert_eq!(delete_known_garbage(tmp.path(), &log), 2);
        assert!(!tmp.path().join("Thumbs.db").exists());
        assert!(!tmp.path().join("desktop.ini").exists());
        assert!(tmp.path().join("keep.txt").exists());
        assert!(log.is_empty());
    }

    #[test]
    fn test_read_only_junk_is_removed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let junk = tmp.path().join(".DS_Store");
        fs::write(&junk, b"x").unwrap();
        let mut perms = fs::metadata(&junk).unwrap().permissions();
        perms.set_readonly(true);
        fs::set_permissions(&junk, perms).unwrap();
        let log = MemoryErrorLog::new();

        assert_eq!(delete_known_garbage(tmp.path(), &log), 1);
        assert!(!junk.exists());
    }

    #[test]
    fn test_junk_named_folder_is_left_alone() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("Thumbs.db")).unwrap();
        let log = MemoryErrorLog::new();

        assert_eq!(delete_known_garbage(tmp.path(), &log), 0);
        assert!(tmp.path().join("Thumbs.db").is_dir());
        assert!(log.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_junk_named_symlink_is_left_alone() {
        let tmp = tempfile::TempDir::new().unwrap();
        let link = tmp.path().join(".DS_Store");
        std::os::unix::fs::symlink(tmp.path().join("missing"), &link).unwrap();
        let log = MemoryErrorLog::new();

        assert_eq!(delete_known_garbage(tmp.path(), &log), 0);
        assert!(fs::symlink_metadata(&link).is_ok());
        assert!(log.is_empty());
    }

    #[test]
    fn test_missing_dir_is_logged_not_raised() {
        let tmp = tempfile::TempDir::new().unwrap();
        let log = MemoryErrorLog::new();

        assert_eq!(delete_known_garbage(&tmp.path().join("nope"), &log), 0);
        assert_eq!(log.len(), 1);
    }
}
