use std::path::Path;

use super::garbage;
use crate::common::errlog::{self, ErrorSink};
use crate::common::errors::describe_io;

/// Outcome of looking inside one folder.
///
/// Only [`Emptiness::Empty`] makes a folder a deletion candidate; the other
/// variants say why it is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emptiness {
    /// No subfolders and no files that count
    Empty,
    /// At least one subfolder (enumeration stopped there)
    HasSubdirectory,
    /// At least one file that counts (enumeration stopped there)
    HasFiles,
    /// Contents could not be listed; never deleted
    Unreadable,
}

impl Emptiness {
    pub fn is_empty(self) -> bool {
        self == Emptiness::Empty
    }

    /// The effective element count: 0 when empty, 1 otherwise.
    pub fn effective_count(self) -> usize {
        if self.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Inspect the direct children of `dir` (non-recursive).
///
/// Stops at the first subfolder or the first file that counts. With
/// `ignore_garbage`, names in [`garbage::IGNORABLE_FILES`] are skipped.
/// Symlinks are not followed: a link to a folder counts as a file.
/// A listing failure is reported to `log` and yields [`Emptiness::Unreadable`].
pub fn evaluate(dir: &Path, ignore_garbage: bool, log: &dyn ErrorSink) -> Emptiness {
    let entries = match std::fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            errlog::report(log, dir, &describe_io(&e));
            return Emptiness::Unreadable;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errlog::report(log, dir, &describe_io(&e));
                return Emptiness::Unreadable;
            }
        };

        // DirEntry::file_type does not traverse symlinks
        let is_dir = match entry.file_type() {
            Ok(ft) => ft.is_dir(),
            Err(e) => {
                errlog::report(log, &entry.path(), &describe_io(&e));
                return Emptiness::Unreadable;
            }
        };
        if is_dir {
            return Emptiness::HasSubdirectory;
        }

        if ignore_garbage {
            if let Some(name) = entry.file_name().to_str() {
                if garbage::is_ignorable(name) {
                    continue;
                }
            }
        }
        return Emptiness::HasFiles;
    }

    Emptiness::Empty
}

/// Numeric form of [`evaluate`]: 0 means effectively empty.
pub fn effective_count(dir: &Path, ignore_garbage: bool, log: &dyn ErrorSink) -> usize {
    evaluate(dir, ignore_garbage, log).effective_count()
}
