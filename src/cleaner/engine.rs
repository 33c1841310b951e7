use std::cell::Cell;
use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::sweeper;
use crate::common::errlog::{self, ErrorSink};
use crate::common::errors::SweepError;
use crate::common::{permissions, safety};
use crate::scanner::cache::ScanCache;
use crate::scanner::{self, ScanOptions};

/// Label of the final progress call
pub const DONE_LABEL: &str = "done";

/// Knobs for a deletion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Delete known junk files before judging each folder
    pub remove_garbage_files: bool,
    /// Known junk files do not count when judging emptiness
    pub ignore_garbage_for_empty: bool,
    /// Upper bound on passes; each pass can resolve one more level upward
    pub max_passes: usize,
    /// Judge emptiness through the scan cache
    pub use_cache: bool,
}

impl Default for DeleteOptions {
    fn default() -> Self {
        Self {
            remove_garbage_files: true,
            ignore_garbage_for_empty: true,
            max_passes: 3,
            use_cache: true,
        }
    }
}

/// The two filesystem mutations the deleter performs on a folder.
pub trait DirOps {
    /// Best-effort permission grant before removal
    fn grant_access(&self, dir: &Path) -> std::io::Result<()>;
    /// Remove an empty folder
    fn remove_dir(&self, dir: &Path) -> std::io::Result<()>;
}

/// [`DirOps`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealDirOps;

impl DirOps for RealDirOps {
    fn grant_access(&self, dir: &Path) -> std::io::Result<()> {
        permissions::grant_dir_access(dir)
    }

    fn remove_dir(&self, dir: &Path) -> std::io::Result<()> {
        std::fs::remove_dir(dir)
    }
}

/// What a deletion run did
#[derive(Debug, Clone, Default)]
pub struct DeleteReport {
    /// Folders removed, in removal order
    pub deleted: Vec<PathBuf>,
    /// Candidates still on disk when the run ended, sorted
    pub remaining: Vec<PathBuf>,
    /// Size of the deduplicated input (the progress denominator)
    pub total: usize,
    /// Passes actually run
    pub passes: usize,
    /// Error records written during the run
    pub errors: usize,
}

impl DeleteReport {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }
}

/// Delete `folders` bottom-up and cascade upward; returns how many were removed.
///
/// `progress` receives `(current, total, label)`; `current` never decreases
/// and the last call is always `(total, total, "done")`.
pub fn delete_empty_folders<P, F>(
    folders: &[P],
    progress: F,
    opts: &DeleteOptions,
    cache: &mut ScanCache,
    log: &dyn ErrorSink,
) -> usize
where
    P: AsRef<Path>,
    F: FnMut(usize, usize, &str),
{
    delete_with_report(folders, progress, opts, cache, log, &RealDirOps).deleted_count()
}

/// Full form of [`delete_empty_folders`] with an injectable [`DirOps`].
///
/// Each pass walks a snapshot of the candidate set, longest path first.
/// A removed folder's parent joins the set, so emptiness propagates upward
/// one level per pass. The run ends when a pass removes nothing, the set
/// is exhausted, or `max_passes` is reached. No single failure aborts it.
pub fn delete_with_report<P, F>(
    folders: &[P],
    mut progress: F,
    opts: &DeleteOptions,
    cache: &mut ScanCache,
    log: &dyn ErrorSink,
    ops: &dyn DirOps,
) -> DeleteReport
where
    P: AsRef<Path>,
    F: FnMut(usize, usize, &str),
{
    let log = CountingSink::new(log);
    let scan_opts = ScanOptions {
        ignore_garbage: opts.ignore_garbage_for_empty,
        use_cache: opts.use_cache,
    };

    // Keyed by the raw path text: `a` and `a/` are two candidates
    let mut candidates: HashSet<OsString> = folders
        .iter()
        .map(|f| f.as_ref().as_os_str().to_os_string())
        .collect();
    let total = candidates.len();
    let mut counted: HashSet<OsString> = HashSet::new();
    let mut deleted = Vec::new();
    let mut passes = 0;

    for pass in 1..=opts.max_passes {
        if candidates.is_empty() {
            break;
        }
        passes = pass;

        let order = pass_order(&candidates);
        let mut deleted_in_pass = 0usize;

        for key in order {
            let dir = PathBuf::from(&key);
            if counted.insert(key.clone()) {
                progress(counted.len().min(total), total, &label_for(&dir));
            }

            if !dir.is_dir() {
                tracing::debug!(path = %dir.display(), "already gone");
                candidates.remove(&key);
                continue;
            }

            match try_delete(&dir, opts, &scan_opts, cache, &log, ops) {
                Ok(true) => {
                    tracing::debug!(pass, path = %dir.display(), "removed");
                    deleted_in_pass += 1;
                    candidates.remove(&key);
                    cache.clear_under(&dir);
                    if let Some(parent) = cascade_parent(&dir) {
                        // mtime may not have ticked yet
                        cache.invalidate(&parent);
                        candidates.insert(parent.into_os_string());
                    }
                    deleted.push(dir);
                }
                Ok(false) => {}
                Err(e) => {
                    errlog::report(&log, e.path(), &e.to_string());
                }
            }
        }

        tracing::info!(pass, deleted = deleted_in_pass, left = candidates.len(), "pass finished");
        if deleted_in_pass == 0 {
            break;
        }
    }

    for key in &candidates {
        cache.clear_under(Path::new(key));
    }
    progress(total, total, DONE_LABEL);

    let mut keys: Vec<OsString> = candidates.into_iter().collect();
    keys.sort();
    let remaining: Vec<PathBuf> = keys.into_iter().map(PathBuf::from).collect();

    DeleteReport {
        deleted,
        remaining,
        total,
        passes,
        errors: log.count(),
    }
}

/// Sweep, re-judge, and remove one folder.
/// `Ok(false)` means "not empty (yet)"; the folder stays a candidate.
fn try_delete(
    dir: &Path,
    opts: &DeleteOptions,
    scan_opts: &ScanOptions,
    cache: &mut ScanCache,
    log: &dyn ErrorSink,
    ops: &dyn DirOps,
) -> Result<bool, SweepError> {
    if safety::is_protected(dir) {
        tracing::warn!(path = %dir.display(), "protected folder, not deleting");
        return Ok(false);
    }

    if opts.remove_garbage_files && sweeper::delete_known_garbage(dir, log) > 0 {
        cache.invalidate(dir);
    }

    if !scanner::is_empty_cached(dir, scan_opts, cache, log) {
        return Ok(false);
    }

    if let Err(e) = ops.grant_access(dir) {
        tracing::debug!(path = %dir.display(), "permission grant failed: {}", e);
    }
    ops.remove_dir(dir).map_err(|e| SweepError::io(dir, e))?;
    Ok(true)
}

/// Longest path first, which puts children before their parents.
/// Ties break on the path itself so runs are reproducible.
fn pass_order(candidates: &HashSet<OsString>) -> Vec<OsString> {
    let mut order: Vec<OsString> = candidates.iter().cloned().collect();
    order.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    order
}

fn cascade_parent(dir: &Path) -> Option<PathBuf> {
    dir.parent()
        .filter(|p| !p.as_os_str().is_empty() && *p != dir)
        .map(Path::to_path_buf)
}

fn label_for(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

/// Forwards to another sink and counts what passed through.
struct CountingSink<'a> {
    inner: &'a dyn ErrorSink,
    count: Cell<usize>,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a dyn ErrorSink) -> Self {
        Self {
            inner,
            count: Cell::new(0),
        }
    }

    fn count(&self) -> usize {
        self.count.get()
    }
}

impl ErrorSink for CountingSink<'_> {
    fn record(&self, target: &Path, message: &str) -> Result<PathBuf, SweepError> {
        self.count.set(self.count.get() + 1);
        self.inner.record(target, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_order_longest_first() {
        let set: HashSet<OsString> = ["/a", "/a/bb/c", "/a/bb", "/z/y", "/a/"]
            .iter()
            .map(OsString::from)
            .collect();
        let order = pass_order(&set);
        let expected: Vec<OsString> = ["/a/bb/c", "/a/bb", "/z/y", "/a/", "/a"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn test_cascade_parent() {
        assert_eq!(cascade_parent(Path::new("/a/b")), Some(PathBuf::from("/a")));
        assert_eq!(cascade_parent(Path::new("/")), None);
        assert_eq!(cascade_parent(Path::new("rel")), None);
        assert_eq!(cascade_parent(Path::new("rel/x")), Some(PathBuf::from("rel")));
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for(Path::new("/data/photos")), "photos");
        assert_eq!(label_for(Path::new("/")), "/");
    }

    #[test]
    fn test_empty_input_still_reports_done() {
        let log = crate::common::errlog::MemoryErrorLog::new();
        let mut cache = ScanCache::new();
        let mut calls = Vec::new();
        let none: [&Path; 0] = [];

        let n = delete_empty_folders(
            &none,
            |c, t, l| calls.push((c, t, l.to_string())),
            &DeleteOptions::default(),
            &mut cache,
            &log,
        );

        assert_eq!(n, 0);
        assert_eq!(calls, vec![(0, 0, DONE_LABEL.to_string())]);
    }
}
