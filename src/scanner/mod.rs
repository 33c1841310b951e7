pub mod cache;
pub mod evaluator;
pub mod garbage;

use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

use crate::common::errlog::ErrorSink;
use cache::{CacheStats, ScanCache};
use evaluator::Emptiness;

/// How folders are judged during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Known junk files do not count as content
    pub ignore_garbage: bool,
    /// Reuse cached results for folders whose mtime is unchanged
    pub use_cache: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_garbage: true,
            use_cache: false,
        }
    }
}

/// Result of a scan, with bookkeeping for display
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Effectively empty folders, unique and sorted by path
    pub folders: Vec<PathBuf>,
    /// Roots that were skipped because they are not folders
    pub skipped_roots: Vec<PathBuf>,
    /// Folders looked at
    pub visited: usize,
    /// Cache activity during this scan
    pub cache_stats: CacheStats,
    pub duration_secs: f64,
}

/// Is `dir` effectively empty, consulting `cache` when `opts.use_cache` is set?
///
/// With the cache on, a folder that can no longer be stat'ed is reported as
/// not empty so nothing acts on it.
pub fn is_empty_cached(
    dir: &Path,
    opts: &ScanOptions,
    cache: &mut ScanCache,
    log: &dyn ErrorSink,
) -> bool {
    if !opts.use_cache {
        return evaluator::evaluate(dir, opts.ignore_garbage, log).is_empty();
    }

    let mtime = match std::fs::metadata(dir).and_then(|m| m.modified()) {
        Ok(mtime) => mtime,
        Err(e) => {
            tracing::debug!(path = %dir.display(), "stat failed, treating as not empty: {}", e);
            return false;
        }
    };

    let emptiness: Emptiness = match cache.check(dir, mtime) {
        Some(cached) => cached,
        None => {
            let fresh = evaluator::evaluate(dir, opts.ignore_garbage, log);
            cache.set(dir, mtime, fresh);
            fresh
        }
    };

    emptiness.is_empty()
}

/// Collect every effectively empty folder under `roots` (roots included).
///
/// Roots that are not folders are skipped. Each subtree is walked children
/// first without following symlinks. The result is deduplicated and sorted.
pub fn find_empty_folders<P: AsRef<Path>>(
    roots: &[P],
    opts: &ScanOptions,
    cache: &mut ScanCache,
    log: &dyn ErrorSink,
) -> Vec<PathBuf> {
    scan_with_report(roots, opts, cache, log).folders
}

/// [`find_empty_folders`] plus scan statistics
pub fn scan_with_report<P: AsRef<Path>>(
    roots: &[P],
    opts: &ScanOptions,
    cache: &mut ScanCache,
    log: &dyn ErrorSink,
) -> ScanReport {
    let start = Instant::now();
    let stats_before = cache.stats();
    let mut found = Vec::new();
    let mut skipped_roots = Vec::new();
    let mut visited = 0usize;

    for root in roots {
        let root = root.as_ref();
        if !root.is_dir() {
            tracing::debug!(path = %root.display(), "root is not a folder, skipping");
            skipped_roots.push(root.to_path_buf());
            continue;
        }

        let walker = WalkDir::new(root).follow_links(false).contents_first(true);
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("walk error under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            visited += 1;
            if is_empty_cached(entry.path(), opts, cache, log) {
                found.push(entry.into_path());
            }
        }
    }

    // Compared as plain text, so `root` and `root/` stay distinct
    found.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    found.dedup_by(|a, b| a.as_os_str() == b.as_os_str());

    let after = cache.stats();
    let cache_stats = CacheStats {
        hits: after.hits.saturating_sub(stats_before.hits),
        misses: after.misses.saturating_sub(stats_before.misses),
        invalidated: after.invalidated.saturating_sub(stats_before.invalidated),
    };

    tracing::info!(
        found = found.len(),
        visited,
        hits = cache_stats.hits,
        "scan finished"
    );

    ScanReport {
        folders: found,
        skipped_roots,
        visited,
        cache_stats,
        duration_secs: start.elapsed().as_secs_f64(),
    }
}
