use std::collections::HashMap;
use std::path::Path;
use std::time::SystemTime;

use super::evaluator::Emptiness;

/// Last evaluation of one folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    /// Folder mtime when it was evaluated
    pub mtime: SystemTime,
    /// What the evaluation found
    pub emptiness: Emptiness,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub invalidated: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.invalidated;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// In-memory emptiness cache keyed by folder path, living for one session.
///
/// An entry is only reused while the folder's mtime matches the stored one.
/// Not synchronized: one caller drives scans and deletes at a time.
#[derive(Debug, Default)]
pub struct ScanCache {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }

    /// Raw lookup, no mtime check and no stats
    pub fn get(&self, path: &Path) -> Option<CacheEntry> {
        self.entries.get(&Self::key(path)).copied()
    }

    /// Store (or overwrite) the evaluation for a folder
    pub fn set(&mut self, path: &Path, mtime: SystemTime, emptiness: Emptiness) {
        self.entries
            .insert(Self::key(path), CacheEntry { mtime, emptiness });
    }

    /// Return the cached result if it is still valid for `current_mtime`
    pub fn check(&mut self, path: &Path, current_mtime: SystemTime) -> Option<Emptiness> {
        match self.entries.get(&Self::key(path)) {
            Some(entry) if entry.mtime == current_mtime => {
                self.stats.hits += 1;
                Some(entry.emptiness)
            }
            Some(_) => {
                self.stats.invalidated += 1;
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Remove a single path from the cache
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(&Self::key(path));
    }

    /// Drop every entry whose key starts with `root` as a plain string.
    ///
    /// There is no separator check, so clearing `/data/foo` also clears
    /// `/data/foobar`. That only costs a re-evaluation.
    pub fn clear_under(&mut self, root: &Path) -> usize {
        let prefix = Self::key(root);
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(&prefix));
        before - self.entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
