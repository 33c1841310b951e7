//! # karafo
//!
//! Find folders that are empty, or hold nothing but known junk files
//! (`Thumbs.db`, `desktop.ini`, `.DS_Store`), and delete them in bulk.
//!
//! - **Scanner**: walks roots children-first and collects effectively empty folders
//! - **Fast rescan**: an in-memory, mtime-keyed cache skips unchanged folders
//! - **Cascading delete**: removing a folder makes its parent a candidate, so
//!   nested empty chains disappear over successive passes
//! - **Fail-safe**: unreadable folders count as non-empty; every failure is
//!   written to an error log and the run continues

pub mod cli;
pub mod cleaner;
pub mod common;
pub mod scanner;

// Re-export commonly used items
pub use cleaner::{delete_empty_folders, delete_with_report, DeleteOptions, DeleteReport};
pub use common::errlog::{ErrorSink, FileErrorLog, MemoryErrorLog};
pub use scanner::cache::ScanCache;
pub use scanner::{find_empty_folders, scan_with_report, ScanOptions, ScanReport};
