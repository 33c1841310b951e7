use colored::*;
use std::path::{Path, PathBuf};

use crate::cleaner::DeleteReport;
use crate::common::format::{self, format_folders, format_path, truncate_left};
use crate::scanner::ScanReport;

const PATH_WIDTH: usize = 72;

/// Print scan results in human-readable format
pub fn print_scan_results(report: &ScanReport) {
    println!();
    println!("{}  karafo Scan Results", "🗂");
    println!("{}", "─".repeat(60).dimmed());
    println!(
        "  Scanned {} in {}  •  {} empty",
        format_folders(report.visited).dimmed(),
        format::format_duration(report.duration_secs).cyan(),
        report.folders.len().to_string().yellow().bold()
    );
    if report.cache_stats.hits > 0 {
        println!(
            "  {} Fast rescan: {} cached, {} re-checked ({:.0}% hit rate)",
            "⚡",
            report.cache_stats.hits,
            report.cache_stats.misses + report.cache_stats.invalidated,
            report.cache_stats.hit_rate()
        );
    }
    println!("{}", "─".repeat(60).dimmed());
    println!();

    for root in &report.skipped_roots {
        println!(
            "  {} Not a folder, skipped: {}",
            "⚠".yellow(),
            format_path(root)
        );
    }

    if report.folders.is_empty() {
        println!("  {} No empty folders found.", "✨");
        return;
    }

    print_folder_list(&report.folders);
    println!();
}

/// Print a list of folders, one per line
pub fn print_folder_list(folders: &[PathBuf]) {
    for folder in folders {
        println!(
            "  {} {}",
            "○".dimmed(),
            truncate_left(&format_path(folder), PATH_WIDTH)
        );
    }
}

/// Print scan results as JSON
pub fn print_scan_json(report: &ScanReport) {
    let json = serde_json::json!({
        "empty_folders": report.folders,
        "count": report.folders.len(),
        "visited": report.visited,
        "skipped_roots": report.skipped_roots,
        "cache": {
            "hits": report.cache_stats.hits,
            "misses": report.cache_stats.misses,
            "invalidated": report.cache_stats.invalidated,
        },
        "duration_secs": report.duration_secs,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".into())
    );
}

/// Print scan results one path per line (pipe-friendly)
pub fn print_scan_quiet(report: &ScanReport) {
    for folder in &report.folders {
        println!("{}", folder.display());
    }
}

/// Print the result of a deletion run
pub fn print_delete_report(report: &DeleteReport, log_dir: &Path) {
    println!();
    let icon = if report.remaining.is_empty() {
        "✓".green()
    } else {
        "⚠".yellow()
    };
    println!(
        "  {} {} {} removed  •  {} pass{}",
        icon,
        "Deleted".bold(),
        format_folders(report.deleted_count()).cyan(),
        report.passes,
        if report.passes == 1 { "" } else { "es" }
    );

    if !report.remaining.is_empty() {
        println!();
        println!(
            "  {} {} could not be removed:",
            "⚠".yellow(),
            format_folders(report.remaining.len())
        );
        for folder in report.remaining.iter().take(10) {
            println!("    {} {}", "✗".red(), truncate_left(&format_path(folder), PATH_WIDTH));
        }
        if report.remaining.len() > 10 {
            println!("    ... and {} more", report.remaining.len() - 10);
        }
        println!(
            "  {} Run again to retry, or raise --max-passes for deep chains.",
            "💡"
        );
    }

    if report.errors > 0 {
        println!(
            "  {} {} error record{} written to {}",
            "⚠".yellow(),
            report.errors,
            if report.errors == 1 { "" } else { "s" },
            format_path(log_dir).cyan()
        );
    }
    println!();
}

/// Print the result of a deletion run as JSON
pub fn print_delete_json(report: &DeleteReport, log_dir: &Path) {
    let json = serde_json::json!({
        "deleted": report.deleted_count(),
        "deleted_folders": report.deleted,
        "remaining_folders": report.remaining,
        "requested": report.total,
        "passes": report.passes,
        "errors": report.errors,
        "log_dir": log_dir,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".into())
    );
}
