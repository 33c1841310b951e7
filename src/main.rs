use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use karafo::cleaner::{self, DeleteOptions, RealDirOps};
use karafo::cli::args::{Cli, Commands, ConfigAction, OutputFormat};
use karafo::cli::output;
use karafo::common::config::{self, Config};
use karafo::common::errlog::FileErrorLog;
use karafo::common::{format, safety};
use karafo::scanner::{self, cache::ScanCache, ScanOptions, ScanReport};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("karafo=debug")
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Scan {
            ref paths,
            no_cache,
            strict,
            ref exclude,
        } => cmd_scan(&cli, paths, no_cache, strict, exclude),

        Commands::Clean {
            ref paths,
            yes,
            interactive,
            ref exclude,
            dry_run,
            keep_garbage,
            max_passes,
            no_cache,
            strict,
        } => cmd_clean(
            &cli,
            paths,
            CleanFlags {
                yes,
                interactive,
                exclude: exclude.clone(),
                dry_run,
                keep_garbage,
                max_passes,
                no_cache,
                strict,
            },
        ),

        Commands::Config { ref action } => cmd_config(action),

        Commands::Completions { ref shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                karafo::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                karafo::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                karafo::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "karafo", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Command-line format wins over the configured one
fn resolve_format(cli: &Cli, config: &Config) -> OutputFormat {
    match (&cli.format, &config.output_format) {
        (Some(f), _) => f.clone(),
        (None, config::OutputFormat::Human) => OutputFormat::Human,
        (None, config::OutputFormat::Json) => OutputFormat::Json,
        (None, config::OutputFormat::Quiet) => OutputFormat::Quiet,
    }
}

/// Expand a leading ~ to the home directory
fn expand_path(path: &str) -> PathBuf {
    let home = dirs::home_dir().unwrap_or_default();
    if path == "~" {
        home
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

fn cmd_scan(
    cli: &Cli,
    paths: &[String],
    no_cache: bool,
    strict: bool,
    exclude: &[String],
) -> Result<()> {
    let mut config = Config::load()?;
    config.exclude_paths.extend(exclude.iter().cloned());
    let fmt = resolve_format(cli, &config);
    let roots: Vec<PathBuf> = paths.iter().map(|p| expand_path(p)).collect();

    let opts = ScanOptions {
        ignore_garbage: config.ignore_garbage && !strict,
        use_cache: config.fast_rescan && !no_cache,
    };
    let log = FileErrorLog::new(config.logs_dir());
    let mut cache = ScanCache::new();

    let mut report = scanner::scan_with_report(&roots, &opts, &mut cache, &log);
    drop_excluded(&mut report, &config);

    match fmt {
        OutputFormat::Human if !cli.quiet => output::print_scan_results(&report),
        OutputFormat::Json => output::print_scan_json(&report),
        _ => output::print_scan_quiet(&report),
    }

    Ok(())
}

// ─── Clean ────────────────────────────────────────────────────────────────────

struct CleanFlags {
    yes: bool,
    interactive: bool,
    exclude: Vec<String>,
    dry_run: bool,
    keep_garbage: bool,
    max_passes: Option<u64>,
    no_cache: bool,
    strict: bool,
}

fn cmd_clean(cli: &Cli, paths: &[String], flags: CleanFlags) -> Result<()> {
    let mut config = Config::load()?;
    config.exclude_paths.extend(flags.exclude.iter().cloned());
    let fmt = resolve_format(cli, &config);
    let human = matches!(fmt, OutputFormat::Human) && !cli.quiet;
    let roots: Vec<PathBuf> = paths.iter().map(|p| expand_path(p)).collect();

    let scan_opts = ScanOptions {
        ignore_garbage: config.ignore_garbage && !flags.strict,
        use_cache: config.fast_rescan && !flags.no_cache,
    };
    let delete_opts = DeleteOptions {
        remove_garbage_files: config.remove_garbage_files && !flags.keep_garbage,
        ignore_garbage_for_empty: scan_opts.ignore_garbage,
        max_passes: flags
            .max_passes
            .map(|n| n as usize)
            .unwrap_or(config.max_passes)
            .max(1),
        use_cache: scan_opts.use_cache,
    };

    let log_dir = config.logs_dir();
    let log = FileErrorLog::new(&log_dir);
    let mut cache = ScanCache::new();

    let mut report = scanner::scan_with_report(&roots, &scan_opts, &mut cache, &log);

    // Never offer protected folders, even when they are empty
    let (protected, targets): (Vec<PathBuf>, Vec<PathBuf>) = report
        .folders
        .drain(..)
        .partition(|p| safety::is_protected(p));
    report.folders = targets;
    let excluded = drop_excluded(&mut report, &config);
    if human {
        for p in &protected {
            println!("  {} Protected, skipped: {}", "🛡".yellow(), format::format_path(p));
        }
        for p in &excluded {
            println!("  {} Excluded: {}", "⊘".dimmed(), format::format_path(p));
        }
    }

    if report.folders.is_empty() {
        match fmt {
            OutputFormat::Json => output::print_scan_json(&report),
            _ if human => println!("  {} No empty folders found.", "✨"),
            _ => {}
        }
        return Ok(());
    }

    if human {
        output::print_scan_results(&report);
    }

    if flags.dry_run {
        match fmt {
            OutputFormat::Json => output::print_scan_json(&report),
            OutputFormat::Quiet => output::print_scan_quiet(&report),
            OutputFormat::Human => println!(
                "  {} Dry run: would remove {}. Nothing modified.",
                "ℹ️",
                format::format_folders(report.folders.len())
            ),
        }
        return Ok(());
    }

    if flags.interactive {
        report.folders = pick_folders(std::mem::take(&mut report.folders))?;
        if report.folders.is_empty() {
            println!("  {} Nothing selected", "✗".red());
            return Ok(());
        }
    } else if !flags.yes {
        print!(
            "\n  {} Delete {}? [y/N] ",
            "❓",
            format::format_folders(report.folders.len())
        );
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("  {} Cancelled", "✗".red());
            return Ok(());
        }
    }

    let pb = if human {
        let pb = ProgressBar::new(report.folders.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    let result = cleaner::delete_with_report(
        &report.folders,
        |current, total, label| {
            if let Some(ref pb) = pb {
                pb.set_length(total as u64);
                pb.set_position(current as u64);
                pb.set_message(format::truncate_left(label, 40));
            }
        },
        &delete_opts,
        &mut cache,
        &log,
        &RealDirOps,
    );

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    // Flush whatever the run left behind for the targets
    for target in &report.folders {
        cache.clear_under(target);
    }

    match fmt {
        OutputFormat::Human if !cli.quiet => output::print_delete_report(&result, &log_dir),
        OutputFormat::Json => output::print_delete_json(&result, &log_dir),
        _ => println!("{}  {}", result.deleted_count(), result.remaining.len()),
    }

    Ok(())
}

/// Split off folders matching the configured or --exclude patterns
fn drop_excluded(report: &mut ScanReport, config: &Config) -> Vec<PathBuf> {
    let (excluded, kept): (Vec<PathBuf>, Vec<PathBuf>) = report
        .folders
        .drain(..)
        .partition(|p| config.is_excluded(p));
    report.folders = kept;
    excluded
}

/// Ask about each folder in turn and keep the ones answered with y.
/// End of input answers no for everything left.
fn pick_folders(folders: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    use std::io::{BufRead, Write};

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    let mut picked = Vec::new();

    for folder in folders {
        print!("  {} Delete {}? [y/N] ", "❓", format::format_path(&folder));
        std::io::stdout().flush()?;

        let answer = match lines.next() {
            Some(line) => line?,
            None => String::new(),
        };
        if answer.trim().eq_ignore_ascii_case("y") {
            picked.push(folder);
        }
    }

    Ok(picked)
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            format::print_kv("logs", &format::format_path(&config.logs_dir()));
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path().display());
            Ok(())
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("  {} Set {} = {}", "✓".green(), key, value);
            Ok(())
        }
    }
}
