use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Runs the binary with its data directory inside `home`
fn karafo(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("karafo").unwrap();
    cmd.env("KARAFO_HOME", home.path()).arg("--no-color");
    cmd
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("keep.txt"), b"keep").unwrap();
    fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
    fs::create_dir_all(tmp.path().join("junk")).unwrap();
    fs::write(tmp.path().join("junk/Thumbs.db"), b"x").unwrap();
    fs::create_dir_all(tmp.path().join("docs")).unwrap();
    fs::write(tmp.path().join("docs/readme.md"), b"x").unwrap();
    tmp
}

// ─── Help & version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("empty folders"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("karafo"));
}

#[test]
fn test_no_subcommand_shows_help() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// ─── Scan command ────────────────────────────────────────────────────────────

#[test]
fn test_scan_quiet_lists_paths() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["scan", "--format", "quiet"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("c\n"))
        .stdout(predicate::str::contains("junk\n"))
        .stdout(predicate::str::contains("docs").not());
}

#[test]
fn test_scan_strict_counts_junk() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["scan", "--strict", "--format", "quiet"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("junk").not());
}

#[test]
fn test_scan_json_output() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["scan", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"empty_folders\""))
        .stdout(predicate::str::contains("\"count\": 2"));
}

#[test]
fn test_scan_missing_path_is_skipped() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .args(["scan", "/nonexistent/path/xyz123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Not a folder"));
}

#[test]
fn test_scan_requires_a_path() {
    let home = TempDir::new().unwrap();
    karafo(&home).arg("scan").assert().failure();
}

// ─── Clean command ───────────────────────────────────────────────────────────

#[test]
fn test_clean_dry_run_changes_nothing() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "--dry-run"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"));
    assert!(tree.path().join("a/b/c").is_dir());
    assert!(tree.path().join("junk/Thumbs.db").exists());
}

#[test]
fn test_clean_yes_removes_chain_and_junk() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "-y", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\": 4"));
    assert!(!tree.path().join("a").exists());
    assert!(!tree.path().join("junk").exists());
    assert!(tree.path().join("docs/readme.md").exists());
    assert!(tree.path().exists());
}

#[test]
fn test_clean_declined_keeps_everything() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .arg("clean")
        .arg(tree.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));
    assert!(tree.path().join("a/b/c").is_dir());
}

#[test]
fn test_clean_interactive_deletes_only_picked() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    // folders are offered in path order: a/b/c, then junk
    karafo(&home)
        .args(["clean", "-i"])
        .arg(tree.path())
        .write_stdin("y\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
    assert!(!tree.path().join("a").exists());
    assert!(tree.path().join("junk/Thumbs.db").exists());
}

#[test]
fn test_clean_interactive_nothing_picked() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "-i"])
        .arg(tree.path())
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing selected"));
    assert!(tree.path().join("a/b/c").is_dir());
    assert!(tree.path().join("junk").is_dir());
}

#[test]
fn test_clean_yes_conflicts_with_interactive() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "-y", "-i"])
        .arg(tree.path())
        .assert()
        .failure();
}

#[test]
fn test_clean_exclude_flag_keeps_matching_folders() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "-y", "--exclude", "junk", "--format", "json"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"deleted\": 3"));
    assert!(!tree.path().join("a").exists());
    assert!(tree.path().join("junk/Thumbs.db").exists());
}

#[test]
fn test_configured_excludes_apply_to_scan_and_clean() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["config", "set", "exclude_paths", "a/b/c"])
        .assert()
        .success();

    karafo(&home)
        .args(["scan", "--format", "quiet"])
        .arg(tree.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("junk"))
        .stdout(predicate::str::contains("a/b/c").not());

    karafo(&home)
        .args(["clean", "-y", "--format", "quiet"])
        .arg(tree.path())
        .assert()
        .success();
    assert!(tree.path().join("a/b/c").is_dir());
    assert!(!tree.path().join("junk").exists());
}

#[test]
fn test_clean_max_passes_bounds_cascade() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "-y", "--keep-garbage", "--max-passes", "1", "--format", "quiet"])
        .arg(tree.path())
        .assert()
        .success();
    assert!(!tree.path().join("a/b/c").exists());
    assert!(tree.path().join("a/b").is_dir());
}

#[test]
fn test_clean_rejects_zero_passes() {
    let home = TempDir::new().unwrap();
    let tree = fixture();
    karafo(&home)
        .args(["clean", "-y", "--max-passes", "0"])
        .arg(tree.path())
        .assert()
        .failure();
}

// ─── Config command ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_passes = 3"));
}

#[test]
fn test_config_set_persists() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .args(["config", "set", "max_passes", "7"])
        .assert()
        .success();
    karafo(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_passes = 7"));
}

#[test]
fn test_config_set_unknown_key() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_path_points_into_home() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ─── Completions ─────────────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    karafo(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("karafo"));
}
