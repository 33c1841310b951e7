/// File names that never make a folder "non-empty" when the junk policy is on:
/// Windows thumbnail cache, Windows folder metadata, macOS Finder metadata.
pub const IGNORABLE_FILES: &[&str] = &["Thumbs.db", "desktop.ini", ".DS_Store"];

/// Exact, case-sensitive membership test against [`IGNORABLE_FILES`].
pub fn is_ignorable(file_name: &str) -> bool {
    IGNORABLE_FILES.contains(&file_name)
}
