use std::path::Path;

/// Folders that must NEVER be deleted, however empty they are.
/// Upward cascading can reach these when a whole tree empties out.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/System",
    "/Applications",
    "/Users",
    "/Library",
    "/Volumes",
    "/home",
    "/root",
    "/usr",
    "/bin",
    "/sbin",
    "/var",
    "/etc",
    "/opt",
    "/private",
    "/tmp",
    "/mnt",
    "/media",
];

/// Folders under home that must never be deleted
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Movies",
    "Videos",
    "Public",
    "Templates",
    "Library",
    "Applications",
    ".ssh",
    ".gnupg",
    ".config",
];

/// Check if a path is protected and should NEVER be deleted
pub fn is_protected(path: &Path) -> bool {
    let lossy = path.to_string_lossy();
    let trimmed = trim_trailing_separators(&lossy);

    if PROTECTED_PATHS.iter().any(|p| trimmed == *p) {
        return true;
    }

    // Drive roots such as `C:\`
    if path.parent().is_none() && path.has_root() {
        return true;
    }

    if let Some(home) = dirs::home_dir() {
        for dir in PROTECTED_HOME_DIRS {
            let protected = if dir.is_empty() {
                home.clone()
            } else {
                home.join(dir)
            };
            if trimmed == trim_trailing_separators(&protected.to_string_lossy()) {
                return true;
            }
        }
    }

    false
}

fn trim_trailing_separators(s: &str) -> &str {
    let trimmed = s.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() && !s.is_empty() {
        &s[..1]
    } else {
        trimmed
    }
}
