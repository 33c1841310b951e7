use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global karafo configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Treat known junk files (Thumbs.db, desktop.ini, .DS_Store) as absent
    #[serde(default = "default_true")]
    pub ignore_garbage: bool,

    /// Delete known junk files before checking a folder
    #[serde(default = "default_true")]
    pub remove_garbage_files: bool,

    /// Upper bound on deletion passes per run
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,

    /// Reuse emptiness results for folders whose mtime is unchanged
    #[serde(default = "default_true")]
    pub fast_rescan: bool,

    /// Folders whose path contains any of these are never offered for deletion
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Where error records are written (defaults to ~/.karafo/logs)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Output format preference
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Quiet,
}

fn default_true() -> bool {
    true
}
fn default_max_passes() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_garbage: true,
            remove_garbage_files: true,
            max_passes: default_max_passes(),
            fast_rescan: true,
            exclude_paths: Vec::new(),
            log_dir: None,
            output_format: OutputFormat::Human,
        }
    }
}

/// Keys accepted by `karafo config set`
pub const CONFIG_KEYS: &[&str] = &[
    "ignore_garbage",
    "remove_garbage_files",
    "max_passes",
    "fast_rescan",
    "exclude_paths",
    "log_dir",
    "output_format",
];

impl Config {
    /// Get the karafo data directory (~/.karafo, or $KARAFO_HOME)
    pub fn data_dir() -> PathBuf {
        if let Some(home) = std::env::var_os("KARAFO_HOME") {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| std::env::temp_dir())
            .join(".karafo")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Directory error records go to
    pub fn logs_dir(&self) -> PathBuf {
        self.log_dir
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("logs"))
    }

    /// Load config from file, or fall back to defaults if missing
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config dir: {}", dir.display()))?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Update a single key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "ignore_garbage" => self.ignore_garbage = parse_bool(key, value)?,
            "remove_garbage_files" => self.remove_garbage_files = parse_bool(key, value)?,
            "fast_rescan" => self.fast_rescan = parse_bool(key, value)?,
            "max_passes" => {
                let passes: usize = value
                    .parse()
                    .with_context(|| format!("Invalid value for max_passes: '{}'", value))?;
                if passes == 0 {
                    anyhow::bail!("max_passes must be at least 1");
                }
                self.max_passes = passes;
            }
            "exclude_paths" => {
                self.exclude_paths = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
            }
            "log_dir" => {
                self.log_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                }
            }
            "output_format" => {
                self.output_format = match value {
                    "human" => OutputFormat::Human,
                    "json" => OutputFormat::Json,
                    "quiet" => OutputFormat::Quiet,
                    other => anyhow::bail!("Unknown output format '{}'", other),
                }
            }
            other => anyhow::bail!(
                "Unknown config key '{}'. Valid keys: {}",
                other,
                CONFIG_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Check if a path should be excluded
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.display().to_string();
        self.exclude_paths.iter().any(|p| path_str.contains(p.as_str()))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => anyhow::bail!("Invalid value for {}: '{}' (expected true/false)", key, value),
    }
}
