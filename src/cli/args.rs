use clap::{Parser, Subcommand, ValueEnum};

/// karafo: find and remove empty folders
#[derive(Parser, Debug)]
#[command(
    name = "karafo",
    version,
    about = "Find and remove empty folders",
    long_about = "karafo finds folders that are empty, or contain only junk files such as\n\
                   Thumbs.db, desktop.ini and .DS_Store, and removes them after confirmation.\n\
                   Parents left empty by a removal are removed too.",
    after_help = "EXAMPLES:\n  \
        karafo scan ~/Downloads                 List empty folders\n  \
        karafo scan . --strict                  Junk files count as content\n  \
        karafo clean ~/Pictures                 Remove empty folders (asks first)\n  \
        karafo clean . -y --max-passes 10       Remove deep empty chains, no prompt\n  \
        karafo clean . --dry-run                Show what would be removed\n  \
        karafo clean . -i --exclude .git        Pick folders one by one, never .git\n  \
        karafo config set max_passes 5          Change a default"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (defaults to the configured one)
    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List empty folders under the given paths
    Scan {
        /// Folders to scan
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,

        /// Skip the fast-rescan cache
        #[arg(long)]
        no_cache: bool,

        /// Count junk files (Thumbs.db, desktop.ini, .DS_Store) as content
        #[arg(long)]
        strict: bool,

        /// Hide folders whose path contains PATTERN (repeatable)
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,
    },

    /// Remove empty folders under the given paths
    Clean {
        /// Folders to clean
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<String>,

        /// Skip confirmation prompt
        #[arg(long, short = 'y', conflicts_with = "interactive")]
        yes: bool,

        /// Confirm each folder separately
        #[arg(long, short = 'i')]
        interactive: bool,

        /// Never delete folders whose path contains PATTERN (repeatable)
        #[arg(long, value_name = "PATTERN")]
        exclude: Vec<String>,

        /// Show what would be removed without removing anything
        #[arg(long)]
        dry_run: bool,

        /// Leave junk files in place instead of deleting them first
        #[arg(long)]
        keep_garbage: bool,

        /// Maximum deletion passes (defaults to the configured value)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        max_passes: Option<u64>,

        /// Skip the fast-rescan cache
        #[arg(long)]
        no_cache: bool,

        /// Count junk files as content when judging emptiness
        #[arg(long)]
        strict: bool,
    },

    /// Show or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file location
    Path,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
    /// Reset configuration to defaults
    Reset,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
