use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "naive-config-sync",
    about = "Synchronize device-specific config files through a shared git repository",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Sync home directory (default: $NAIVE_CONFIG_SYNC_HOME or ~/.naive-config-sync)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Preview changes without committing, pushing or overwriting local files
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Only process these rules (comma separated)
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub rules: Vec<String>,
}

impl GlobalOpts {
    /// The rule filter, or `None` to process every rule.
    ///
    /// Names are trimmed and blank entries dropped, so `--rules "a, b"`
    /// selects `a` and `b` and `--rules ""` selects every rule.
    #[must_use]
    pub fn rule_filter(&self) -> Option<Vec<String>> {
        let names: Vec<String> = self
            .rules
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        (!names.is_empty()).then_some(names)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Template local files into the repository, commit and push
    Push,
    /// Pull the repository and restore local files from templates
    Pull,
    /// Pull the repository and report each rule's state
    Status,
    /// Print version information
    Version,
}

impl Command {
    /// Name of the persistent log file for this command, if it keeps one.
    #[must_use]
    pub const fn log_name(self) -> Option<&'static str> {
        match self {
            Self::Push => Some("push"),
            Self::Pull => Some("pull"),
            Self::Status => Some("status"),
            Self::Version => None,
        }
    }
}
