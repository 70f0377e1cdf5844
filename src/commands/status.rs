//! Command: report the synchronization state of each rule.
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::vcs::VersionControl;

/// Run the status command against the system `git`, printing to stdout.
///
/// # Errors
///
/// Returns an error if configuration loading, repository setup, the remote
/// pull, or writing the report fails.
pub fn run(global: &GlobalOpts, home: &Path, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(home, log)?;
    let stdout = std::io::stdout();
    run_with(setup, super::system_git()?, global, log, &mut stdout.lock())
}

/// Run the status command with an explicit collaborator and output sink.
///
/// # Errors
///
/// Returns an error if repository setup, the remote pull, or writing the
/// report fails.
pub fn run_with(
    setup: CommandSetup,
    vcs: Arc<dyn VersionControl>,
    global: &GlobalOpts,
    log: &Arc<Logger>,
    out: &mut impl Write,
) -> Result<()> {
    let sync = setup.into_file_sync(vcs, log, global.dry_run)?;
    let filter = global.rule_filter();
    for status in sync.status(filter.as_deref())? {
        write!(out, "{}", status?).context("writing status report")?;
    }
    out.flush().context("writing status report")
}
