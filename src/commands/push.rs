//! Command: push local changes to the remote repository.
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use super::CommandSetup;
use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::vcs::VersionControl;

/// Run the push command against the system `git`.
///
/// # Errors
///
/// Returns an error if configuration loading, repository setup, or the
/// push itself fails.
pub fn run(global: &GlobalOpts, home: &Path, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(home, log)?;
    run_with(setup, super::system_git()?, global, log)
}

/// Run the push command with an explicit version-control collaborator.
///
/// # Errors
///
/// Returns an error if repository setup or the push fails.
pub fn run_with(
    setup: CommandSetup,
    vcs: Arc<dyn VersionControl>,
    global: &GlobalOpts,
    log: &Arc<Logger>,
) -> Result<()> {
    let sync = setup.into_file_sync(vcs, log, global.dry_run)?;
    let result = sync.push(global.rule_filter().as_deref());
    log.print_summary();
    Ok(result?)
}
