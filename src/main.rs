use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use naive_config_sync::cli::{Cli, Command};
use naive_config_sync::commands;
use naive_config_sync::config::SyncLayout;
use naive_config_sync::logging::{self, Logger};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let home = commands::resolve_home(args.global.home.as_deref());
    let log_file = match (&home, args.command.log_name()) {
        (Ok(home), Some(name)) => Some(SyncLayout::new(home.clone()).log_file(name)),
        _ => None,
    };
    logging::init_subscriber(args.verbose, log_file.as_deref());
    let log = Arc::new(Logger::new(log_file));

    match dispatch(&args, home, &log) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("Error: {e:#}"));
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command. `version` works without a resolvable home.
fn dispatch(args: &Cli, home: Result<PathBuf>, log: &Arc<Logger>) -> Result<()> {
    match args.command {
        Command::Version => commands::version::run(&mut std::io::stdout().lock()),
        Command::Push => commands::push::run(&args.global, &home?, log),
        Command::Pull => commands::pull::run(&args.global, &home?, log),
        Command::Status => commands::status::run(&args.global, &home?, log),
    }
}
