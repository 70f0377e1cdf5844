//! Command: print version information.
use std::io::Write;

use anyhow::Result;

/// Version string embedded at build time, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("NAIVE_CONFIG_SYNC_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to `out`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn run(out: &mut impl Write) -> Result<()> {
    writeln!(out, "naive-config-sync {}", version())?;
    Ok(())
}
