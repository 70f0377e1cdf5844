//! Device-aware configuration file synchronization.
//!
//! Keeps configuration files on several machines in step through one shared
//! git repository. Device-specific values (host names, user names, paths)
//! are replaced by placeholder tokens on the way into the repository and
//! restored from the local device's variables on the way out.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: parse and validate `sync_config.yaml`, derive the on-disk layout
//! - **[`template`]**: reversible placeholder substitution per rule
//! - **[`sync`]**: the push / pull / status reconciler
//! - **[`vcs`]**: the version-control collaborator and its `git` implementation
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod sync;
pub mod template;
pub mod vcs;
