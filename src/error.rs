//! Domain-specific error types for the sync engine.
//!
//! Internal modules return typed errors built with [`thiserror`]; command
//! handlers at the CLI boundary convert them to [`anyhow::Error`] via the
//! standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! SyncError
//! ├── Config(ConfigError)     — config file loading and rule validation
//! ├── Template(TemplateError) — placeholder substitution
//! ├── Vcs(VcsError)           — version-control collaborator failures
//! └── Io { action, path, .. } — reading or writing a synced file
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the sync engine.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration-related error (loading, parsing, rule validation).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Placeholder substitution error.
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    /// Version-control operation error.
    #[error("Version control error: {0}")]
    Vcs(#[from] VcsError),

    /// A source, template or backup file could not be read or written.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. `write template`).
        action: &'static str,
        /// File or directory involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl SyncError {
    /// Build an [`SyncError::Io`] for `path`.
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Errors raised while loading the configuration file and building rules.
///
/// All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("IO error reading config file {}: {source}", path.display())]
    Io {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or does not match the schema.
    #[error("Invalid config file {}: {message}", path.display())]
    Parse {
        /// Path to the offending file.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// `remote_url` is absent.
    #[error("Remote URL not specified in config")]
    MissingRemoteUrl,

    /// A rule lists a content variable that has no device value.
    #[error("Invalid content variable '{var}' in rule '{rule}': not defined in device_vars")]
    UnknownContentVar {
        /// Rule declaring the variable.
        rule: String,
        /// Missing variable name.
        var: String,
    },

    /// A rule lists a content variable whose device value is empty.
    #[error("Content variable '{var}' in rule '{rule}' has an empty value")]
    EmptyContentVar {
        /// Rule declaring the variable.
        rule: String,
        /// Variable name with the empty value.
        var: String,
    },

    /// A `{name}` placeholder in `source_path` has no device value.
    #[error("Unknown variable '{{{var}}}' in source_path of rule '{rule}'")]
    UnknownPathVar {
        /// Rule whose source path is affected.
        rule: String,
        /// Unresolved variable name.
        var: String,
    },

    /// `source_path` contains an unbalanced brace.
    #[error("Malformed source_path '{path}' in rule '{rule}': unbalanced brace")]
    MalformedSourcePath {
        /// Rule whose source path is affected.
        rule: String,
        /// The raw path as written in the config.
        path: String,
    },

    /// `remote_template_path` is absolute or escapes the repository.
    #[error("Invalid remote_template_path '{path}' in rule '{rule}': must be relative to the repository")]
    InvalidTemplatePath {
        /// Rule whose template path is affected.
        rule: String,
        /// The raw path as written in the config.
        path: String,
    },
}

/// Errors raised by the template engine.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    /// The rule name is not configured.
    #[error("Invalid rule name: {0}")]
    InvalidRule(String),

    /// The content already contains a placeholder delimiter, so the
    /// conversion could not be reversed reliably.
    #[error("Content for rule '{rule}' already contains a reserved placeholder delimiter")]
    ReservedSequence {
        /// Rule being converted.
        rule: String,
    },
}

/// Errors raised by the version-control collaborator.
#[derive(Error, Debug)]
pub enum VcsError {
    /// A version-control command failed; `message` carries its diagnostic.
    #[error("git {operation} failed: {message}")]
    CommandFailed {
        /// Operation that failed (e.g. `pull`, `commit`).
        operation: String,
        /// Diagnostic text reported by the collaborator.
        message: String,
    },
}
