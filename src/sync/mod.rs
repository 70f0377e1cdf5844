//! Reconciler: per-rule push, pull and status against the working copy.
//!
//! [`FileSync`] owns the rule set and the on-disk layout, reads and writes
//! the device files, and delegates every repository mutation to a
//! [`VersionControl`] collaborator.
mod files;
mod pull;
mod push;
mod status;

use std::fs;
use std::sync::Arc;

pub use status::{RuleState, RuleStatus};

use crate::config::{SyncConfig, SyncLayout};
use crate::error::SyncError;
use crate::logging::Log;
use crate::template::{SyncRule, SyncRules};
use crate::vcs::{REMOTE_NAME, VersionControl};

/// Synchronizes the configured rules between the device and the repository.
pub struct FileSync {
    rules: SyncRules,
    layout: SyncLayout,
    vcs: Arc<dyn VersionControl>,
    log: Arc<dyn Log>,
    device_name: String,
    remote_url: String,
    branch: String,
    dry_run: bool,
}

impl std::fmt::Debug for FileSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSync")
            .field("rules", &self.rules)
            .field("layout", &self.layout)
            .field("vcs", &"<dyn VersionControl>")
            .field("log", &"<dyn Log>")
            .field("device_name", &self.device_name)
            .field("remote_url", &self.remote_url)
            .field("branch", &self.branch)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl FileSync {
    /// Create a reconciler for `config` rooted at `layout`.
    ///
    /// Nothing is touched on disk until [`ensure_repo`](Self::ensure_repo)
    /// or one of the operations is called.
    #[must_use]
    pub fn new(
        config: SyncConfig,
        layout: SyncLayout,
        vcs: Arc<dyn VersionControl>,
        log: Arc<dyn Log>,
        dry_run: bool,
    ) -> Self {
        Self {
            rules: config.rules,
            layout,
            vcs,
            log,
            device_name: config.device_name,
            remote_url: config.remote_url,
            branch: config.branch,
            dry_run,
        }
    }

    /// The rule set being synchronized.
    #[must_use]
    pub const fn rules(&self) -> &SyncRules {
        &self.rules
    }

    /// The on-disk layout.
    #[must_use]
    pub const fn layout(&self) -> &SyncLayout {
        &self.layout
    }

    /// Whether repository commits and local overwrites are suppressed.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Create the backup store and, on first use, the working copy.
    ///
    /// A new working copy is initialised on the configured branch with the
    /// configured URL registered as `origin`. An existing one is reused.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created or the repository
    /// cannot be initialised.
    pub fn ensure_repo(&self) -> Result<(), SyncError> {
        let backup = &self.layout.backup_root;
        fs::create_dir_all(backup).map_err(|e| SyncError::io("create directory", backup, e))?;

        let repo = &self.layout.repo_root;
        if repo.join(".git").exists() {
            self.log
                .debug(&format!("using sync repository at {}", repo.display()));
            return Ok(());
        }

        fs::create_dir_all(repo).map_err(|e| SyncError::io("create directory", repo, e))?;
        self.log
            .info(&format!("initializing sync repository at {}", repo.display()));
        self.vcs.init(repo, &self.branch)?;
        self.vcs.add_remote(repo, REMOTE_NAME, &self.remote_url)?;
        Ok(())
    }

    /// Resolve an optional rule-name filter into the rules to process.
    ///
    /// `None` selects every rule in declaration order. Otherwise names are
    /// processed in the order given, unknown names are reported and dropped,
    /// and repeated names are processed once.
    pub(crate) fn select_rules(&self, filter: Option<&[String]>) -> Vec<(&str, &SyncRule)> {
        let Some(names) = filter else {
            return self.rules.iter().collect();
        };

        let mut selected: Vec<(&str, &SyncRule)> = Vec::with_capacity(names.len());
        for name in names {
            match self.rules.iter().find(|(n, _)| *n == name.as_str()) {
                Some(entry) => {
                    if !selected.iter().any(|(n, _)| *n == entry.0) {
                        selected.push(entry);
                    }
                }
                None => self
                    .log
                    .warn(&format!("Invalid rule name: {name}. Skipping.")),
            }
        }
        selected
    }
}
