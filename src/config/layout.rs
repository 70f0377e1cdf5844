//! On-disk layout under the sync home directory.
use std::path::PathBuf;

use crate::template::SyncRule;

/// Configuration file name inside the home directory.
pub const CONFIG_FILE_NAME: &str = "sync_config.yaml";
/// Working copy directory name inside the home directory.
pub const REPO_DIR_NAME: &str = "sync_repo";
/// Backup store directory name inside the home directory.
pub const BACKUP_DIR_NAME: &str = "backup";
/// Run log directory name inside the home directory.
pub const LOG_DIR_NAME: &str = "logs";

/// Paths of the persisted state, derived from one home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLayout {
    /// The home directory itself.
    pub home: PathBuf,
    /// `<home>/sync_config.yaml`
    pub config_file: PathBuf,
    /// `<home>/sync_repo/`
    pub repo_root: PathBuf,
    /// `<home>/backup/`
    pub backup_root: PathBuf,
    /// `<home>/logs/`
    pub log_dir: PathBuf,
}

impl SyncLayout {
    /// Derive the layout for `home`.
    #[must_use]
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            config_file: home.join(CONFIG_FILE_NAME),
            repo_root: home.join(REPO_DIR_NAME),
            backup_root: home.join(BACKUP_DIR_NAME),
            log_dir: home.join(LOG_DIR_NAME),
            home,
        }
    }

    /// Location of a rule's template inside the working copy.
    #[must_use]
    pub fn template_path(&self, rule: &SyncRule) -> PathBuf {
        self.repo_root.join(&rule.remote_template_path)
    }

    /// Location of a rule's backup inside the backup store.
    #[must_use]
    pub fn backup_path(&self, rule: &SyncRule) -> PathBuf {
        self.backup_root.join(&rule.remote_template_path)
    }

    /// Persistent log file for `command`.
    #[must_use]
    pub fn log_file(&self, command: &str) -> PathBuf {
        self.log_dir.join(format!("{command}.log"))
    }
}
