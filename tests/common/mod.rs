// Shared helpers for integration tests.
//
// Provides a temporary sync home with a separate device directory, a
// config writer, and a recording version-control collaborator so each
// integration test can drive a command end to end without a real remote.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use naive_config_sync::commands::CommandSetup;
use naive_config_sync::config::SyncLayout;
use naive_config_sync::error::VcsError;
use naive_config_sync::logging::Logger;
use naive_config_sync::vcs::{FileChange, VersionControl};

/// A [`VersionControl`] that records every call and never touches a remote.
///
/// `init` creates a `.git` directory so that a second command run reuses the
/// working copy. Operations named in `fail` return an error.
#[derive(Debug, Default)]
pub struct RecordingVcs {
    calls: Mutex<Vec<String>>,
    fail: Vec<&'static str>,
    changes: Vec<FileChange>,
}

impl RecordingVcs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `operation` fail.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.fail.push(operation);
        self
    }

    /// Changes reported by `status_short`.
    pub fn with_changes(mut self, changes: Vec<FileChange>) -> Self {
        self.changes = changes;
        self
    }

    /// Recorded calls, e.g. `"commit Sync configs from laptop"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Whether any call starting with `prefix` was made.
    pub fn called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, operation: &'static str, detail: &str) -> Result<(), VcsError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("{operation} {detail}").trim_end().to_string());
        if self.fail.contains(&operation) {
            return Err(VcsError::CommandFailed {
                operation: operation.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        Ok(())
    }
}

impl VersionControl for RecordingVcs {
    fn init(&self, dir: &Path, branch: &str) -> Result<(), VcsError> {
        self.record("init", branch)?;
        std::fs::create_dir_all(dir.join(".git")).expect("create .git");
        Ok(())
    }

    fn add_remote(&self, _dir: &Path, name: &str, url: &str) -> Result<(), VcsError> {
        self.record("remote", &format!("{name} {url}"))
    }

    fn pull(&self, _dir: &Path, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record("pull", &format!("{remote} {branch}"))
    }

    fn status_short(&self, _dir: &Path) -> Result<Vec<FileChange>, VcsError> {
        self.record("status", "")?;
        Ok(self.changes.clone())
    }

    fn add_all(&self, _dir: &Path) -> Result<(), VcsError> {
        self.record("add", "")
    }

    fn commit(&self, _dir: &Path, message: &str) -> Result<(), VcsError> {
        self.record("commit", message)
    }

    fn push(&self, _dir: &Path, remote: &str, branch: &str) -> Result<(), VcsError> {
        self.record("push", &format!("{remote} {branch}"))
    }
}

/// An isolated sync home plus a device directory, backed by a
/// [`tempfile::TempDir`].
///
/// Layout:
/// - `<tmp>/home/`    the sync home (config, working copy, backups)
/// - `<tmp>/device/`  where rule source files live
pub struct SyncHome {
    pub tmp: tempfile::TempDir,
}

impl SyncHome {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(tmp.path().join("home")).expect("create home");
        std::fs::create_dir_all(tmp.path().join("device")).expect("create device dir");
        Self { tmp }
    }

    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    pub fn device(&self) -> PathBuf {
        self.tmp.path().join("device")
    }

    pub fn layout(&self) -> SyncLayout {
        SyncLayout::new(self.home())
    }

    /// Write `sync_config.yaml`. `{dev}` in `rules` is available as a device
    /// variable pointing at the device directory.
    pub fn write_config(&self, device_name: &str, vars: &[(&str, &str)], rules: &str) {
        let mut yaml = format!(
            "device_name: {device_name}\nremote_url: git@example.com:me/configs.git\ndevice_vars:\n  dev: '{}'\n",
            self.device().display()
        );
        for (name, value) in vars {
            yaml.push_str(&format!("  {name}: '{value}'\n"));
        }
        if rules.is_empty() {
            yaml.push_str("sync_rules: {}\n");
        } else {
            yaml.push_str("sync_rules:\n");
            yaml.push_str(rules);
        }
        std::fs::write(self.layout().config_file, yaml).expect("write config");
    }

    /// A rule block for `write_config` syncing `{dev}/<file>` to `<file>`.
    pub fn rule(name: &str, file: &str, content_vars: &[&str]) -> String {
        format!(
            "  {name}:\n    source_path: '{{dev}}/{file}'\n    remote_template_path: '{file}'\n    content_vars: [{}]\n",
            content_vars.join(", ")
        )
    }

    pub fn write_source(&self, file: &str, content: &str) -> PathBuf {
        let path = self.device().join(file);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, content).expect("write source");
        path
    }

    pub fn read_source(&self, file: &str) -> Option<String> {
        std::fs::read_to_string(self.device().join(file)).ok()
    }

    pub fn write_template(&self, file: &str, content: &str) -> PathBuf {
        let path = self.layout().repo_root.join(file);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        std::fs::write(&path, content).expect("write template");
        path
    }

    pub fn read_template(&self, file: &str) -> Option<String> {
        std::fs::read_to_string(self.layout().repo_root.join(file)).ok()
    }

    pub fn read_backup(&self, file: &str) -> Option<String> {
        std::fs::read_to_string(self.layout().backup_root.join(file)).ok()
    }

    /// Load the configuration through the command setup path.
    pub fn setup(&self, log: &Logger) -> CommandSetup {
        CommandSetup::init(&self.home(), log).expect("load config")
    }
}

/// A logger without a log file, recording rule results only.
pub fn logger() -> Arc<Logger> {
    Arc::new(Logger::new(None))
}

/// Placeholder token for `name` as stored in repository templates.
pub fn token(name: &str) -> String {
    format!("\u{0}\u{1}<|{name}|>\u{1}\u{0}")
}
