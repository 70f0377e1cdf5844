pub mod pull;
pub mod push;
pub mod status;
pub mod version;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow, bail};

use crate::config::{SyncConfig, SyncLayout};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::sync::FileSync;
use crate::vcs::{GitCli, VersionControl};

/// Environment variable overriding the sync home directory.
pub const HOME_ENV: &str = "NAIVE_CONFIG_SYNC_HOME";

/// Directory name of the default sync home, under the user's home.
pub const DEFAULT_HOME_DIR_NAME: &str = ".naive-config-sync";

/// Determine the sync home directory.
///
/// Uses `explicit` when given, otherwise `NAIVE_CONFIG_SYNC_HOME`, otherwise
/// `.naive-config-sync` under the user's home (`HOME`, or `USERPROFILE` on
/// Windows).
///
/// # Errors
///
/// Returns an error if no candidate is available.
pub fn resolve_home(explicit: Option<&Path>) -> Result<PathBuf> {
    let user_home = if cfg!(target_os = "windows") {
        std::env::var_os("USERPROFILE").or_else(|| std::env::var_os("HOME"))
    } else {
        std::env::var_os("HOME")
    };
    resolve_home_from(explicit, std::env::var_os(HOME_ENV), user_home)
}

fn resolve_home_from(
    explicit: Option<&Path>,
    env_home: Option<OsString>,
    user_home: Option<OsString>,
) -> Result<PathBuf> {
    let home = if let Some(path) = explicit {
        path.to_path_buf()
    } else if let Some(path) = env_home.filter(|h| !h.is_empty()) {
        PathBuf::from(path)
    } else {
        let user = user_home.filter(|h| !h.is_empty()).ok_or_else(|| {
            anyhow!("cannot determine sync home: pass --home or set {HOME_ENV} or HOME")
        })?;
        PathBuf::from(user).join(DEFAULT_HOME_DIR_NAME)
    };
    Ok(dunce::canonicalize(&home).unwrap_or(home))
}

/// Layout and configuration loaded for one command invocation.
#[derive(Debug)]
pub struct CommandSetup {
    /// Paths derived from the sync home.
    pub layout: SyncLayout,
    /// Validated configuration.
    pub config: SyncConfig,
}

impl CommandSetup {
    /// Load the configuration file under `home`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is missing or invalid.
    pub fn init(home: &Path, log: &Logger) -> Result<Self> {
        let layout = SyncLayout::new(home);

        log.stage("Loading configuration");
        log.debug(&format!("config file: {}", layout.config_file.display()));
        let config = SyncConfig::load(&layout.config_file)?;

        log.debug(&format!("remote: {} ({})", config.remote_url, config.branch));
        log.info(&format!(
            "device: {}, {} rules",
            config.device_name,
            config.rules.len()
        ));

        Ok(Self { layout, config })
    }

    /// Build the reconciler and make sure the working copy exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backup store or working copy cannot be
    /// prepared.
    pub fn into_file_sync(
        self,
        vcs: Arc<dyn VersionControl>,
        log: &Arc<Logger>,
        dry_run: bool,
    ) -> Result<FileSync> {
        let log: Arc<dyn Log> = Arc::clone(log) as Arc<dyn Log>;
        let sync = FileSync::new(self.config, self.layout, vcs, log, dry_run);
        sync.ensure_repo()?;
        Ok(sync)
    }
}

/// The production git collaborator.
///
/// # Errors
///
/// Returns an error if `git` is not on `PATH`.
pub fn system_git() -> Result<Arc<dyn VersionControl>> {
    let git = GitCli::new(Arc::new(SystemExecutor));
    if !git.is_available() {
        bail!("git is not installed or not on PATH");
    }
    Ok(Arc::new(git))
}
