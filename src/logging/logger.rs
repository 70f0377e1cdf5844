//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{Log, TaskEntry, TaskStatus};

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger backed by the global [`tracing`] subscriber.
///
/// Console and file output are configured by
/// [`init_subscriber`](super::subscriber::init_subscriber); this type emits
/// events and keeps the per-rule results for [`print_summary`](Self::print_summary).
#[derive(Debug, Default)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// `log_file` is only displayed in the summary; the file itself is
    /// written by the subscriber's file layer.
    #[must_use]
    pub fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a rule result for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.tasks.lock() {
            guard.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Log the summary of all recorded rules.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for task in &tasks {
            let (icon, color) = match task.status {
                TaskStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                TaskStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                TaskStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                TaskStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = task
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", task.name));
        }

        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} rules: \x1b[32m{ok} ok\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn logger_new() {
        let (log, _tmp, _guard) = isolated_logger();
        assert!(log.task_entries().is_empty(), "expected empty task list");
    }

    #[test]
    fn record_task_with_message() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("bashrc", TaskStatus::Skipped, Some("source missing"));
        let tasks = log.task_entries();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].name, "bashrc");
        assert_eq!(tasks[0].message, Some("source missing".to_string()));
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.record_task("via-trait", TaskStatus::Ok, None);
        assert_eq!(log.task_entries().len(), 1);
    }

    #[test]
    fn messages_reach_log_file() {
        let (log, _tmp, _guard) = isolated_logger();
        let marker = format!("marker-{}", std::process::id());
        log.debug(&format!("debug-{marker}"));
        log.warn(&format!("warn-{marker}"));
        log.dry_run(&format!("dry-{marker}"));
        let path = log.log_file.clone().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains(&format!("[debug] debug-{marker}")));
        assert!(contents.contains(&format!("[warn] warn-{marker}")));
        assert!(contents.contains(&format!("[dry run] dry-{marker}")));
    }

    #[test]
    fn summary_lists_each_rule_and_totals() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("bashrc", TaskStatus::Ok, Some("updated"));
        log.record_task("vimrc", TaskStatus::Skipped, Some("not in repo"));
        log.print_summary();
        let path = log.log_file.clone().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("==> Summary"));
        assert!(contents.contains("✓ bashrc (updated)"));
        assert!(contents.contains("○ vimrc (not in repo)"));
        assert!(contents.contains("2 rules: 1 ok, 1 skipped, 0 dry-run, 0 failed"));
    }

    #[test]
    fn summary_is_silent_without_entries() {
        let (log, _tmp, _guard) = isolated_logger();
        log.print_summary();
        let path = log.log_file.clone().expect("log path");
        let contents = fs::read_to_string(path).unwrap();
        assert!(!contents.contains("Summary"));
    }
}
