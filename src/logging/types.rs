//! Core logging types: rule entries, status, and the [`Log`] trait.

/// Per-rule result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Rule name.
    pub name: String,
    /// Final status of the rule.
    pub status: TaskStatus,
    /// Optional detail message (e.g., skip reason).
    pub message: Option<String>,
}

/// Outcome of processing one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Rule processed; changes (if any) applied.
    Ok,
    /// Rule skipped (e.g., source or template missing).
    Skipped,
    /// Rule processed in dry-run mode; no changes applied.
    DryRun,
    /// Rule could not be processed.
    Failed,
}

/// Abstraction over logging backends.
///
/// The reconciler logs through this trait so that tests can capture output
/// without installing a global subscriber.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a rule result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_equality() {
        assert_eq!(TaskStatus::Ok, TaskStatus::Ok);
        assert_ne!(TaskStatus::Ok, TaskStatus::Failed);
        assert_ne!(TaskStatus::Skipped, TaskStatus::DryRun);
    }

    #[test]
    fn task_entry_clone() {
        let entry = TaskEntry {
            name: "bashrc".to_string(),
            status: TaskStatus::Ok,
            message: Some("updated".to_string()),
        };
        assert_eq!(entry.clone(), entry);
    }
}
