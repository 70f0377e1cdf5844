//! Status: classify each rule by comparing the device file with the repository.
use std::fmt;
use std::path::PathBuf;

use super::FileSync;
use super::files;
use crate::error::SyncError;
use crate::template::SyncRule;
use crate::vcs::REMOTE_NAME;

/// Synchronization state of one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleState {
    /// Local file matches the repository content.
    InSync,
    /// Local file differs from the repository content.
    ModifiedLocally,
    /// Local file exists but the repository has no template.
    MissingInRepo,
    /// The repository has a template but the local file is absent.
    MissingLocally,
    /// Neither exists.
    MissingBoth,
}

impl RuleState {
    /// Human-readable status label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InSync => "In sync",
            Self::ModifiedLocally => "Modified locally",
            Self::MissingInRepo => "The repo does not have the content",
            Self::MissingLocally => "The file you want to sync does not exist",
            Self::MissingBoth => "Both repo and local do not have this file",
        }
    }
}

impl fmt::Display for RuleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status report entry for one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStatus {
    /// Rule name.
    pub name: String,
    /// Device file path.
    pub source_path: PathBuf,
    /// Template path inside the working copy.
    pub repo_path: PathBuf,
    /// Classification.
    pub state: RuleState,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.name)?;
        writeln!(f, "Source: {}", self.source_path.display())?;
        writeln!(f, "Local sync repo: {}", self.repo_path.display())?;
        writeln!(f, "Status: {}", self.state)?;
        writeln!(f)
    }
}

impl FileSync {
    /// Pull remote changes, then classify each selected rule lazily.
    ///
    /// The pull happens before this returns; each rule is classified as the
    /// iterator is advanced, so a caller can print earlier entries before a
    /// later rule fails. Nothing is written locally, and running it twice
    /// without intervening changes yields the same report.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote pull fails. Each item fails if its
    /// files cannot be read or its template cannot be rendered.
    pub fn status<'a>(
        &'a self,
        filter: Option<&[String]>,
    ) -> Result<impl Iterator<Item = Result<RuleStatus, SyncError>> + use<'a>, SyncError> {
        self.log.stage("Checking status");
        self.vcs
            .pull(&self.layout.repo_root, REMOTE_NAME, &self.branch)?;

        Ok(self
            .select_rules(filter)
            .into_iter()
            .map(move |(name, rule)| self.rule_status(name, rule)))
    }

    fn rule_status(&self, name: &str, rule: &SyncRule) -> Result<RuleStatus, SyncError> {
        let repo_path = self.layout.template_path(rule);
        let template = files::read_text_optional(&repo_path, "read template")?;
        let local = files::read_optional(&rule.source_path, "read source")?;

        let state = match (local, template) {
            (Some(local), Some(template)) => {
                let concrete = self.rules.from_template(&template, name)?;
                if local == concrete.as_bytes() {
                    RuleState::InSync
                } else {
                    RuleState::ModifiedLocally
                }
            }
            (Some(_), None) => RuleState::MissingInRepo,
            (None, Some(_)) => RuleState::MissingLocally,
            (None, None) => RuleState::MissingBoth,
        };
        self.log.debug(&format!("{name}: {state}"));

        Ok(RuleStatus {
            name: name.to_string(),
            source_path: rule.source_path.clone(),
            repo_path,
            state,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sync::test_helpers::{CapturingLog, Fixture, read};
    use crate::vcs::MockVersionControl;

    fn pulling_vcs() -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_pull().returning(|_, _, _| Ok(()));
        vcs
    }

    #[test]
    fn status_classifies_all_four_states() {
        let fx = Fixture::new();
        fx.write_source("same", "host=pc1");
        fx.write_template("same", "host=\u{0}\u{1}<|host|>\u{1}\u{0}");
        fx.write_source("edited", "local");
        fx.write_template("edited", "remote");
        fx.write_source("local_only", "x");
        fx.write_template("repo_only", "y");
        let log = Arc::new(CapturingLog::default());
        let rules = vec![
            ("same".to_string(), fx.rule("same", &["host"])),
            ("edited".to_string(), fx.rule("edited", &[])),
            ("local_only".to_string(), fx.rule("local_only", &[])),
            ("repo_only".to_string(), fx.rule("repo_only", &[])),
            ("nowhere".to_string(), fx.rule("nowhere", &[])),
        ];
        let sync = fx.file_sync(rules, &[("host", "pc1")], pulling_vcs(), &log, false);

        let states: Vec<RuleState> = sync
            .status(None)
            .unwrap()
            .map(|s| s.unwrap().state)
            .collect();

        assert_eq!(
            states,
            vec![
                RuleState::InSync,
                RuleState::ModifiedLocally,
                RuleState::MissingInRepo,
                RuleState::MissingLocally,
                RuleState::MissingBoth,
            ]
        );
    }

    #[test]
    fn status_is_idempotent_and_writes_nothing() {
        let fx = Fixture::new();
        let source = fx.write_source("edited", "local");
        fx.write_template("edited", "remote");
        let log = Arc::new(CapturingLog::default());
        let rules = vec![("edited".to_string(), fx.rule("edited", &[]))];
        let sync = fx.file_sync(rules, &[], pulling_vcs(), &log, false);

        let first: Vec<RuleStatus> = sync.status(None).unwrap().map(Result::unwrap).collect();
        let second: Vec<RuleStatus> = sync.status(None).unwrap().map(Result::unwrap).collect();

        assert_eq!(first, second);
        assert_eq!(read(&source), "local");
        assert!(!fx.layout.backup_root.exists());
    }

    #[test]
    fn rule_status_display_matches_report_format() {
        let status = RuleStatus {
            name: "bashrc".to_string(),
            source_path: PathBuf::from("/home/u/.bashrc"),
            repo_path: PathBuf::from("/home/u/.ncs/sync_repo/bashrc"),
            state: RuleState::ModifiedLocally,
        };
        assert_eq!(
            status.to_string(),
            "=== bashrc ===\nSource: /home/u/.bashrc\nLocal sync repo: /home/u/.ncs/sync_repo/bashrc\nStatus: Modified locally\n\n"
        );
    }

    #[test]
    fn status_yields_earlier_rules_before_a_failing_one() {
        let fx = Fixture::new();
        fx.write_source("first", "ok");
        fx.write_template("first", "ok");
        fx.write_source("broken", "x");
        std::fs::create_dir_all(fx.layout.repo_root.join("broken")).unwrap();
        let log = Arc::new(CapturingLog::default());
        let rules = vec![
            ("first".to_string(), fx.rule("first", &[])),
            ("broken".to_string(), fx.rule("broken", &[])),
        ];
        let sync = fx.file_sync(rules, &[], pulling_vcs(), &log, false);

        let mut statuses = sync.status(None).unwrap();

        assert_eq!(statuses.next().unwrap().unwrap().state, RuleState::InSync);
        assert!(statuses.next().unwrap().is_err());
        assert!(statuses.next().is_none());
    }

    #[test]
    fn status_propagates_pull_failure() {
        let fx = Fixture::new();
        let log = Arc::new(CapturingLog::default());
        let mut vcs = MockVersionControl::new();
        vcs.expect_pull().returning(|_, _, _| {
            Err(crate::error::VcsError::CommandFailed {
                operation: "pull".to_string(),
                message: "offline".to_string(),
            })
        });
        let sync = fx.file_sync(vec![], &[], vcs, &log, false);
        assert!(sync.status(None).is_err());
    }
}
