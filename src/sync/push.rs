//! Push: template local files into the working copy, then commit and push.
use super::FileSync;
use super::files;
use crate::error::SyncError;
use crate::logging::TaskStatus;
use crate::template::SyncRule;
use crate::vcs::REMOTE_NAME;

impl FileSync {
    /// Push local changes for the selected rules to the remote repository.
    ///
    /// Each rule whose source file exists is converted to its template form
    /// and written into the working copy. Missing sources are skipped. The
    /// working copy is then committed and pushed, unless this is a dry run.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or written, a source
    /// contains a reserved placeholder delimiter, or staging, committing or
    /// pushing fails.
    pub fn push(&self, filter: Option<&[String]>) -> Result<(), SyncError> {
        self.log.stage("Pushing local changes");
        for (name, rule) in self.select_rules(filter) {
            if let Err(e) = self.push_rule(name, rule) {
                self.log
                    .record_task(name, TaskStatus::Failed, Some(e.to_string().as_str()));
                return Err(e);
            }
        }

        self.report_changes();
        self.commit_and_push()
    }

    fn push_rule(&self, name: &str, rule: &SyncRule) -> Result<(), SyncError> {
        let Some(content) = files::read_text_optional(&rule.source_path, "read source")? else {
            self.log.debug(&format!(
                "source for {name} does not exist: {}",
                rule.source_path.display()
            ));
            self.log
                .record_task(name, TaskStatus::Skipped, Some("source missing"));
            return Ok(());
        };

        let template = self.rules.to_template(&content, name)?;
        let target = self.layout.template_path(rule);
        let unchanged = files::read_optional(&target, "read template")?
            .is_some_and(|existing| existing == template.as_bytes());

        if unchanged {
            self.log.debug(&format!("template for {name} is up to date"));
            self.log
                .record_task(name, TaskStatus::Ok, Some("unchanged"));
            return Ok(());
        }

        files::write_file(&target, &template, "write template")?;
        self.log.info(&format!(
            "Updated template for {name}: {}",
            target.display()
        ));
        self.log.record_task(name, TaskStatus::Ok, Some("updated"));
        Ok(())
    }

    /// Log the pending changes in the working copy.
    ///
    /// A failing status query is reported and otherwise ignored.
    fn report_changes(&self) {
        let changes = match self.vcs.status_short(&self.layout.repo_root) {
            Ok(changes) => changes,
            Err(e) => {
                self.log
                    .error(&format!("Failed to list changed files: {e}"));
                return;
            }
        };

        let changed: Vec<_> = changes
            .iter()
            .filter(|c| c.kind.is_content_change())
            .collect();
        if changed.is_empty() {
            self.log.info("No changed or untracked files detected.");
            return;
        }
        self.log.info("Changed/untracked files:");
        for change in changed {
            self.log.info(&format!("  {} {}", change.code, change.path));
        }
    }

    fn commit_and_push(&self) -> Result<(), SyncError> {
        let repo = &self.layout.repo_root;
        let message = format!("Sync configs from {}", self.device_name);

        if self.dry_run {
            self.log.dry_run("Would stage all changes");
            self.log.dry_run(&format!("Would commit: {message}"));
            self.log.dry_run(&format!(
                "Would push to {REMOTE_NAME}/{}",
                self.branch
            ));
            return Ok(());
        }

        self.log.stage("Committing");
        self.vcs.add_all(repo)?;
        self.vcs.commit(repo, &message)?;
        self.log
            .info(&format!("pushing to {REMOTE_NAME}/{}", self.branch));
        self.vcs.push(repo, REMOTE_NAME, &self.branch)?;
        self.log.info("Changes pushed successfully");
        Ok(())
    }
}
