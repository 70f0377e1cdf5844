//! Pull: fetch the remote, then restore device files from their templates.
use super::FileSync;
use super::files;
use crate::error::SyncError;
use crate::logging::TaskStatus;
use crate::template::SyncRule;
use crate::vcs::REMOTE_NAME;

impl FileSync {
    /// Pull remote changes and apply them to the selected rules' local files.
    ///
    /// A local file that differs from the incoming content is copied to the
    /// backup store before being overwritten. In a dry run the backup is
    /// still taken but the local file is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the remote pull fails or a file cannot be read or
    /// written.
    pub fn pull(&self, filter: Option<&[String]>) -> Result<(), SyncError> {
        self.log.stage("Pulling remote changes");
        self.vcs
            .pull(&self.layout.repo_root, REMOTE_NAME, &self.branch)?;

        for (name, rule) in self.select_rules(filter) {
            if let Err(e) = self.pull_rule(name, rule) {
                self.log
                    .record_task(name, TaskStatus::Failed, Some(e.to_string().as_str()));
                return Err(e);
            }
        }
        Ok(())
    }

    fn pull_rule(&self, name: &str, rule: &SyncRule) -> Result<(), SyncError> {
        let template_path = self.layout.template_path(rule);
        let Some(template) = files::read_text_optional(&template_path, "read template")? else {
            self.log.warn(&format!(
                "Template for {name} not found in the repository: {}. Skipping.",
                template_path.display()
            ));
            self.log
                .record_task(name, TaskStatus::Skipped, Some("not in repository"));
            return Ok(());
        };

        let unresolved = self.rules.unresolved_placeholders(&template, name)?;
        if !unresolved.is_empty() {
            self.log.warn(&format!(
                "Template for {name} has placeholders that are not content variables of the rule, left as-is: {}",
                unresolved.join(", ")
            ));
        }
        let concrete = self.rules.from_template(&template, name)?;

        let current = files::read_optional(&rule.source_path, "read source")?;
        if current.as_deref() == Some(concrete.as_bytes()) {
            self.log.info(&format!("No changes for {name}"));
            self.log
                .record_task(name, TaskStatus::Ok, Some("no changes"));
            return Ok(());
        }

        if let Some(existing) = current {
            let backup = self.layout.backup_path(rule);
            files::write_file(&backup, existing, "write backup")?;
            self.log
                .info(&format!("Backed up {name} to {}", backup.display()));
        }

        if self.dry_run {
            self.log
                .dry_run(&format!("Would update local file for {name}"));
            self.log.record_task(name, TaskStatus::DryRun, None);
            return Ok(());
        }

        files::write_file(&rule.source_path, &concrete, "write source")?;
        self.log.info(&format!(
            "Updated local file for {name}: {}",
            rule.source_path.display()
        ));
        self.log.record_task(name, TaskStatus::Ok, Some("updated"));
        Ok(())
    }
}
