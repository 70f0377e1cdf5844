//! Template engine: device variables, sync rules and reversible substitution.
//!
//! [`SyncRules`] converts between *concrete* content (device-specific values
//! inline) and *templated* content (values replaced by placeholder tokens)
//! for one named rule at a time.
pub mod placeholder;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ConfigError, TemplateError};
use placeholder::Segment;

/// One named synchronization mapping between a device file and the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRule {
    /// Absolute path to the live, device-specific file.
    pub source_path: PathBuf,
    /// Path of the templated copy, relative to the repository root.
    pub remote_template_path: PathBuf,
    /// Device variables substituted in this file, in substitution order.
    ///
    /// When one value contains another, list the longer value first.
    pub content_vars: Vec<String>,
}

/// Device variables plus the ordered set of named rules.
///
/// Built once per invocation and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SyncRules {
    rules: Vec<(String, SyncRule)>,
    device_vars: BTreeMap<String, String>,
}

impl SyncRules {
    /// Build the rule set, validating every rule's content variables.
    ///
    /// Rules keep the order in which they are given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownContentVar`] if a content variable is
    /// not a device variable, or [`ConfigError::EmptyContentVar`] if its
    /// value is empty.
    pub fn new(
        rules: Vec<(String, SyncRule)>,
        device_vars: BTreeMap<String, String>,
    ) -> Result<Self, ConfigError> {
        for (name, rule) in &rules {
            for var in &rule.content_vars {
                match device_vars.get(var) {
                    None => {
                        return Err(ConfigError::UnknownContentVar {
                            rule: name.clone(),
                            var: var.clone(),
                        });
                    }
                    Some(value) if value.is_empty() => {
                        return Err(ConfigError::EmptyContentVar {
                            rule: name.clone(),
                            var: var.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(Self { rules, device_vars })
    }

    /// Look up a rule by name.
    #[must_use]
    pub fn rule(&self, name: &str) -> Option<&SyncRule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    /// Whether a rule named `name` is configured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rule(name).is_some()
    }

    /// Iterate over `(name, rule)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SyncRule)> {
        self.rules.iter().map(|(n, r)| (n.as_str(), r))
    }

    /// Number of configured rules.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Value of a device variable.
    #[must_use]
    pub fn device_var(&self, name: &str) -> Option<&str> {
        self.device_vars.get(name).map(String::as_str)
    }

    fn require(&self, rule_name: &str) -> Result<&SyncRule, TemplateError> {
        self.rule(rule_name)
            .ok_or_else(|| TemplateError::InvalidRule(rule_name.to_string()))
    }

    /// Replace each content variable's device value with its placeholder.
    ///
    /// Variables are substituted in the rule's declared order, and text that
    /// was already turned into a placeholder is never matched again.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidRule`] for an unknown rule, or
    /// [`TemplateError::ReservedSequence`] if `content` already contains a
    /// placeholder delimiter.
    pub fn to_template(&self, content: &str, rule_name: &str) -> Result<String, TemplateError> {
        let rule = self.require(rule_name)?;
        if placeholder::contains_delimiter(content) {
            return Err(TemplateError::ReservedSequence {
                rule: rule_name.to_string(),
            });
        }

        let mut segments = vec![Segment::Text(content.to_string())];
        for var in &rule.content_vars {
            if let Some(value) = self.device_var(var) {
                segments = placeholder::substitute(segments, var, value);
            }
        }
        Ok(placeholder::render(&segments))
    }

    /// Replace each of the rule's placeholders with its device value.
    ///
    /// Placeholders naming variables that are not content variables of this
    /// rule are left in place verbatim; see
    /// [`unresolved_placeholders`](Self::unresolved_placeholders).
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidRule`] for an unknown rule.
    pub fn from_template(&self, template: &str, rule_name: &str) -> Result<String, TemplateError> {
        let rule = self.require(rule_name)?;
        Ok(placeholder::segments(template)
            .into_iter()
            .map(|segment| match segment {
                Segment::Text(text) => text,
                Segment::Token(name) => {
                    let value = rule
                        .content_vars
                        .contains(&name)
                        .then(|| self.device_var(&name))
                        .flatten();
                    value.map_or_else(
                        || placeholder::Placeholder::new(&name).render(),
                        str::to_string,
                    )
                }
            })
            .collect())
    }

    /// Names of placeholders in `template` that [`from_template`](Self::from_template)
    /// would leave unresolved for this rule, in order of first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidRule`] for an unknown rule.
    pub fn unresolved_placeholders(
        &self,
        template: &str,
        rule_name: &str,
    ) -> Result<Vec<String>, TemplateError> {
        let rule = self.require(rule_name)?;
        let mut names: Vec<String> = Vec::new();
        for segment in placeholder::segments(template) {
            if let Segment::Token(name) = segment
                && !rule.content_vars.contains(&name)
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        Ok(names)
    }
}
