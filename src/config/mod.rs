//! Configuration loading: `sync_config.yaml` into validated [`SyncRules`].
//!
//! ```yaml
//! device_name: laptop            # optional, default "Unknown Device"
//! remote_url: git@host:me/configs.git
//! branch: main                   # optional, default "main"
//! device_vars:
//!   home: /home/alice
//!   host: laptop
//! sync_rules:
//!   bashrc:
//!     source_path: "{home}/.bashrc"
//!     remote_template_path: bash/.bashrc
//!     content_vars: [home, host]
//! ```
pub mod layout;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::template::{SyncRule, SyncRules};

pub use layout::SyncLayout;

/// Device name used when the config does not set one.
pub const DEFAULT_DEVICE_NAME: &str = "Unknown Device";

/// Branch used when the config does not set one.
pub const DEFAULT_BRANCH: &str = "main";

/// Raw document shape, before validation.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    device_name: Option<String>,
    remote_url: Option<String>,
    branch: Option<String>,
    #[serde(default)]
    device_vars: BTreeMap<String, Value>,
    #[serde(default)]
    sync_rules: Mapping,
}

#[derive(Debug, Deserialize)]
struct RawRule {
    source_path: String,
    remote_template_path: String,
    #[serde(default)]
    content_vars: Vec<String>,
}

/// Fully-validated configuration for one invocation.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Name identifying this device in commit messages.
    pub device_name: String,
    /// URL of the shared remote repository.
    pub remote_url: String,
    /// Branch pulled from and pushed to.
    pub branch: String,
    /// Device variables and named rules.
    pub rules: SyncRules,
}

impl SyncConfig {
    /// Read and validate the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist, and any
    /// error from [`SyncConfig::from_yaml`] if it is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    /// Parse and validate YAML `content`; `path` is only used in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the document is malformed, `remote_url`
    /// is missing, or any rule fails validation.
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let raw: RawConfig = if content.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
        };

        let remote_url = raw
            .remote_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::MissingRemoteUrl)?;

        let device_vars = raw
            .device_vars
            .into_iter()
            .map(|(name, value)| {
                scalar_to_string(&value)
                    .map(|v| (name.clone(), v))
                    .ok_or_else(|| parse_error(format!("device_vars.{name} must be a scalar value")))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        let mut rules = Vec::with_capacity(raw.sync_rules.len());
        for (key, value) in raw.sync_rules {
            let name = match key {
                Value::String(name) => name,
                other => {
                    return Err(parse_error(format!(
                        "sync_rules keys must be strings, found {other:?}"
                    )));
                }
            };
            let raw_rule: RawRule = serde_yaml::from_value(value)
                .map_err(|e| parse_error(format!("sync_rules.{name}: {e}")))?;
            let rule = SyncRule {
                source_path: resolve_source_path(&name, &raw_rule.source_path, &device_vars)?,
                remote_template_path: validate_template_path(
                    &name,
                    &raw_rule.remote_template_path,
                )?,
                content_vars: raw_rule.content_vars,
            };
            rules.push((name, rule));
        }

        Ok(Self {
            device_name: raw
                .device_name
                .unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string()),
            remote_url,
            branch: raw.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            rules: SyncRules::new(rules, device_vars)?,
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Expand `{name}` placeholders in a rule's `source_path` with device values.
///
/// `{{` and `}}` produce literal braces.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPathVar`] for a name missing from
/// `device_vars`, or [`ConfigError::MalformedSourcePath`] for an unbalanced
/// brace.
pub fn resolve_source_path(
    rule: &str,
    raw: &str,
    device_vars: &BTreeMap<String, String>,
) -> Result<PathBuf, ConfigError> {
    let malformed = || ConfigError::MalformedSourcePath {
        rule: rule.to_string(),
        path: raw.to_string(),
    };

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(malformed()),
                        Some(ch) => name.push(ch),
                    }
                }
                let value = device_vars
                    .get(&name)
                    .ok_or_else(|| ConfigError::UnknownPathVar {
                        rule: rule.to_string(),
                        var: name.clone(),
                    })?;
                out.push_str(value);
            }
            '}' => return Err(malformed()),
            other => out.push(other),
        }
    }
    Ok(PathBuf::from(out))
}

/// Ensure a `remote_template_path` stays inside the repository.
fn validate_template_path(rule: &str, raw: &str) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(raw);
    let mut has_normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                has_normal = false;
                break;
            }
        }
    }
    if has_normal && !path.is_absolute() {
        Ok(path)
    } else {
        Err(ConfigError::InvalidTemplatePath {
            rule: rule.to_string(),
            path: raw.to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<SyncConfig, ConfigError> {
        SyncConfig::from_yaml(yaml, Path::new("sync_config.yaml"))
    }

    const FULL: &str = r#"
device_name: laptop
remote_url: git@example.com:me/configs.git
branch: trunk
device_vars:
  home: /home/alice
  host: laptop
  port: 8080
sync_rules:
  zshrc:
    source_path: "{home}/.zshrc"
    remote_template_path: zsh/.zshrc
    content_vars: [home, host]
  kitty:
    source_path: "{home}/.config/kitty/kitty.conf"
    remote_template_path: kitty/kitty.conf
"#;

    #[test]
    fn parses_full_config() {
        let config = parse(FULL).unwrap();
        assert_eq!(config.device_name, "laptop");
        assert_eq!(config.remote_url, "git@example.com:me/configs.git");
        assert_eq!(config.branch, "trunk");
        assert_eq!(config.rules.device_var("port"), Some("8080"));

        let names: Vec<&str> = config.rules.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zshrc", "kitty"]);

        let zshrc = config.rules.rule("zshrc").unwrap();
        assert_eq!(zshrc.source_path, PathBuf::from("/home/alice/.zshrc"));
        assert_eq!(zshrc.remote_template_path, PathBuf::from("zsh/.zshrc"));
        assert_eq!(zshrc.content_vars, vec!["home", "host"]);
        assert!(config.rules.rule("kitty").unwrap().content_vars.is_empty());
    }

    #[test]
    fn defaults_device_name_and_branch() {
        let config = parse("remote_url: https://example.com/r.git\n").unwrap();
        assert_eq!(config.device_name, DEFAULT_DEVICE_NAME);
        assert_eq!(config.branch, DEFAULT_BRANCH);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn missing_remote_url_is_error() {
        let err = parse("device_name: x\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingRemoteUrl), "got {err:?}");
        assert!(matches!(parse("").unwrap_err(), ConfigError::MissingRemoteUrl));
    }

    #[test]
    fn unknown_content_var_is_error() {
        let yaml = r"
remote_url: r
device_vars: {home: /h}
sync_rules:
  a:
    source_path: /x
    remote_template_path: a
    content_vars: [nope]
";
        let err = parse(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownContentVar { ref var, .. } if var == "nope"),
            "got {err:?}"
        );
    }

    #[test]
    fn invalid_yaml_is_parse_error() {
        let err = parse("remote_url: [unterminated\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn rule_missing_required_field_is_parse_error() {
        let yaml = "remote_url: r\nsync_rules:\n  a:\n    source_path: /x\n";
        let err = parse(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Parse { ref message, .. } if message.contains("sync_rules.a")),
            "got {err:?}"
        );
    }

    #[test]
    fn non_scalar_device_var_is_parse_error() {
        let err = parse("remote_url: r\ndevice_vars:\n  list: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync_config.yaml");
        let err = SyncConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref p) if *p == path), "got {err:?}");
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sync_config.yaml");
        std::fs::write(&path, FULL).unwrap();
        assert_eq!(SyncConfig::load(&path).unwrap().rules.len(), 2);
    }

    // ------------------------------------------------------------------
    // resolve_source_path
    // ------------------------------------------------------------------

    fn vars() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("home".to_string(), "/home/alice".to_string()),
            ("app".to_string(), "kitty".to_string()),
        ])
    }

    #[test]
    fn source_path_expands_variables() {
        let p = resolve_source_path("r", "{home}/.config/{app}/{app}.conf", &vars()).unwrap();
        assert_eq!(p, PathBuf::from("/home/alice/.config/kitty/kitty.conf"));
    }

    #[test]
    fn source_path_double_braces_are_literal() {
        let p = resolve_source_path("r", "/x/{{literal}}", &vars()).unwrap();
        assert_eq!(p, PathBuf::from("/x/{literal}"));
    }

    #[test]
    fn source_path_unknown_variable() {
        let err = resolve_source_path("r", "{nope}/x", &vars()).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownPathVar { ref var, .. } if var == "nope"),
            "got {err:?}"
        );
    }

    #[test]
    fn source_path_unbalanced_braces() {
        for raw in ["{home", "home}", "{ho{me}"] {
            let err = resolve_source_path("r", raw, &vars()).unwrap_err();
            assert!(
                matches!(err, ConfigError::MalformedSourcePath { .. }),
                "{raw}: got {err:?}"
            );
        }
    }

    // ------------------------------------------------------------------
    // validate_template_path
    // ------------------------------------------------------------------

    #[test]
    fn template_path_must_be_relative_and_contained() {
        assert!(validate_template_path("r", "a/b.conf").is_ok());
        assert!(validate_template_path("r", "./a.conf").is_ok());
        for bad in ["/etc/passwd", "../escape", "a/../../b", "", "."] {
            assert!(
                matches!(
                    validate_template_path("r", bad),
                    Err(ConfigError::InvalidTemplatePath { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }
}
