//! # Deployment Configuration
//!
//! This module defines the `.sharables-deploy.yaml` file that lives at the
//! root of the sharables repository, and the logic for reading and
//! generating it.
//!
//! ## Format
//!
//! ```yaml
//! deployments:
//!   - section: cursor-rules
//!     target: .cursor/rules
//!     method: link
//!   - section: global-utilities
//!     target: ~/.local/share/sharables
//!     method: copy
//! ```
//!
//! `method` is optional and defaults to `link`; `symlink` is accepted as an
//! alias. The order of `deployments` is the order they are processed in.

use crate::error::{Error, Result};
use crate::link::LinkMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the deployment configuration inside the repository root.
pub const CONFIG_FILENAME: &str = ".sharables-deploy.yaml";

/// The example configuration written by `sharables config`.
pub const EXAMPLE_CONFIG: &str = r#"# Sharables Deployment Configuration
# Maps sections of this repository to target paths.
#
# target:  ~/...      relative to your home directory
#          relative   relative to the project root (parent of the sharables dir)
#          absolute   used as-is
# method:  link (default) or copy

deployments:
  # Deploy cursor-rules to .cursor/rules (relative to project root)
  - section: cursor-rules
    target: .cursor/rules
    method: link

  # Deploy global-utilities to the home directory
  - section: global-utilities
    target: ~/.local/share/sharables
    method: link

  # Example: Windows path, copied instead of linked
  # - section: shared-configs
  #   target: C:/Users/YourName/.config/sharables
  #   method: copy
"#;

/// One section-to-target mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// Name of a file or directory at the repository root.
    pub section: String,
    /// Target path, possibly `~/`-relative or project-relative.
    pub target: String,
    /// How to deploy the section.
    #[serde(default)]
    pub method: LinkMethod,
    /// Why this record could not be read, if it is malformed.
    ///
    /// Malformed records keep their place in the list so that they are
    /// reported, and counted, alongside the others.
    #[serde(skip)]
    pub problem: Option<RecordProblem>,
}

/// A deployment record that could not be turned into a usable mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordProblem {
    pub message: String,
    pub hint: Option<String>,
}

impl RecordProblem {
    /// The problem as a [`Error::ConfigParse`].
    pub fn to_error(&self) -> Error {
        Error::ConfigParse {
            message: self.message.clone(),
            hint: self.hint.clone(),
        }
    }
}

impl Mapping {
    pub fn new(section: &str, target: &str, method: LinkMethod) -> Self {
        Self {
            section: section.to_string(),
            target: target.to_string(),
            method,
            problem: None,
        }
    }

    /// Read the record at `index` of `deployments`.
    ///
    /// Never fails: a malformed record becomes a mapping carrying a
    /// [`RecordProblem`], labelled with whatever `section` and `target` it
    /// has.
    fn from_record(index: usize, record: serde_yaml::Value) -> Self {
        match serde_yaml::from_value::<Mapping>(record.clone()) {
            Ok(mapping) => mapping,
            Err(e) => {
                let field = |name: &str| {
                    record
                        .get(name)
                        .and_then(serde_yaml::Value::as_str)
                        .map(str::to_string)
                };
                let message = e.to_string();
                Self {
                    section: field("section").unwrap_or_else(|| format!("deployments[{}]", index)),
                    target: field("target").unwrap_or_default(),
                    method: LinkMethod::default(),
                    problem: Some(RecordProblem {
                        hint: hint_for(&message),
                        message: format!("deployments[{}]: {}", index, message),
                    }),
                }
            }
        }
    }
}

/// The parsed deployment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Mappings in processing order, malformed records included.
    #[serde(default, deserialize_with = "lenient_records")]
    pub deployments: Vec<Mapping>,
}

fn lenient_records<'de, D>(deserializer: D) -> std::result::Result<Vec<Mapping>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let records = Option::<Vec<serde_yaml::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| Mapping::from_record(index, record))
        .collect())
}

fn hint_for(message: &str) -> Option<String> {
    if message.contains("unknown variant") {
        Some("method must be `link` (or `symlink`) or `copy`".to_string())
    } else if message.contains("missing field") {
        Some("every deployment needs both `section` and `target`".to_string())
    } else {
        None
    }
}

/// Whether [`write_example`] created a new file or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Overwritten,
}

/// Path of the deployment configuration for a repository.
pub fn config_path(repo_root: &Path) -> PathBuf {
    repo_root.join(CONFIG_FILENAME)
}

/// Parse a YAML string into a [`DeployConfig`].
///
/// A document containing only comments or whitespace is an empty
/// configuration. Only a document that is not YAML, or whose `deployments`
/// is not a list, is an error; problems inside one record are attached to
/// that record's [`Mapping::problem`].
pub fn parse(yaml_content: &str) -> Result<DeployConfig> {
    let has_content = yaml_content
        .lines()
        .map(str::trim)
        .any(|line| !line.is_empty() && !line.starts_with('#') && line != "---");
    if !has_content {
        return Ok(DeployConfig::default());
    }

    serde_yaml::from_str::<DeployConfig>(yaml_content).map_err(|e| {
        let message = e.to_string();
        Error::ConfigParse {
            hint: hint_for(&message),
            message,
        }
    })
}

/// Parse a [`DeployConfig`] from a YAML file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DeployConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigMissing {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Load the mappings for a repository, rejecting a missing or empty config.
pub fn load(repo_root: &Path) -> Result<Vec<Mapping>> {
    let path = config_path(repo_root);
    let config = from_file(&path)?;
    if config.deployments.is_empty() {
        return Err(Error::ConfigEmpty { path });
    }
    Ok(config.deployments)
}

/// Write [`EXAMPLE_CONFIG`] into the repository root.
///
/// An existing file is only replaced when `force` is set.
pub fn write_example(repo_root: &Path, force: bool) -> Result<WriteOutcome> {
    let path = config_path(repo_root);
    let outcome = if path.exists() {
        if !force {
            return Err(Error::ConfigExists { path });
        }
        WriteOutcome::Overwritten
    } else {
        WriteOutcome::Created
    };

    fs::write(&path, EXAMPLE_CONFIG).map_err(|e| Error::io_at(&path, e))?;
    Ok(outcome)
}
