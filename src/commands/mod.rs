//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `sharables` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the process-wide
//!   [`OutputConfig`](sharables::output::OutputConfig) and performs the
//!   command's logic by calling into the `sharables` library.
//!
//! Options shared by several commands live here.

pub mod commit;
pub mod completions;
pub mod config;
pub mod deploy;
pub mod push;
pub mod status;
pub mod sync;
pub mod undeploy;

use anyhow::{anyhow, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use sharables::error::Error;
use sharables::locator;

/// Options for locating the sharables repository.
#[derive(Args, Debug, Clone, Default)]
pub struct RepoArgs {
    /// Path to the sharables directory (auto-detected if not specified)
    #[arg(long, value_name = "PATH", env = "SHARABLES_DIR")]
    pub sharables_dir: Option<PathBuf>,
}

impl RepoArgs {
    /// Resolve the repository root for this invocation.
    pub fn locate(&self) -> Result<PathBuf> {
        let cwd = std::env::current_dir()?;
        locator::discover(self.sharables_dir.as_deref(), &cwd).map_err(|e| match e {
            Error::RepositoryNotFound { ref path } => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| ".sharables".to_string());
                anyhow!(
                    "{}\nClone the sharables repo first:\n  git clone --filter=blob:none --sparse <repo-url> {}",
                    e,
                    name
                )
            }
            other => other.into(),
        })
    }
}

/// Options for commands that touch deployment targets.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Project root that relative targets are resolved against
    /// (default: parent of the sharables directory)
    #[arg(long, value_name = "PATH")]
    pub project_root: Option<PathBuf>,
}

impl ProjectArgs {
    /// The project root, given the located repository.
    pub fn project_root(&self, repo_root: &Path) -> Result<PathBuf> {
        match &self.project_root {
            Some(root) if root.is_absolute() => Ok(root.clone()),
            Some(root) => Ok(std::env::current_dir()?.join(root)),
            None => repo_root
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| anyhow!("{} has no parent directory", repo_root.display())),
        }
    }
}

/// Fail with the standard message when a commit message is missing.
pub fn require_message<'a>(message: &'a Option<String>, action: &str) -> Result<&'a str> {
    match message.as_deref() {
        Some(message) if !message.trim().is_empty() => Ok(message),
        _ => Err(anyhow!(
            "Commit message required for {}\nUse --message 'Your message'",
            action
        )),
    }
}
