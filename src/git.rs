//! # Git Operations
//!
//! Thin wrappers around the `git` executable for the sharables repository:
//! status, staging, committing, pushing, and a few read-only queries used by
//! the `status` report.
//!
//! Every operation is a single synchronous `git` invocation in the repository
//! root, made through the [`CommandRunner`] trait. The default runner,
//! [`SystemGit`], spawns the real `git` binary, which automatically picks up:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Any configuration in ~/.gitconfig
//!
//! Exit codes are treated as the primary signal. Output text is only
//! inspected where git offers nothing structured.

use crate::error::{Error, Result};
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs `git` with arguments in a directory.
pub trait CommandRunner {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput>;
}

/// The default [`CommandRunner`], which invokes the system `git`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemGit;

impl CommandRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<CommandOutput> {
        debug!("git {} (in {})", args.join(" "), dir.display());
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => Error::ToolNotFound {
                    tool: "git".to_string(),
                },
                _ => Error::Io(e),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Result of a commit request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    NothingToCommit,
}

/// Result of a push request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed { branch: String },
    NothingToPush { branch: String },
}

/// A located sharables repository and the runner used to drive it.
pub struct GitRepository {
    root: PathBuf,
    runner: Box<dyn CommandRunner>,
}

impl GitRepository {
    /// Wrap `root` using the system `git`.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::with_runner(root, Box::new(SystemGit))
    }

    /// Wrap `root` using a custom [`CommandRunner`].
    pub fn with_runner(root: impl Into<PathBuf>, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            root: root.into(),
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        self.runner.run(&self.root, args)
    }

    fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if !output.success() {
            return Err(Error::GitCommand {
                command: args.join(" "),
                stderr: output.stderr.trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    /// Porcelain status lines; empty when the working tree is clean.
    pub fn status(&self) -> Result<Vec<String>> {
        let stdout = self.run_checked(&["status", "--porcelain"])?;
        Ok(stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_end().to_string())
            .collect())
    }

    /// Human-readable short status, as shown by `git status --short`.
    pub fn status_short(&self) -> Result<String> {
        self.run_checked(&["status", "--short"])
    }

    /// Stage `pathspec`.
    pub fn stage(&self, pathspec: &str) -> Result<()> {
        self.run_checked(&["add", "--", pathspec])?;
        Ok(())
    }

    /// Whether the index differs from `HEAD`.
    pub fn has_staged_changes(&self) -> Result<bool> {
        let args = ["diff", "--cached", "--quiet"];
        let output = self.run(&args)?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Error::GitCommand {
                command: args.join(" "),
                stderr: output.stderr.trim().to_string(),
            }),
        }
    }

    /// Commit the index with `message`; a no-op when nothing is staged.
    pub fn commit(&self, message: &str) -> Result<CommitOutcome> {
        if !self.has_staged_changes()? {
            return Ok(CommitOutcome::NothingToCommit);
        }
        self.run_checked(&["commit", "-m", message])?;
        Ok(CommitOutcome::Committed)
    }

    /// Stage and commit working tree changes.
    ///
    /// With `section` only `<section>/` is staged, otherwise everything.
    /// Nothing is staged when the working tree is clean.
    pub fn commit_changes(&self, message: &str, section: Option<&str>) -> Result<CommitOutcome> {
        if self.status()?.is_empty() {
            return Ok(CommitOutcome::NothingToCommit);
        }

        match section {
            Some(section) => self.stage(&format!("{}/", section.trim_end_matches('/')))?,
            None => self.stage(".")?,
        }
        self.commit(message)
    }

    /// The checked-out branch, `None` on a detached HEAD.
    pub fn current_branch(&self) -> Result<Option<String>> {
        let stdout = self.run_checked(&["branch", "--show-current"])?;
        let branch = stdout.trim();
        Ok((!branch.is_empty()).then(|| branch.to_string()))
    }

    /// URL of the `origin` remote, `None` when it is not configured.
    pub fn remote_url(&self) -> Result<Option<String>> {
        let output = self.run(&["remote", "get-url", "origin"])?;
        let url = output.stdout.trim();
        Ok((output.success() && !url.is_empty()).then(|| url.to_string()))
    }

    /// Sparse-checkout patterns; empty when sparse checkout is not in use.
    pub fn sparse_checkout_list(&self) -> Result<Vec<String>> {
        let output = self.run(&["sparse-checkout", "list"])?;
        if !output.success() {
            return Ok(Vec::new());
        }
        Ok(output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Commits on `HEAD` that `origin/<branch>` does not have.
    ///
    /// `None` when there is no remote tracking branch to compare with.
    pub fn unpushed_commits(&self, branch: &str) -> Result<Option<usize>> {
        let tracking = format!("refs/remotes/origin/{}", branch);
        if !self.run(&["rev-parse", "--verify", "--quiet", &tracking])?.success() {
            return Ok(None);
        }

        let range = format!("origin/{}..HEAD", branch);
        let stdout = self.run_checked(&["rev-list", "--count", &range])?;
        stdout
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::GitCommand {
                command: format!("rev-list --count {}", range),
                stderr: format!("unexpected output: {}", stdout.trim()),
            })
    }

    /// Push `branch` (default: the current branch) to `origin`.
    ///
    /// Skipped when the remote tracking branch already has every commit. A
    /// branch that does not exist upstream yet is pushed.
    pub fn push(&self, branch: Option<&str>) -> Result<PushOutcome> {
        let branch = match branch {
            Some(branch) => branch.to_string(),
            None => self.current_branch()?.ok_or_else(|| Error::GitCommand {
                command: "branch --show-current".to_string(),
                stderr: "Could not determine current branch (detached HEAD?)".to_string(),
            })?,
        };

        if self.unpushed_commits(&branch)? == Some(0) {
            return Ok(PushOutcome::NothingToPush { branch });
        }

        self.run_checked(&["push", "origin", &branch])?;
        Ok(PushOutcome::Pushed { branch })
    }
}
