//! # Sync Command Implementation
//!
//! Commits all changes in the sharables repository and pushes the current
//! branch. The push runs even when there was nothing new to commit, so
//! earlier unpushed commits still reach the remote.

use anyhow::Result;
use clap::Args;

use sharables::git::GitRepository;
use sharables::output::OutputConfig;

use super::{commit, push, require_message, RepoArgs};

/// Commit and push changes in the sharables repository
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Only stage changes under this section
    #[arg(short, long, value_name = "SECTION")]
    pub section: Option<String>,

    /// Branch to push (default: current branch)
    #[arg(short, long)]
    pub branch: Option<String>,
}

/// Execute the `sync` command.
pub fn execute(args: SyncArgs, out: &OutputConfig) -> Result<()> {
    let message = require_message(&args.message, "sync")?;
    let repo_root = args.repo.locate()?;
    let git = GitRepository::open(&repo_root);

    commit::report(out, git.commit_changes(message, args.section.as_deref())?);
    push::report(out, git.push(args.branch.as_deref())?);
    Ok(())
}
