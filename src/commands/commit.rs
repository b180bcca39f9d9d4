//! # Commit Command Implementation
//!
//! Stages and commits changes in the sharables repository, optionally
//! restricted to a single section.

use anyhow::Result;
use clap::Args;
use log::info;

use sharables::git::{CommitOutcome, GitRepository};
use sharables::output::{Marker, OutputConfig};

use super::{require_message, RepoArgs};

/// Commit changes in the sharables repository
#[derive(Args, Debug)]
pub struct CommitArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Commit message
    #[arg(short, long)]
    pub message: Option<String>,

    /// Only stage changes under this section
    #[arg(short, long, value_name = "SECTION")]
    pub section: Option<String>,
}

/// Execute the `commit` command.
pub fn execute(args: CommitArgs, out: &OutputConfig) -> Result<()> {
    let message = require_message(&args.message, "commit")?;
    let repo_root = args.repo.locate()?;
    let git = GitRepository::open(&repo_root);

    info!("committing in {}", repo_root.display());
    report(out, git.commit_changes(message, args.section.as_deref())?);
    Ok(())
}

/// Print the result of a commit.
pub fn report(out: &OutputConfig, outcome: CommitOutcome) {
    match outcome {
        CommitOutcome::Committed => println!("{}", out.line(Marker::Success, "Changes committed")),
        CommitOutcome::NothingToCommit => println!("{}", out.line(Marker::Info, "No changes to commit")),
    }
}
