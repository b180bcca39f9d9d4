//! # Push Command Implementation
//!
//! Pushes the sharables repository to `origin`.

use anyhow::Result;
use clap::Args;

use sharables::git::{GitRepository, PushOutcome};
use sharables::output::{Marker, OutputConfig};

use super::RepoArgs;

/// Push the sharables repository to its remote
#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Branch to push (default: current branch)
    #[arg(short, long)]
    pub branch: Option<String>,
}

/// Execute the `push` command.
pub fn execute(args: PushArgs, out: &OutputConfig) -> Result<()> {
    let repo_root = args.repo.locate()?;
    let git = GitRepository::open(&repo_root);
    report(out, git.push(args.branch.as_deref())?);
    Ok(())
}

/// Print the result of a push.
pub fn report(out: &OutputConfig, outcome: PushOutcome) {
    match outcome {
        PushOutcome::Pushed { branch } => println!(
            "{}",
            out.line(Marker::Success, &format!("Pushed to origin/{}", branch))
        ),
        PushOutcome::NothingToPush { branch } => println!(
            "{}",
            out.line(
                Marker::Info,
                &format!("Nothing to push, origin/{} is up to date", branch)
            )
        ),
    }
}
