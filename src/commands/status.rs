//! # Status Command Implementation
//!
//! Shows the state of the sharables repository: its location, remote,
//! current branch, sparse-checkout sections, and working tree changes.

use anyhow::Result;
use clap::Args;

use sharables::git::GitRepository;
use sharables::output::OutputConfig;

use super::RepoArgs;

/// Show the git status of the sharables repository
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub repo: RepoArgs,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, out: &OutputConfig) -> Result<()> {
    let repo_root = args.repo.locate()?;
    let git = GitRepository::open(&repo_root);

    println!("{}", out.heading("Sharables Repository Status"));
    println!();
    println!("Repository: {}", repo_root.display());
    println!(
        "Remote: {}",
        git.remote_url()?.unwrap_or_else(|| "not set".to_string())
    );
    println!(
        "Branch: {}",
        git.current_branch()?
            .unwrap_or_else(|| "(detached HEAD)".to_string())
    );

    let sections = git.sparse_checkout_list()?;
    if !sections.is_empty() {
        println!();
        println!("Checked out sections:");
        for section in &sections {
            println!("  - {}", section);
        }
    }

    println!();
    let short = git.status_short()?;
    if short.trim().is_empty() {
        println!("Working tree clean");
    } else {
        println!("Changes:");
        print!("{}", short);
        if !short.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
