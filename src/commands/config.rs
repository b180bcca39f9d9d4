//! # Config Command Implementation
//!
//! Writes the example `.sharables-deploy.yaml` into the sharables repository.

use anyhow::Result;
use clap::Args;

use sharables::config::{self, WriteOutcome};
use sharables::output::{Marker, OutputConfig};

use super::RepoArgs;

/// Create an example deployment config in the sharables repository
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub repo: RepoArgs,

    /// Overwrite an existing config file
    #[arg(short, long)]
    pub force: bool,
}

/// Execute the `config` command.
pub fn execute(args: ConfigArgs, out: &OutputConfig) -> Result<()> {
    let repo_root = args.repo.locate()?;
    let path = config::config_path(&repo_root);

    let verb = match config::write_example(&repo_root, args.force)? {
        WriteOutcome::Created => "Created",
        WriteOutcome::Overwritten => "Overwrote",
    };
    println!(
        "{}",
        out.line(
            Marker::Success,
            &format!("{} example config at: {}", verb, path.display())
        )
    );
    println!("Edit it to configure your deployments, then run `sharables deploy`.");

    Ok(())
}
