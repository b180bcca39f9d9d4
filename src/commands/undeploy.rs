//! # Undeploy Command Implementation
//!
//! Removes deployed sections from their targets. Links are removed without
//! asking. Copied content is only deleted after confirmation, either through
//! `--yes` or an interactive prompt. Without a terminal and without `--yes`,
//! copied content is kept.

use anyhow::Result;
use clap::Args;
use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::debug;
use std::path::Path;

use sharables::config;
use sharables::deploy::{self, UndeployOutcome, UndeployReport};
use sharables::output::{Marker, OutputConfig};

use super::ProjectArgs;

/// Remove deployed sections from their target paths
#[derive(Args, Debug)]
pub struct UndeployArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Remove copied content without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Execute the `undeploy` command.
pub fn execute(args: UndeployArgs, out: &OutputConfig) -> Result<()> {
    let repo_root = args.project.repo.locate()?;
    let project_root = args.project.project_root(&repo_root)?;
    let mappings = config::load(&repo_root)?;

    println!("{}", out.heading("Undeploying Sharables Sections"));
    println!();

    let interactive = Term::stdout().is_term() && Term::stderr().is_term();
    let yes = args.yes;
    let confirm = |target: &Path| -> bool {
        if yes {
            return true;
        }
        if !interactive {
            debug!("not a terminal, keeping {}", target.display());
            return false;
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "{} is not a link. Remove it anyway?",
                target.display()
            ))
            .default(false)
            .interact()
            .unwrap_or(false)
    };

    let summary = deploy::undeploy_all(&mappings, &project_root, confirm, |report| {
        print_report(out, report)
    });

    println!();
    println!(
        "{}",
        out.paint(
            Marker::Success,
            &format!(
                "Undeploy complete! ({}/{} sections removed)",
                summary.removed, summary.total
            )
        )
    );

    Ok(())
}

fn print_report(out: &OutputConfig, report: &UndeployReport) {
    let target = report
        .target
        .as_deref()
        .map(|t| t.display().to_string())
        .unwrap_or_else(|| report.mapping.target.clone());

    let (marker, message) = match &report.outcome {
        UndeployOutcome::RemovedLink => (Marker::Success, format!("Removed link: {}", target)),
        UndeployOutcome::RemovedContent => (Marker::Success, format!("Removed: {}", target)),
        UndeployOutcome::Kept => (Marker::Skip, format!("Kept (not a link): {}", target)),
        UndeployOutcome::NotFound => (Marker::Info, format!("Target not found: {}", target)),
        UndeployOutcome::Failed(e) => (Marker::Failure, format!("Failed: {}: {}", target, e)),
    };
    println!("{}", out.line(marker, &message));
}
