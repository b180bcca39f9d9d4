//! # Deploy Command Implementation
//!
//! Deploys every section listed in `.sharables-deploy.yaml` to its target.
//!
//! When the repository has no deployment configuration yet, an example is
//! written and the command exits with an error so the user can edit it
//! first. Individual mapping failures are reported inline and counted in the
//! summary but do not change the exit code.

use anyhow::{bail, Result};
use clap::Args;
use std::path::Path;

use sharables::config;
use sharables::deploy::{self, MappingOutcome, MappingReport};
use sharables::error::Error;
use sharables::link::{DeploymentKind, LinkManager};
use sharables::output::{Marker, OutputConfig};

use super::ProjectArgs;

/// Deploy sharables sections to their target paths
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub project: ProjectArgs,
}

/// Execute the `deploy` command.
pub fn execute(args: DeployArgs, out: &OutputConfig) -> Result<()> {
    let repo_root = args.project.repo.locate()?;
    let project_root = args.project.project_root(&repo_root)?;

    let mappings = match config::load(&repo_root) {
        Ok(mappings) => mappings,
        Err(Error::ConfigMissing { path }) => {
            println!(
                "{}",
                out.line(
                    Marker::Skip,
                    &format!("Config file not found: {}", path.display())
                )
            );
            println!("Creating example config...");
            config::write_example(&repo_root, false)?;
            println!(
                "{}",
                out.line(
                    Marker::Success,
                    &format!("Created example config at: {}", path.display())
                )
            );
            bail!("Edit {} and run deploy again", path.display());
        }
        Err(e) => return Err(e.into()),
    };

    println!("{}", out.heading("Deploying Sharables Sections"));
    println!();

    let manager = LinkManager::new();
    let summary = deploy::deploy_all(&manager, &mappings, &repo_root, &project_root, |report| {
        print_report(out, report)
    });

    println!();
    println!(
        "{}",
        out.paint(
            Marker::Success,
            &format!(
                "Deployment complete! ({}/{} sections)",
                summary.succeeded, summary.total
            )
        )
    );
    print_git_hint(&repo_root);

    Ok(())
}

/// Print the report lines for one mapping.
pub fn print_report(out: &OutputConfig, report: &MappingReport) {
    for line in report_lines(out, report) {
        println!("{}", line);
    }
}

/// Render the report lines for one mapping.
pub fn report_lines(out: &OutputConfig, report: &MappingReport) -> Vec<String> {
    let section = &report.mapping.section;
    let target = report
        .target
        .as_deref()
        .map(|t| t.display().to_string())
        .unwrap_or_else(|| report.mapping.target.clone());

    let mut lines = Vec::new();
    match &report.outcome {
        MappingOutcome::Deployed(deployment) => {
            if let Some(backup) = &deployment.backup {
                lines.push(out.paint(
                    Marker::Skip,
                    &format!("Backed up existing: {}", backup.display()),
                ));
            }

            match (deployment.kind, &deployment.fallback) {
                (DeploymentKind::AlreadyCorrect, Some(_)) => lines.push(out.line(
                    Marker::Success,
                    &format!("Already deployed (copy, link unavailable): {} -> {}", section, target),
                )),
                (DeploymentKind::AlreadyCorrect, None) => lines.push(out.line(
                    Marker::Success,
                    &format!("Already deployed: {} -> {}", section, target),
                )),
                (DeploymentKind::Linked, _) => lines.push(out.line(
                    Marker::Success,
                    &format!("Deployed (link): {} -> {}", section, target),
                )),
                (DeploymentKind::Copied, Some(reason)) => {
                    lines.push(out.line(
                        Marker::Fallback,
                        &format!("Deployed (copy, link failed): {} -> {}", section, target),
                    ));
                    lines.push(out.paint(Marker::Skip, &format!("  {}", reason)));
                    if let Error::PrivilegeDenied { .. } = reason {
                        lines.extend(privilege_hint(out));
                    }
                }
                (DeploymentKind::Copied, None) => {
                    lines.push(out.line(
                        Marker::Success,
                        &format!("Deployed (copy): {} -> {}", section, target),
                    ));
                    lines.push(out.paint(
                        Marker::Skip,
                        "  Note: Copy method doesn't maintain git connection",
                    ));
                }
            }
        }
        MappingOutcome::Skipped(_) => lines.push(out.line(
            Marker::Skip,
            &format!("Section not found: {} (skipping)", section),
        )),
        MappingOutcome::Failed(e) => lines.push(out.line(
            Marker::Failure,
            &format!("Failed: {} -> {}: {}", section, target, e),
        )),
    }
    lines
}

fn privilege_hint(out: &OutputConfig) -> Vec<String> {
    if cfg!(windows) {
        vec![
            out.paint(Marker::Skip, "  Windows symlink options:"),
            "    1. Enable Developer Mode: Settings -> Privacy & security -> For developers"
                .to_string(),
            "    2. Run as Administrator".to_string(),
            "    3. Use copy method: set `method: copy` in the config file".to_string(),
        ]
    } else {
        vec!["  Set `method: copy` in the config file to skip link creation.".to_string()]
    }
}

fn print_git_hint(repo_root: &Path) {
    println!();
    println!("Git operations:");
    println!("  - Edit files at their target locations (linked sections stay tracked)");
    println!("  - Commit/push from: {}", repo_root.display());
    println!("  - Or run `sharables sync --message '...'` from anywhere in the project");
}
