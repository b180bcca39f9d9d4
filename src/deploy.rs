//! # Deployment Orchestration
//!
//! Runs every mapping of the deployment configuration through the
//! [`LinkManager`](crate::link::LinkManager), in the order they are declared.
//!
//! Mappings are independent. A missing section is skipped, a failing target
//! is recorded as failed, and in both cases processing moves on to the next
//! mapping. The batch is best-effort, not a transaction: nothing done for
//! earlier mappings is rolled back.
//!
//! Each mapping's report is handed to an observer callback as soon as it is
//! known, so callers can print progress in configuration order.

use crate::config::Mapping;
use crate::error::Error;
use crate::link::{is_link, remove_link, Deployment, LinkManager};
use crate::path;
use log::{debug, warn};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// What happened to one mapping during `deploy`.
#[derive(Debug)]
pub enum MappingOutcome {
    /// The target reflects the section (possibly unchanged).
    Deployed(Deployment),
    /// The section does not exist in the repository.
    Skipped(Error),
    /// The target could not be deployed.
    Failed(Error),
}

/// Per-mapping result of `deploy`.
#[derive(Debug)]
pub struct MappingReport {
    pub mapping: Mapping,
    /// `repo_root/section`.
    pub source: PathBuf,
    /// The resolved target, when resolution got that far.
    pub target: Option<PathBuf>,
    pub outcome: MappingOutcome,
}

impl MappingReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, MappingOutcome::Deployed(_))
    }
}

/// Counts for a whole `deploy` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploySummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

/// Deploy a single mapping.
pub fn deploy_one(
    manager: &LinkManager,
    mapping: &Mapping,
    repo_root: &Path,
    project_root: &Path,
) -> MappingReport {
    let source = repo_root.join(&mapping.section);
    if let Some(problem) = &mapping.problem {
        return MappingReport {
            mapping: mapping.clone(),
            source,
            target: None,
            outcome: MappingOutcome::Failed(problem.to_error()),
        };
    }
    if let Err(e) = check_section_name(&mapping.section) {
        return MappingReport {
            mapping: mapping.clone(),
            source,
            target: None,
            outcome: MappingOutcome::Failed(e),
        };
    }

    let mut report = MappingReport {
        mapping: mapping.clone(),
        source: source.clone(),
        target: None,
        outcome: MappingOutcome::Skipped(Error::SectionMissing {
            section: mapping.section.clone(),
        }),
    };

    if !source.exists() {
        warn!("section not found: {} (skipping)", mapping.section);
        return report;
    }

    let target = match path::resolve(&mapping.target, project_root) {
        Ok(target) => target,
        Err(e) => {
            report.outcome = MappingOutcome::Failed(e);
            return report;
        }
    };
    debug!(
        "deploying {} -> {} ({})",
        mapping.section,
        target.display(),
        mapping.method
    );

    report.outcome = match manager.reconcile(&source, &target, mapping.method) {
        Ok(deployment) => MappingOutcome::Deployed(deployment),
        Err(Error::SectionMissing { .. }) => MappingOutcome::Skipped(Error::SectionMissing {
            section: mapping.section.clone(),
        }),
        Err(e) => MappingOutcome::Failed(e),
    };
    report.target = Some(target);
    report
}

/// A section must name an entry inside the repository, never the
/// repository itself or anything outside it.
fn check_section_name(section: &str) -> Result<(), Error> {
    let path = Path::new(section);
    let mut components = path.components().peekable();
    let inside = components.peek().is_some()
        && components.all(|c| matches!(c, Component::Normal(_)));
    if inside {
        Ok(())
    } else {
        Err(Error::Path {
            message: format!(
                "section '{}' must be a name inside the sharables repository",
                section
            ),
        })
    }
}

/// Deploy every mapping in order, reporting each one to `observer`.
pub fn deploy_all<F>(
    manager: &LinkManager,
    mappings: &[Mapping],
    repo_root: &Path,
    project_root: &Path,
    mut observer: F,
) -> DeploySummary
where
    F: FnMut(&MappingReport),
{
    let mut summary = DeploySummary {
        total: mappings.len(),
        ..Default::default()
    };

    for mapping in mappings {
        let report = deploy_one(manager, mapping, repo_root, project_root);
        match report.outcome {
            MappingOutcome::Deployed(_) => summary.succeeded += 1,
            MappingOutcome::Skipped(_) => summary.skipped += 1,
            MappingOutcome::Failed(_) => summary.failed += 1,
        }
        observer(&report);
    }

    summary
}

/// What happened to one mapping during `undeploy`.
#[derive(Debug)]
pub enum UndeployOutcome {
    /// A link was removed.
    RemovedLink,
    /// Plain content was removed after confirmation.
    RemovedContent,
    /// Plain content was left in place because removal was not confirmed.
    Kept,
    /// Nothing exists at the target.
    NotFound,
    Failed(Error),
}

/// Per-mapping result of `undeploy`.
#[derive(Debug)]
pub struct UndeployReport {
    pub mapping: Mapping,
    pub target: Option<PathBuf>,
    pub outcome: UndeployOutcome,
}

/// Counts for a whole `undeploy` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndeploySummary {
    pub removed: usize,
    pub total: usize,
}

/// Undeploy a single mapping.
///
/// Links are removed unconditionally. Plain content is only removed when
/// `confirm` returns `true` for its path.
pub fn undeploy_one<C>(mapping: &Mapping, project_root: &Path, confirm: &mut C) -> UndeployReport
where
    C: FnMut(&Path) -> bool,
{
    if let Some(problem) = &mapping.problem {
        return UndeployReport {
            mapping: mapping.clone(),
            target: None,
            outcome: UndeployOutcome::Failed(problem.to_error()),
        };
    }

    let target = match path::resolve(&mapping.target, project_root) {
        Ok(target) => target,
        Err(e) => {
            return UndeployReport {
                mapping: mapping.clone(),
                target: None,
                outcome: UndeployOutcome::Failed(e),
            }
        }
    };

    let outcome = if is_link(&target) {
        match remove_link(&target) {
            Ok(()) => UndeployOutcome::RemovedLink,
            Err(e) => UndeployOutcome::Failed(Error::io_at(&target, e)),
        }
    } else if target.exists() {
        if confirm(&target) {
            match remove_content(&target) {
                Ok(()) => UndeployOutcome::RemovedContent,
                Err(e) => UndeployOutcome::Failed(Error::io_at(&target, e)),
            }
        } else {
            UndeployOutcome::Kept
        }
    } else {
        UndeployOutcome::NotFound
    };

    UndeployReport {
        mapping: mapping.clone(),
        target: Some(target),
        outcome,
    }
}

/// Undeploy every mapping in order, reporting each one to `observer`.
pub fn undeploy_all<C, F>(
    mappings: &[Mapping],
    project_root: &Path,
    mut confirm: C,
    mut observer: F,
) -> UndeploySummary
where
    C: FnMut(&Path) -> bool,
    F: FnMut(&UndeployReport),
{
    let mut summary = UndeploySummary {
        total: mappings.len(),
        ..Default::default()
    };

    for mapping in mappings {
        let report = undeploy_one(mapping, project_root, &mut confirm);
        if matches!(
            report.outcome,
            UndeployOutcome::RemovedLink | UndeployOutcome::RemovedContent
        ) {
            summary.removed += 1;
        }
        observer(&report);
    }

    summary
}

fn remove_content(target: &Path) -> std::io::Result<()> {
    if target.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    }
}
