//! # Target Reconciliation
//!
//! This module decides, for one section and one resolved target path,
//! whether the target already reflects the section and, if not, moves it to
//! the deployed state with the smallest safe change.
//!
//! ## State Detection
//!
//! The target's state is read fresh from the filesystem on every call; there
//! is no record of earlier deployments. That is what makes repeated runs
//! idempotent:
//!
//! - **Absent**: nothing at the target path.
//! - **LinkCorrect**: a link whose resolved destination is the section.
//! - **LinkStale**: a link pointing anywhere else, including dangling links.
//! - **OccupiedPlain**: a real file or directory.
//!
//! ## Transitions
//!
//! With the `link` method a stale link is simply removed, while plain content
//! is renamed aside to `<name>.backup.<unix-seconds>` before the new link is
//! created. If the platform refuses the link (commonly Windows without
//! Developer Mode), the whole transition is retried with the `copy` method and
//! the link error is carried on the result as a warning. A plain target that
//! already matches the section (typically left by an earlier fallback) is
//! only moved aside for the duration of the link attempt and is put back if
//! the link is refused again.
//!
//! With the `copy` method any existing entry is backed up the same way and
//! the section is copied recursively. A plain target whose content already
//! equals the section is left alone.
//!
//! Nothing here guards against another process changing the target between
//! detection and transition.

use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Windows `ERROR_PRIVILEGE_NOT_HELD`.
const ERROR_PRIVILEGE_NOT_HELD: i32 = 1314;

/// How a section is made available at its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkMethod {
    /// Symbolic link to the section inside the repository.
    #[default]
    #[serde(alias = "symlink")]
    Link,
    /// Recursive copy of the section's content.
    Copy,
}

impl fmt::Display for LinkMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkMethod::Link => write!(f, "link"),
            LinkMethod::Copy => write!(f, "copy"),
        }
    }
}

/// Observed state of a deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    Absent,
    LinkCorrect,
    LinkStale { destination: Option<PathBuf> },
    OccupiedPlain,
}

/// What a successful reconciliation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentKind {
    /// The target already reflected the section; nothing was changed.
    AlreadyCorrect,
    /// A link was created.
    Linked,
    /// The section's content was copied.
    Copied,
}

/// Result of a successful reconciliation.
#[derive(Debug)]
pub struct Deployment {
    pub kind: DeploymentKind,
    /// Where previous content was moved to, if anything was moved.
    pub backup: Option<PathBuf>,
    /// The link error that forced a copy, or kept an existing copy, when the
    /// link method could not create a link.
    pub fallback: Option<Error>,
}

impl Deployment {
    fn new(kind: DeploymentKind, backup: Option<PathBuf>) -> Self {
        Self {
            kind,
            backup,
            fallback: None,
        }
    }

    /// `true` if the filesystem was not touched.
    pub fn is_noop(&self) -> bool {
        self.kind == DeploymentKind::AlreadyCorrect
    }
}

/// Creates links on behalf of [`LinkManager`].
///
/// The default implementation makes platform symlinks. Tests supply
/// implementations that refuse, to exercise the copy fallback.
pub trait Linker {
    /// Create a link at `target` pointing to `source`. `source_is_dir`
    /// selects the link type on platforms that distinguish them.
    fn link(&self, source: &Path, target: &Path, source_is_dir: bool) -> io::Result<()>;
}

/// The default [`Linker`], which creates native symbolic links.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkLinker;

impl Linker for SymlinkLinker {
    #[cfg(unix)]
    fn link(&self, source: &Path, target: &Path, _source_is_dir: bool) -> io::Result<()> {
        std::os::unix::fs::symlink(source, target)
    }

    #[cfg(windows)]
    fn link(&self, source: &Path, target: &Path, source_is_dir: bool) -> io::Result<()> {
        if source_is_dir {
            std::os::windows::fs::symlink_dir(source, target)
        } else {
            std::os::windows::fs::symlink_file(source, target)
        }
    }

    #[cfg(not(any(unix, windows)))]
    fn link(&self, _source: &Path, _target: &Path, _source_is_dir: bool) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "symbolic links are not supported on this platform",
        ))
    }
}

/// Reconciles deployment targets with their sections.
pub struct LinkManager {
    linker: Box<dyn Linker>,
}

impl Default for LinkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkManager {
    /// A manager that creates native symlinks.
    pub fn new() -> Self {
        Self::with_linker(Box::new(SymlinkLinker))
    }

    /// A manager using a custom [`Linker`].
    pub fn with_linker(linker: Box<dyn Linker>) -> Self {
        Self { linker }
    }

    /// Bring `target` to the deployed state for `source` using `method`.
    ///
    /// Returns `Err` only for failures that are fatal to this mapping; a
    /// refused link is not one of them.
    pub fn reconcile(&self, source: &Path, target: &Path, method: LinkMethod) -> Result<Deployment> {
        if fs::symlink_metadata(source).is_err() {
            return Err(Error::SectionMissing {
                section: source.display().to_string(),
            });
        }

        let state = detect_state(source, target);
        debug!("{} is {:?}", target.display(), state);

        if state == TargetState::LinkCorrect {
            return Ok(Deployment::new(DeploymentKind::AlreadyCorrect, None));
        }

        match method {
            LinkMethod::Link => self.link_into(source, target, &state),
            LinkMethod::Copy => copy_into(source, target, &state),
        }
    }

    fn link_into(&self, source: &Path, target: &Path, state: &TargetState) -> Result<Deployment> {
        if *state == TargetState::OccupiedPlain && tree_matches(source, target) {
            return self.relink_identical_copy(source, target);
        }

        let backup = match state {
            TargetState::LinkStale { .. } => {
                remove_link(target).map_err(|e| Error::io_at(target, e))?;
                debug!("removed stale link {}", target.display());
                None
            }
            TargetState::OccupiedPlain => Some(backup_aside(target)?),
            TargetState::Absent | TargetState::LinkCorrect => None,
        };

        create_parent_dirs(target)?;

        match self.linker.link(source, target, source.is_dir()) {
            Ok(()) => {
                debug!("linked {} -> {}", target.display(), source.display());
                Ok(Deployment::new(DeploymentKind::Linked, backup))
            }
            Err(err) => {
                let reason = classify_link_error(target, err);
                warn!("{}; falling back to copy", reason);

                // Plain content has already been moved aside, so the target
                // is re-inspected before copying.
                let state = detect_state(source, target);
                let mut deployment = copy_into(source, target, &state)?;
                deployment.backup = backup.or(deployment.backup);
                deployment.fallback = Some(reason);
                Ok(deployment)
            }
        }
    }

    /// Replace a plain copy that already matches `source` with a link.
    ///
    /// If the link is refused the copy is moved back, so a target left by an
    /// earlier copy fallback stays untouched and no backup accumulates.
    fn relink_identical_copy(&self, source: &Path, target: &Path) -> Result<Deployment> {
        let backup = backup_aside(target)?;

        match self.linker.link(source, target, source.is_dir()) {
            Ok(()) => {
                debug!("linked {} -> {}", target.display(), source.display());
                Ok(Deployment::new(DeploymentKind::Linked, Some(backup)))
            }
            Err(err) => {
                let reason = classify_link_error(target, err);
                fs::rename(&backup, target).map_err(|e| Error::io_at(&backup, e))?;
                debug!("{}; kept identical copy at {}", reason, target.display());
                Ok(Deployment {
                    kind: DeploymentKind::AlreadyCorrect,
                    backup: None,
                    fallback: Some(reason),
                })
            }
        }
    }
}

/// Inspect `target` and classify it relative to `source`.
pub fn detect_state(source: &Path, target: &Path) -> TargetState {
    let metadata = match fs::symlink_metadata(target) {
        Ok(metadata) => metadata,
        Err(_) => return TargetState::Absent,
    };

    if !metadata.file_type().is_symlink() {
        return TargetState::OccupiedPlain;
    }

    let destination = fs::read_link(target).ok();
    let resolved = destination.as_ref().and_then(|dest| {
        let absolute = if dest.is_absolute() {
            dest.clone()
        } else {
            target.parent().unwrap_or(Path::new("")).join(dest)
        };
        absolute.canonicalize().ok()
    });

    match (resolved, source.canonicalize().ok()) {
        (Some(resolved), Some(source)) if resolved == source => TargetState::LinkCorrect,
        _ => TargetState::LinkStale { destination },
    }
}

/// `true` if `path` is a symbolic link (dangling or not).
pub fn is_link(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Remove a link without touching what it points at.
pub fn remove_link(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        // Directory symlinks on Windows are removed as directories
        Err(e) if cfg!(windows) => fs::remove_dir(path).map_err(|_| e),
        other => other,
    }
}

/// The backup location for `target` at the given unix timestamp.
pub fn backup_path(target: &Path, timestamp: u64) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{}.backup.{}", name, timestamp))
}

/// Rename `target` aside to a timestamped backup and return its new path.
pub fn backup_aside(target: &Path) -> Result<PathBuf> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let backup = backup_path(target, timestamp);
    if fs::symlink_metadata(&backup).is_ok() {
        return Err(Error::io_at(
            &backup,
            io::Error::new(io::ErrorKind::AlreadyExists, "backup already exists"),
        ));
    }

    fs::rename(target, &backup).map_err(|e| Error::io_at(target, e))?;
    debug!("backed up {} to {}", target.display(), backup.display());
    Ok(backup)
}

fn copy_into(source: &Path, target: &Path, state: &TargetState) -> Result<Deployment> {
    if *state == TargetState::OccupiedPlain && tree_matches(source, target) {
        return Ok(Deployment::new(DeploymentKind::AlreadyCorrect, None));
    }

    let backup = match state {
        TargetState::Absent => None,
        _ => Some(backup_aside(target)?),
    };

    create_parent_dirs(target)?;
    copy_tree(source, target)?;
    debug!("copied {} -> {}", source.display(), target.display());

    Ok(Deployment::new(DeploymentKind::Copied, backup))
}

fn create_parent_dirs(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io_at(parent, e))?;
    }
    Ok(())
}

fn classify_link_error(target: &Path, err: io::Error) -> Error {
    let privilege = err.kind() == io::ErrorKind::PermissionDenied
        || (cfg!(windows) && err.raw_os_error() == Some(ERROR_PRIVILEGE_NOT_HELD));

    if privilege {
        Error::PrivilegeDenied {
            path: target.to_path_buf(),
            message: err.to_string(),
        }
    } else {
        Error::io_at(target, err)
    }
}

/// Recursively copy `source` (a file or directory) to `target`.
///
/// Existing files under `target` are overwritten; the target does not need
/// to be absent beforehand. Links inside the section are copied as the
/// content they point at.
pub fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    if !source.is_dir() {
        replace_link_entry(target)?;
        fs::copy(source, target).map_err(|e| Error::io_at(target, e))?;
        return Ok(());
    }

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| Error::io_at(source, e.into()))?;
        let relative = entry.path().strip_prefix(source).map_err(|_| Error::Path {
            message: format!(
                "'{}' is not inside '{}'",
                entry.path().display(),
                source.display()
            ),
        })?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination).map_err(|e| Error::io_at(&destination, e))?;
        } else {
            replace_link_entry(&destination)?;
            fs::copy(entry.path(), &destination).map_err(|e| Error::io_at(&destination, e))?;
        }
    }

    Ok(())
}

/// Copying through a link would write into whatever it points at.
fn replace_link_entry(path: &Path) -> Result<()> {
    if is_link(path) {
        remove_link(path).map_err(|e| Error::io_at(path, e))?;
    }
    Ok(())
}

/// `true` if `target` holds exactly the same files and bytes as `source`.
fn tree_matches(source: &Path, target: &Path) -> bool {
    if source.is_file() {
        return target.is_file() && same_bytes(source, target);
    }
    if !target.is_dir() {
        return false;
    }

    let source_entries = match collect_entries(source) {
        Some(entries) => entries,
        None => return false,
    };
    let target_entries = match collect_entries(target) {
        Some(entries) => entries,
        None => return false,
    };

    source_entries == target_entries
        && source_entries
            .iter()
            .filter(|(_, is_dir)| !is_dir)
            .all(|(relative, _)| same_bytes(&source.join(relative), &target.join(relative)))
}

fn collect_entries(root: &Path) -> Option<Vec<(PathBuf, bool)>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).min_depth(1).sort_by_file_name() {
        let entry = entry.ok()?;
        let relative = entry.path().strip_prefix(root).ok()?.to_path_buf();
        entries.push((relative, entry.file_type().is_dir()));
    }
    Some(entries)
}

fn same_bytes(a: &Path, b: &Path) -> bool {
    match (fs::read(a), fs::read(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
