//! Target path resolution for deployment mappings
//!
//! Mapping targets are written by hand in the deployment config, so they come
//! in three shapes: home-relative (`~/.config/x`), project-relative
//! (`.cursor/rules`), and absolute. [`resolve`] turns any of them into a
//! canonical absolute path without touching the filesystem beyond reading
//! metadata.
//!
//! The final path component is never followed. A target that is itself a
//! symlink must stay observable as a symlink, otherwise an existing deployment
//! would resolve to the section it points at.

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Resolve a raw target string against `project_root` using the current
/// user's home directory.
pub fn resolve(raw: &str, project_root: &Path) -> Result<PathBuf> {
    resolve_with_home(raw, project_root, dirs::home_dir().as_deref())
}

/// Resolve a raw target string with an explicit home directory.
///
/// Rules, applied in order:
/// 1. a leading `~` expands to `home`
/// 2. a still-relative path is joined onto `project_root`
/// 3. `.` and `..` are collapsed and symlinks in the existing parent
///    segments are resolved
pub fn resolve_with_home(raw: &str, project_root: &Path, home: Option<&Path>) -> Result<PathBuf> {
    let expanded = expand_home(raw, home)?;

    let joined = if expanded.is_absolute() {
        expanded
    } else if project_root.is_absolute() {
        project_root.join(expanded)
    } else {
        std::env::current_dir()?.join(project_root).join(expanded)
    };

    Ok(canonicalize_parent(&normalize_lexically(&joined)))
}

/// Expand a leading `~` (alone, or followed by a separator) to `home`.
///
/// `~user` forms are not expanded and are returned unchanged.
pub fn expand_home(raw: &str, home: Option<&Path>) -> Result<PathBuf> {
    let rest = match raw.strip_prefix('~') {
        Some("") => Some(""),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => Some(&rest[1..]),
        _ => None,
    };

    match rest {
        None => Ok(PathBuf::from(raw)),
        Some(rest) => {
            let home = home.ok_or_else(|| Error::Path {
                message: format!("cannot expand '{}': home directory is unknown", raw),
            })?;
            if rest.is_empty() {
                Ok(home.to_path_buf())
            } else {
                Ok(home.join(rest))
            }
        }
    }
}

/// Collapse `.` and `..` components without consulting the filesystem.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_parent = matches!(out.components().next_back(), Some(Component::ParentDir));
                // `..` at the root stays at the root
                if ends_in_parent || (!out.pop() && !out.has_root()) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize everything but the final component.
fn canonicalize_parent(path: &Path) -> PathBuf {
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            canonicalize_existing_prefix(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}

/// Canonicalize the longest existing prefix of `path` and re-append the rest.
fn canonicalize_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut missing: Vec<OsString> = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc, name| acc.join(name));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
