//! # Repository Location
//!
//! Finds the sharables repository that a project uses. A project normally
//! keeps a sparse clone of the sharables repository in a `.sharables` (or
//! `sharables`) directory somewhere above the working directory, so the
//! search walks upward through the ancestors and takes the closest match.
//!
//! A candidate only counts when it carries `.git` metadata. An
//! uninitialized placeholder with the right name is skipped, so it cannot
//! shadow a real repository further up.

use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// Directory names recognized as a sharables repository, in lookup order.
pub const CANONICAL_NAMES: [&str; 2] = [".sharables", "sharables"];

/// Version-control metadata marker that qualifies a candidate.
pub const GIT_MARKER: &str = ".git";

/// Returns `true` if `dir` contains git metadata (directory or gitfile).
pub fn is_git_repository(dir: &Path) -> bool {
    dir.join(GIT_MARKER).exists()
}

/// Walk upward from `start_dir` and return the first qualifying sharables
/// repository.
///
/// The search terminates when the parent of the current directory is the
/// directory itself (or there is no parent), i.e. at the filesystem root.
pub fn locate(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir
        .canonicalize()
        .unwrap_or_else(|_| start_dir.to_path_buf());

    loop {
        for name in CANONICAL_NAMES {
            let candidate = current.join(name);
            if candidate.is_dir() {
                if is_git_repository(&candidate) {
                    debug!("found sharables repository at {}", candidate.display());
                    return Some(candidate);
                }
                debug!("skipping {} (no {})", candidate.display(), GIT_MARKER);
            }
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent.to_path_buf(),
            _ => return None,
        }
    }
}

/// Validate an explicitly supplied repository path.
pub fn open(path: &Path) -> Result<PathBuf> {
    let path = absolutize(path)?;
    if !path.is_dir() {
        return Err(Error::RepositoryNotFound { path });
    }
    if !is_git_repository(&path) {
        return Err(Error::NotAVersionControlledDirectory { path });
    }
    Ok(path.canonicalize().unwrap_or(path))
}

/// Resolve the repository for an invocation.
///
/// An explicit `override_dir` is validated with [`open`]; otherwise the
/// repository is searched for from `cwd`. When the search finds nothing the
/// error names `<cwd>/.sharables`, the location a fresh clone would go.
pub fn discover(override_dir: Option<&Path>, cwd: &Path) -> Result<PathBuf> {
    match override_dir {
        Some(dir) => open(dir),
        None => locate(cwd).ok_or_else(|| Error::RepositoryNotFound {
            path: cwd.join(CANONICAL_NAMES[0]),
        }),
    }
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_repo(dir: &Path) {
        fs::create_dir_all(dir.join(GIT_MARKER)).unwrap();
    }

    #[test]
    fn test_locate_in_start_directory() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp.path().join(".sharables"));

        let found = locate(temp.path()).unwrap();
        assert_eq!(found, temp.path().join(".sharables").canonicalize().unwrap());
    }

    #[test]
    fn test_locate_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp.path().join("sharables"));
        let nested = temp.path().join("src/deep/module");
        fs::create_dir_all(&nested).unwrap();

        let found = locate(&nested).unwrap();
        assert_eq!(found, temp.path().join("sharables").canonicalize().unwrap());
    }

    #[test]
    fn test_locate_prefers_dot_name() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp.path().join(".sharables"));
        make_repo(&temp.path().join("sharables"));

        let found = locate(temp.path()).unwrap();
        assert!(found.ends_with(".sharables"));
    }

    #[test]
    fn test_locate_closest_ancestor_wins() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp.path().join(".sharables"));
        let project = temp.path().join("project");
        make_repo(&project.join(".sharables"));
        let nested = project.join("src");
        fs::create_dir_all(&nested).unwrap();

        let found = locate(&nested).unwrap();
        assert_eq!(found, project.join(".sharables").canonicalize().unwrap());
    }

    #[test]
    fn test_locate_skips_placeholder_without_git() {
        let temp = TempDir::new().unwrap();
        make_repo(&temp.path().join(".sharables"));
        let project = temp.path().join("project");
        fs::create_dir_all(project.join(".sharables")).unwrap();

        let found = locate(&project).unwrap();
        assert_eq!(found, temp.path().join(".sharables").canonicalize().unwrap());
    }

    #[test]
    fn test_locate_accepts_gitfile() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join(".sharables");
        fs::create_dir_all(&repo).unwrap();
        fs::write(repo.join(GIT_MARKER), "gitdir: ../.git/worktrees/sharables").unwrap();

        assert!(locate(temp.path()).is_some());
    }

    #[test]
    fn test_open_missing_directory() {
        let temp = TempDir::new().unwrap();
        let result = open(&temp.path().join("nope"));
        assert!(matches!(result, Err(Error::RepositoryNotFound { .. })));
    }

    #[test]
    fn test_open_directory_without_git() {
        let temp = TempDir::new().unwrap();
        let result = open(temp.path());
        assert!(matches!(
            result,
            Err(Error::NotAVersionControlledDirectory { .. })
        ));
    }

    #[test]
    fn test_discover_uses_override() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("custom-name");
        make_repo(&repo);

        let found = discover(Some(&repo), Path::new("/")).unwrap();
        assert_eq!(found, repo.canonicalize().unwrap());
    }

    #[test]
    fn test_discover_reports_default_location() {
        let temp = TempDir::new().unwrap();
        match discover(None, temp.path()) {
            Err(Error::RepositoryNotFound { path }) => {
                assert!(path.ends_with(".sharables"));
            }
            other => panic!("Expected RepositoryNotFound, got {:?}", other),
        }
    }
}
