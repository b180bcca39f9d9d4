//! Shared test utilities for E2E tests.
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_section_file("rules/a.md", "alpha")
//!         .with_config(configs::RULES_COPY);
//!     fixture.command().arg("deploy").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::git_available;
    pub use super::TestFixture;
}

/// Deployment configurations used across tests.
#[allow(dead_code)]
pub mod configs {
    /// One section linked to a project-relative target.
    pub const RULES_LINK: &str = r#"deployments:
  - section: rules
    target: .cursor/rules
    method: link
"#;

    /// One section copied to a project-relative target.
    pub const RULES_COPY: &str = r#"deployments:
  - section: rules
    target: .cursor/rules
    method: copy
"#;

    /// A missing section between two present ones.
    pub const WITH_MISSING_SECTION: &str = r#"deployments:
  - section: rules
    target: out/rules
    method: copy
  - section: nowhere
    target: out/nowhere
  - section: scripts
    target: out/scripts
    method: copy
"#;

    /// A target under the home directory.
    pub const HOME_TARGET: &str = r#"deployments:
  - section: scripts
    target: ~/.local/share/sharables
    method: copy
"#;

    /// Comments only.
    pub const EMPTY: &str = "# nothing deployed yet\n";
}

/// Whether a `git` executable can be run.
#[allow(dead_code)]
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A project directory holding a `.sharables/` repository.
///
/// Without [`TestFixture::with_real_git`] the repository only has an empty
/// `.git` directory, which is enough for every command that does not run
/// git itself.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a project with an empty sharables repository.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child(".sharables/.git")
            .create_dir_all()
            .expect("Failed to create .git");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home");
        Self { temp_dir }
    }

    /// Create a project whose sharables repository is a real git repository
    /// on branch `main`.
    #[allow(dead_code)]
    pub fn with_real_git() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("home")
            .create_dir_all()
            .expect("Failed to create home");
        let fixture = Self { temp_dir };
        fixture.git(&["init", "--quiet", ".sharables"], fixture.path());
        fixture.git(&["symbolic-ref", "HEAD", "refs/heads/main"], &fixture.repo_path());
        fixture
    }

    /// Write the deployment config.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".sharables/.sharables-deploy.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file inside the sharables repository.
    pub fn with_section_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(".sharables")
            .child(path)
            .write_str(content)
            .expect("Failed to write section file");
        self
    }

    /// Add a file inside the project, outside the repository.
    #[allow(dead_code)]
    pub fn with_project_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write project file");
        self
    }

    /// The project root.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The sharables repository root.
    pub fn repo_path(&self) -> PathBuf {
        self.path().join(".sharables")
    }

    /// The home directory the binary sees.
    #[allow(dead_code)]
    pub fn home(&self) -> PathBuf {
        self.path().join("home")
    }

    /// The deployment config path.
    #[allow(dead_code)]
    pub fn config_path(&self) -> PathBuf {
        self.repo_path().join(".sharables-deploy.yaml")
    }

    /// A command running in the project root with a private home directory
    /// and plain output.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("sharables");
        cmd.current_dir(self.path())
            .env("HOME", self.home())
            .env("USERPROFILE", self.home())
            .env("NO_COLOR", "1")
            .env_remove("SHARABLES_DIR")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run git with a fixed identity, panicking on failure.
    #[allow(dead_code)]
    pub fn git(&self, args: &[&str], dir: &Path) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .env("HOME", self.home())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com")
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Run git inside the sharables repository.
    #[allow(dead_code)]
    pub fn repo_git(&self, args: &[&str]) -> String {
        self.git(args, &self.repo_path())
    }

    /// Like [`TestFixture::command`], with the git identity variables set.
    #[allow(dead_code)]
    pub fn git_command(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_NAME", "Test")
            .env("GIT_AUTHOR_EMAIL", "test@example.com")
            .env("GIT_COMMITTER_NAME", "Test")
            .env("GIT_COMMITTER_EMAIL", "test@example.com");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
