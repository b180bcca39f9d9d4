//! # Sharables Library
//!
//! Core functionality for the `sharables` command-line tool, which deploys
//! sections of a shared git repository (usually a sparse checkout cloned into
//! a project as `.sharables/`) to target locations by linking or copying
//! them, and wraps the git operations used to publish edits back.
//!
//! ## Quick Example
//!
//! ```
//! use sharables::config;
//! use sharables::link::LinkMethod;
//!
//! let yaml = r#"
//! deployments:
//!   - section: cursor-rules
//!     target: .cursor/rules
//!   - section: scripts
//!     target: ~/.local/bin/shared
//!     method: copy
//! "#;
//! let parsed = config::parse(yaml).unwrap();
//! assert_eq!(parsed.deployments.len(), 2);
//! assert_eq!(parsed.deployments[0].method, LinkMethod::Link);
//! ```
//!
//! ## Modules
//!
//! - **Locating (`locator`)**: finds the sharables repository by walking up
//!   from the working directory.
//! - **Configuration (`config`)**: the `.sharables-deploy.yaml` mapping list.
//! - **Paths (`path`)**: resolves mapping targets against the home directory
//!   and the project root.
//! - **Linking (`link`)**: classifies a target and moves it to the deployed
//!   state, backing up foreign content and falling back to copying when a
//!   link cannot be created.
//! - **Orchestration (`deploy`)**: runs every mapping in order, isolating
//!   failures per mapping.
//! - **Version control (`git`)**: status, commit and push through an
//!   injectable command runner.
//! - **Output (`output`)**: markers and colors for terminal reports.

pub mod config;
pub mod deploy;
pub mod error;
pub mod git;
pub mod link;
pub mod locator;
pub mod output;
pub mod path;

#[cfg(test)]
mod path_proptest;
