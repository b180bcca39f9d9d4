//! # Error Handling
//!
//! This module defines the centralized error type for the `sharables`
//! library. It uses `thiserror` to describe every anticipated failure mode
//! with a message that can be shown to the user as-is.
//!
//! Errors fall into two groups:
//!
//! - **Setup errors** (`RepositoryNotFound`, `NotAVersionControlledDirectory`,
//!   `ConfigMissing`, `ConfigEmpty`, `ConfigParse`, `ToolNotFound`) abort the
//!   whole invocation.
//! - **Per-mapping errors** (`SectionMissing`, `PrivilegeDenied`,
//!   `IoFailure`) are caught by the deployment orchestrator, reported for the
//!   mapping that raised them, and processing continues with the next mapping.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sharables operations
#[derive(Error, Debug)]
pub enum Error {
    /// No sharables repository was found, either by upward search or at an
    /// explicitly supplied path.
    #[error("Sharables directory not found: {}", path.display())]
    RepositoryNotFound { path: PathBuf },

    /// The sharables directory exists but has no `.git` metadata.
    #[error("Not a git repository: {}", path.display())]
    NotAVersionControlledDirectory { path: PathBuf },

    /// The deployment configuration file does not exist.
    #[error("Config file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    /// The deployment configuration has no deployments.
    #[error("No deployments found in config: {}", path.display())]
    ConfigEmpty { path: PathBuf },

    /// Refusing to replace an existing configuration file.
    #[error("Config file already exists: {} (use --force to overwrite)", path.display())]
    ConfigExists { path: PathBuf },

    /// The deployment configuration could not be parsed.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A mapping names a section that is not present in the repository.
    #[error("Section not found: {section}")]
    SectionMissing { section: String },

    /// The platform refused to create a link.
    #[error("Insufficient privileges to create link at {}: {message}", path.display())]
    PrivilegeDenied { path: PathBuf, message: String },

    /// A filesystem operation on a deployment target failed.
    #[error("I/O failure at {}: {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external executable could not be started.
    #[error("{tool} not found. Please install {tool}.")]
    ToolNotFound { tool: String },

    /// A git invocation exited unsuccessfully.
    #[error("Git command failed: git {command} - {stderr}")]
    GitCommand { command: String, stderr: String },

    /// A path could not be resolved.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Wrap an I/O error with the path it happened at.
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoFailure {
            path: path.into(),
            source,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
