//! # WizGen Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout the WizGen scaffolder.
//! Every failure aborts the current scaffold immediately; nothing is retried and
//! nothing is rolled back. The caller receives a distinguishable error kind plus
//! the underlying message.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `WizardError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error kinds cover:
//! - Invalid project specifications (bad name, unknown project kind)
//! - Manifest lookup and read failures
//! - Template lookup and render failures
//! - Persistence failures raised by the project store
//! - Configuration and filesystem errors
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error kind
//! if !template.exists() {
//!     anyhow::bail!(WizardError::TemplateNotFound { path: template.to_path_buf() });
//! }
//!
//! // Stage context keeps the original kind reachable through downcasting
//! match scaffolder.scaffold(&spec) {
//!     Err(e) if e.downcast_ref::<WizardError>().map_or(false, |we| matches!(we, WizardError::TemplateNotFound { .. })) => {
//!         eprintln!("Template set is incomplete");
//!     }
//!     other => other?,
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the WizGen application.
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Invalid project specification: {0}")]
    InvalidSpec(String),

    #[error("Manifest '{id}' not found at '{}'", path.display())]
    ManifestNotFound { id: String, path: PathBuf },

    #[error("Failed to read manifest '{}': {reason}", path.display())]
    ManifestRead { path: PathBuf, reason: String },

    #[error("Template '{}' not found", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("Failed to render '{}': {reason}", path.display())]
    Render { path: PathBuf, reason: String },

    #[error("Project persistence failed: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
