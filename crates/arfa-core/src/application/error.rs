//! Application layer errors.
//!
//! Failures of orchestration (navigating, scaffolding), as opposed to the
//! registration and validation problems in `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A navigation target could not be resolved into a URL.
    #[error("Cannot navigate to '{target}': {reason}")]
    InvalidUrl { target: String, reason: String },

    /// Guards kept redirecting.
    #[error("Redirect loop at '{path}' (more than {limit} redirects)")]
    RedirectLoop { path: String, limit: usize },

    /// Navigation was requested while another one was still rendering.
    #[error("Navigation requested while another navigation is in progress")]
    NavigationInProgress,

    /// A pages directory or template directory does not exist.
    #[error("Not found: {path}")]
    NotFound { path: PathBuf },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A starter template could not be read.
    #[error("Template could not be loaded: {reason}")]
    TemplateLoad { reason: String },

    /// Target directory exists and is not empty.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// Rollback failed (best-effort cleanup failed).
    #[error("Rollback failed for {path}: {reason}")]
    RollbackFailed { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidUrl { .. } => vec![
                "Use an absolute path such as /about or a full URL".into(),
            ],
            Self::RedirectLoop { path, .. } => vec![
                format!("Check the guard protecting '{}'", path),
                "A guard's redirect target must not be protected by the same guard".into(),
            ],
            Self::NavigationInProgress => vec![
                "Trigger navigation from an event handler, not while rendering".into(),
            ],
            Self::NotFound { path } => vec![
                format!("Check that '{}' exists", path.display()),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::TemplateLoad { .. } => vec![
                "Check the --template-dir path".into(),
                "Omit --template-dir to use the built-in starter".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory already exists and is not empty: {}", path.display()),
                "Choose a different project name".into(),
            ],
            Self::RollbackFailed { path, .. } => vec![
                format!("Remove '{}' manually before retrying", path.display()),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidUrl { .. }
            | Self::RedirectLoop { .. }
            | Self::NavigationInProgress => ErrorCategory::Navigation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::ProjectExists { .. } => ErrorCategory::Validation,
            Self::TemplateLoad { .. } => ErrorCategory::Template,
            Self::FilesystemError { .. } | Self::RollbackFailed { .. } => ErrorCategory::Internal,
        }
    }
}
