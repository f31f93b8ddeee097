//! Unified error handling for Arfa Core.
//!
//! Wraps domain and application errors behind one type with user-actionable
//! suggestions and a display category.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Arfa Core operations.
#[derive(Debug, Error, Clone)]
pub enum ArfaError {
    /// Errors from the domain layer (registration and validation).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (navigation and scaffolding).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ArfaError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Run `arfa config path` to find the active config file".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Arfa".into(),
                "Please report this issue at: https://github.com/arfa-js/arfa/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Registration => ErrorCategory::Registration,
                crate::domain::ErrorCategory::Template => ErrorCategory::Template,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Registration,
    Template,
    Navigation,
    NotFound,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type ArfaResult<T> = Result<T, ArfaError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> ArfaResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> ArfaResult<T> {
        self.map_err(|e| ArfaError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
