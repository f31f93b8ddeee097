// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// Raised only for problems that are visible before anything is rendered or
/// written: mis-registered route modules, unusable route patterns, invalid
/// project names and broken starter templates. Everything that can go wrong
/// while the page is running degrades gracefully instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Route registration
    // ========================================================================
    #[error("module '{file}' is registered as a {found} but its file name makes it a {expected}")]
    ModuleKindMismatch {
        file: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("route pattern '{route}' could not be compiled: {reason}")]
    InvalidRoutePattern { route: String, reason: String },

    // ========================================================================
    // Scaffolding
    // ========================================================================
    #[error("invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("template '{template}' has no files")]
    EmptyTemplate { template: String },

    #[error("duplicate path in template: {path}")]
    DuplicatePath { path: String },

    #[error("absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("template '{template}' does not contain a package.json")]
    MissingManifest { template: String },

    #[error("package.json could not be patched: {reason}")]
    InvalidManifest { reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ModuleKindMismatch { file, expected, .. } => vec![
                format!("Register '{}' as a {}", file, expected),
                "Files named _layout are layouts, _app is the app wrapper, 404 is the not-found page"
                    .into(),
            ],
            Self::InvalidProjectName { .. } => vec![
                "Use only lowercase letters, numbers, and hyphens".into(),
                "Examples: my-arfa-app, blog, shop-2".into(),
            ],
            Self::EmptyTemplate { template } | Self::MissingManifest { template } => vec![
                format!("Template '{}' looks incomplete", template),
                "Point --template-dir at a directory containing a package.json".into(),
            ],
            Self::InvalidManifest { .. } => {
                vec!["Check that the template's package.json is a JSON object".into()]
            }
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } => ErrorCategory::Validation,
            Self::ModuleKindMismatch { .. } | Self::InvalidRoutePattern { .. } => {
                ErrorCategory::Registration
            }
            Self::EmptyTemplate { .. }
            | Self::DuplicatePath { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::MissingManifest { .. }
            | Self::InvalidManifest { .. } => ErrorCategory::Template,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Registration,
    Template,
}
