//! Error handling for the Arfa CLI.
//!
//! Every command returns [`CliResult`]. `main` turns a [`CliError`] into a
//! coloured or plain message with suggestions, then into an exit code:
//!
//! | Code | Meaning                                          |
//! |------|--------------------------------------------------|
//! |  0   | Success, or the user cancelled a prompt          |
//! |  1   | Invalid input, existing project, internal error  |
//! |  2   | Argument parse error (clap, before dispatch)     |
//! |  3   | Resource not found                               |
//! |  4   | Configuration error                              |

use std::error::Error;
use std::path::PathBuf;

use arfa_core::error::ArfaError;
use owo_colors::OwoColorize;
use thiserror::Error;

pub use arfa_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input (validation failed).
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Target directory exists and has files in it.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An unknown dotted key passed to `arfa config get`.
    #[error("Unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    // ── Core errors ────────────────────────────────────────────────────────
    /// An error propagated from `arfa-core` or its adapters.
    #[error("{0}")]
    Core(#[from] ArfaError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The user backed out of a prompt.
    #[error("Operation cancelled")]
    Cancelled,

    /// Interactive prompt requested in a build without `interactive`.
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// User-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {}", message),
                "Use --help for usage information".into(),
            ],

            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already has files in it", path.display()),
                "Choose a different project name".into(),
                format!("Or empty the directory: rm -rf {}", path.display()),
            ],

            Self::InvalidProjectName { name, reason } => vec![
                format!("Project name '{}' is invalid: {}", name, reason),
                "Use only lowercase letters, numbers, and hyphens".into(),
                "Examples: my-arfa-app, blog, shop-2".into(),
            ],

            Self::ConfigError { message, .. } => vec![
                format!("Configuration issue: {}", message),
                "Run `arfa config path` to find the config file".into(),
                "Environment overrides use ARFA_<SECTION>__<KEY>".into(),
            ],

            Self::UnknownConfigKey { key } => vec![
                format!("'{}' is not a configuration key", key),
                "List every key with: arfa config list".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {}", message),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],

            Self::Cancelled => vec!["No changes were made".into()],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{}' feature is not available in this build", feature),
                "Pass the project name and --yes instead".into(),
                format!("Or reinstall: cargo install arfa-cli --features {}", feature),
            ],
        }
    }

    /// The error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } => ErrorCategory::UserError,
            Self::ProjectExists { .. } => ErrorCategory::UserError,
            Self::InvalidProjectName { .. } => ErrorCategory::UserError,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::UnknownConfigKey { .. } => ErrorCategory::UserError,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation
                | CoreCategory::Registration
                | CoreCategory::Template
                | CoreCategory::Navigation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::FeatureNotAvailable { .. } => ErrorCategory::Configuration,
        }
    }

    /// Exit code to pass to the OS.
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Cancelled => 0,
            ErrorCategory::UserError | ErrorCategory::Internal => 1,
            ErrorCategory::NotFound => 3,
            ErrorCategory::Configuration => 4,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        if self.category() == ErrorCategory::Cancelled {
            return format!("{} {}\n", "\u{26a0}".yellow().bold(), self.yellow());
        }

        let mut output = String::new();
        output.push_str(&format!(
            "\n{} {}\n\n",
            "\u{2717}".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "\u{2192}".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {}\n", suggestion));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`].
    pub fn format_plain(&self, verbose: bool) -> String {
        if self.category() == ErrorCategory::Cancelled {
            return format!("{self}\n");
        }

        let mut out = format!("\nError: {self}\n");

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::Cancelled => tracing::info!("Cancelled by user"),
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
    /// User backed out; not a failure.
    Cancelled,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Converts foreign error types into [`CliError`] at call-sites, attaching
/// a context message.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for anyhow::Result<T> {
    /// Context becomes the message; the anyhow chain becomes the source.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::ConfigError {
            message: f().into(),
            source: Some(e.into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use arfa_core::application::ApplicationError;
    use arfa_core::domain::DomainError;

    use super::*;

    // ── suggestions ───────────────────────────────────────────────────────

    #[test]
    fn project_exists_suggests_another_name() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/test"),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("different")));
    }

    #[test]
    fn invalid_name_suggestions_show_examples() {
        let err = CliError::InvalidProjectName {
            name: "My App".into(),
            reason: "uppercase".into(),
        };
        assert!(err.suggestions().iter().any(|s| s.contains("my-arfa-app")));
    }

    #[test]
    fn core_suggestions_pass_through() {
        let core = ArfaError::from(ApplicationError::NotFound {
            path: PathBuf::from("src/pages"),
        });
        let expected = core.suggestions();
        assert_eq!(CliError::Core(core).suggestions(), expected);
    }

    // ── exit codes ────────────────────────────────────────────────────────

    #[test]
    fn exit_code_user_error() {
        assert_eq!(
            CliError::InvalidInput {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            1
        );
        assert_eq!(
            CliError::ProjectExists {
                path: PathBuf::from("x")
            }
            .exit_code(),
            1
        );
    }

    #[test]
    fn exit_code_cancelled_is_success() {
        assert_eq!(CliError::Cancelled.exit_code(), 0);
    }

    #[test]
    fn exit_code_core_not_found() {
        let err = CliError::Core(
            ApplicationError::NotFound {
                path: PathBuf::from("pages"),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn exit_code_core_validation() {
        let err = CliError::Core(
            DomainError::InvalidProjectName {
                name: "A".into(),
                reason: "uppercase".into(),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn exit_code_configuration() {
        assert_eq!(
            CliError::ConfigError {
                message: "x".into(),
                source: None
            }
            .exit_code(),
            4
        );
    }

    #[test]
    fn exit_code_internal() {
        assert_eq!(
            CliError::IoError {
                message: "x".into(),
                source: io::Error::other("e"),
            }
            .exit_code(),
            1
        );
    }

    // ── format ────────────────────────────────────────────────────────────

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("/tmp/x"),
        };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
    }

    #[test]
    fn format_plain_verbose_shows_chain() {
        let err = CliError::IoError {
            message: "writing".into(),
            source: io::Error::other("disk full"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk full"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn cancelled_is_a_single_line() {
        assert_eq!(CliError::Cancelled.format_plain(false), "Operation cancelled\n");
    }

    // ── IntoCli ───────────────────────────────────────────────────────────

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }

    #[test]
    fn into_cli_anyhow_is_configuration() {
        let result: anyhow::Result<()> = Err(anyhow::anyhow!("bad toml"));
        let err = result.with_cli_context(|| "serializing").unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
