use std::fmt;

use super::error::DomainError;

/// Name used when the user does not pick one.
pub const DEFAULT_PROJECT_NAME: &str = "my-arfa-app";

/// A validated project name.
///
/// Only lowercase ASCII letters, digits and hyphens are accepted, which keeps
/// the name usable both as a directory and as an npm package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();

        if name.is_empty() {
            return Err(DomainError::InvalidProjectName {
                name,
                reason: "name cannot be empty".into(),
            });
        }

        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(DomainError::InvalidProjectName {
                reason: format!("character '{bad}' is not allowed"),
                name,
            });
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ProjectName {
    fn default() -> Self {
        Self(DEFAULT_PROJECT_NAME.into())
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
