//! Starter templates: the file tree copied into a new project.

use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use super::error::DomainError;

/// The file that gets patched with the project name.
pub const MANIFEST_FILE: &str = "package.json";

/// A path that stays inside the project root.
///
/// Absolute paths and `..` components are rejected so a template can never
/// write outside the directory it is copied into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));

        if path.is_absolute() || escapes {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        Ok(Self(path))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One file of a starter template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: RelativePath,
    pub content: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Result<Self, DomainError> {
        Ok(Self {
            path: RelativePath::try_new(path)?,
            content: content.into(),
        })
    }

    pub fn is_manifest(&self) -> bool {
        self.path.as_path() == Path::new(MANIFEST_FILE)
    }
}

/// A complete starter template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterTemplate {
    pub name: String,
    pub files: Vec<TemplateFile>,
}

impl StarterTemplate {
    pub fn new(name: impl Into<String>, files: Vec<TemplateFile>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    /// Check the template is non-empty, has unique paths and carries a
    /// top-level `package.json`.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.files.is_empty() {
            return Err(DomainError::EmptyTemplate {
                template: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.path.as_path()) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }

        if !self.files.iter().any(TemplateFile::is_manifest) {
            return Err(DomainError::MissingManifest {
                template: self.name.clone(),
            });
        }

        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Distinct parent directories, shallowest first.
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = self
            .files
            .iter()
            .flat_map(|f| f.path.as_path().ancestors().skip(1))
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        dirs.sort_by_key(|p| (p.components().count(), p.to_path_buf()));
        dirs.dedup();
        dirs
    }
}
