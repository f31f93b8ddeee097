//! Starter templates read from a directory on disk.
//!
//! Every regular file under the root becomes a template file, keyed by its
//! path relative to the root with `/` separators:
//!
//! ```text
//! my-template/
//! ├── package.json        ← required
//! ├── index.html
//! ├── node_modules/       ← skipped
//! └── src/
//!     └── pages/
//!         └── index.tsx
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use arfa_core::application::ApplicationError;
use arfa_core::application::ports::TemplateSource;
use arfa_core::domain::{StarterTemplate, TemplateFile};
use arfa_core::error::ArfaResult;
use tracing::{debug, instrument, warn};
use walkdir::{DirEntry, WalkDir};

/// Directory names never copied into a new project.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist"];

/// Loads a template from `root`.
#[derive(Debug, Clone)]
pub struct DirectoryTemplate {
    root: PathBuf,
    name: String,
}

impl DirectoryTemplate {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { root, name }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

/// `a\b` on Windows becomes `a/b`.
fn normalize(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl TemplateSource for DirectoryTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn load(&self) -> ArfaResult<StarterTemplate> {
        if !self.root.is_dir() {
            return Err(ApplicationError::NotFound {
                path: self.root.clone(),
            }
            .into());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e));

        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::TemplateLoad {
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(&self.root).map_err(|e| {
                ApplicationError::TemplateLoad {
                    reason: e.to_string(),
                }
            })?;
            let content = match fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!(path = %entry.path().display(), "skipping non UTF-8 file");
                    continue;
                }
                Err(e) => {
                    return Err(ApplicationError::FilesystemError {
                        path: entry.path().to_path_buf(),
                        reason: e.to_string(),
                    }
                    .into());
                }
            };
            files.push(TemplateFile::new(normalize(relative), content)?);
        }

        debug!(files = files.len(), "loaded template directory");
        Ok(StarterTemplate::new(self.name.clone(), files))
    }
}
