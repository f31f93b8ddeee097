//! In-memory filesystem for tests and dry runs.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use arfa_core::application::ApplicationError;
use arfa_core::application::ports::Filesystem;
use arfa_core::error::ArfaResult;

/// Files and directories held in a shared map.
///
/// Clones share the same contents. Writing requires the parent directory to
/// exist, as on disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
}

impl Inner {
    fn has_entries(&self, dir: &Path) -> bool {
        self.files.keys().any(|p| p.parent() == Some(dir))
            || self.directories.iter().any(|p| p.parent() == Some(dir))
    }
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self, path: &Path) -> ArfaResult<RwLockReadGuard<'_, Inner>> {
        self.inner.read().map_err(|_| poisoned(path))
    }

    fn write(&self, path: &Path) -> ArfaResult<RwLockWriteGuard<'_, Inner>> {
        self.inner.write().map_err(|_| poisoned(path))
    }

    pub fn read_file(&self, path: &Path) -> Option<String> {
        self.read(path).ok()?.files.get(path).cloned()
    }

    /// Every file path, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.read(path)
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }
}

fn poisoned(path: &Path) -> arfa_core::error::ArfaError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: "in-memory filesystem lock poisoned".into(),
    }
    .into()
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> ArfaResult<()> {
        let mut inner = self.write(path)?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> ArfaResult<()> {
        let mut inner = self.write(path)?;
        let orphan = path
            .parent()
            .is_some_and(|parent| !parent.as_os_str().is_empty() && !inner.directories.contains(parent));
        if orphan {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Parent directory does not exist".into(),
            }
            .into());
        }
        inner.files.insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read(path)
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_empty_dir(&self, path: &Path) -> bool {
        self.read(path)
            .map(|inner| inner.directories.contains(path) && !inner.has_entries(path))
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> ArfaResult<()> {
        let mut inner = self.write(path)?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }
}
