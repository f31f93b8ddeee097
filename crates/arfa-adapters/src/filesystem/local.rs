//! Disk-backed filesystem.

use std::io;
use std::path::Path;

use arfa_core::application::ApplicationError;
use arfa_core::application::ports::Filesystem;
use arfa_core::error::{ArfaError, ArfaResult};
use tracing::trace;

/// Writes projects to the real filesystem through `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ArfaResult<()> {
        trace!(path = %path.display(), "mkdir -p");
        std::fs::create_dir_all(path).map_err(|e| io_failure(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ArfaResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "write");
        std::fs::write(path, content).map_err(|e| io_failure(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_empty_dir(&self, path: &Path) -> bool {
        std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false)
    }

    fn remove_dir_all(&self, path: &Path) -> ArfaResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| io_failure(path, e, "remove directory"))
    }
}

fn io_failure(path: &Path, e: io::Error, operation: &str) -> ArfaError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
