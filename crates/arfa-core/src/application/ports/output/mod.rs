//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from the host page and
//! from the machine running the scaffolder. The `arfa-adapters` crate
//! provides implementations.

use std::path::Path;

use url::Url;

use crate::domain::{EventHandler, StarterTemplate};
use crate::error::ArfaResult;

/// Port for the document the renderer writes into.
///
/// Implemented by:
/// - `arfa_adapters::dom::MemoryDom` (in-memory document tree)
///
/// Operations mirror the handful of DOM calls the renderer makes and are
/// infallible, like their browser counterparts.
pub trait Dom {
    /// Handle to a node owned by the document.
    type Node: Clone;

    fn create_element(&self, tag: &str) -> Self::Node;

    fn create_text(&self, text: &str) -> Self::Node;

    /// A container whose children move into the parent on append.
    fn create_fragment(&self) -> Self::Node;

    fn set_attribute(&self, element: &Self::Node, name: &str, value: &str);

    fn add_event_listener(&self, element: &Self::Node, event: &str, handler: EventHandler);

    fn append_child(&self, parent: &Self::Node, child: &Self::Node);

    /// Remove every child of `parent`.
    fn clear_children(&self, parent: &Self::Node);
}

/// Port for the session history.
///
/// Implemented by:
/// - `arfa_adapters::history::MemoryHistory` (back/forward stack)
#[cfg_attr(test, mockall::automock)]
pub trait History {
    /// The URL of the current entry.
    fn current_url(&self) -> Url;

    /// Append a new entry; `url` is a path plus optional query and fragment.
    fn push_state(&self, url: &str);

    /// Overwrite the current entry.
    fn replace_state(&self, url: &str);
}

/// Port for filesystem operations used while scaffolding.
///
/// Implemented by:
/// - `arfa_adapters::filesystem::LocalFilesystem` (production)
/// - `arfa_adapters::filesystem::MemoryFilesystem` (testing)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> ArfaResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> ArfaResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory without entries.
    fn is_empty_dir(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> ArfaResult<()>;
}

/// Port for loading the starter template.
///
/// Implemented by:
/// - `arfa_adapters::template::BuiltinTemplate` (embedded starter)
/// - `arfa_adapters::template::DirectoryTemplate` (a template directory on disk)
pub trait TemplateSource: Send + Sync {
    /// Human-readable name for logs and messages.
    fn name(&self) -> &str;

    fn load(&self) -> ArfaResult<StarterTemplate>;
}
