//! Infrastructure adapters for Arfa.
//!
//! This crate implements the ports defined in `arfa_core::application::ports`
//! and holds everything that touches the outside world: the document and
//! session history a page renders into, the filesystem a project is
//! scaffolded onto, and the starter template itself.
//!
//! | Port             | Adapter                                   |
//! |------------------|-------------------------------------------|
//! | `Dom`            | [`MemoryDom`]                             |
//! | `History`        | [`MemoryHistory`]                         |
//! | `Filesystem`     | [`LocalFilesystem`], [`MemoryFilesystem`] |
//! | `TemplateSource` | [`BuiltinTemplate`], [`DirectoryTemplate`]|
//!
//! [`MemoryBrowser`] wires a router, document and history together the way
//! a host page does, and [`PagesDir`] builds route modules from a `pages/`
//! directory on disk.

pub mod browser;
pub mod dom;
pub mod filesystem;
pub mod history;
pub mod pages;
pub mod template;

// Re-export commonly used adapters
pub use browser::MemoryBrowser;
pub use dom::{MemoryDom, NodeId};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use history::MemoryHistory;
pub use pages::{PageFile, PageFileKind, PagesDir};
pub use template::{BuiltinTemplate, DirectoryTemplate};
