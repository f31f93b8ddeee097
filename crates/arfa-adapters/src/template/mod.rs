//! Starter template sources.

mod builtin;
mod directory;

pub use builtin::{BuiltinTemplate, STARTER_FILES};
pub use directory::DirectoryTemplate;
