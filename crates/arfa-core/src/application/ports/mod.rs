//! Application ports (traits) for external dependencies.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the application, implemented by
//!   infrastructure
//!   - `Dom`: element creation and mutation
//!   - `History`: current URL and push/replace
//!   - `Filesystem`: file operations for scaffolding
//!   - `TemplateSource`: starter template loading
//!
//! - **Driving (Input) Ports**: the `Router`, `Navigator` and
//!   `ScaffoldService` APIs themselves

pub mod output;

pub use output::{Dom, Filesystem, History, TemplateSource};

#[cfg(test)]
pub use output::MockHistory;
