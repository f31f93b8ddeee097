//! Core domain layer for Arfa.
//!
//! Pure logic with no I/O: the virtual DOM model, route patterns and
//! parameters, route modules, and the value objects used when scaffolding a
//! new project. Rendering into a real document and touching the filesystem
//! happen behind the ports in `crate::application::ports`.

pub mod error;
pub mod events;
pub mod manifest;
pub mod module;
pub mod params;
pub mod project;
pub mod props;
pub mod route;
pub mod template;
pub mod vnode;

pub use error::{DomainError, ErrorCategory};
pub use events::DomEvent;
pub use manifest::patch_package_json;
pub use module::{
    AppComponent, AppProps, LayoutComponent, LayoutModule, LayoutProps, ModuleKind,
    PageComponent, PageProps, RouteGuard, RouteModule, RouteModules, View,
};
pub use params::{ParamValue, Params};
pub use project::{DEFAULT_PROJECT_NAME, ProjectName};
pub use props::{EventHandler, PropBinding, PropValue, Props};
pub use route::{
    DEFAULT_PAGES_ROOT, PagesRoot, RouteFile, RoutePattern, RouteRecord, RouteSegment,
};
pub use template::{MANIFEST_FILE, RelativePath, StarterTemplate, TemplateFile};
pub use vnode::{Component, Node, c, h};
