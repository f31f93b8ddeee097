//! Arfa Core - virtual DOM, file-based router and scaffolding use cases.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      arfa-cli / host page (driving)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  Router · Navigator · Renderer ·        │
//! │  ScaffoldService                        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  Dom · History · Filesystem ·           │
//! │  TemplateSource                         │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      arfa-adapters (Infrastructure)     │
//! │  MemoryDom · MemoryHistory ·            │
//! │  LocalFilesystem · BuiltinTemplate      │
//! └─────────────────────────────────────────┘
//!
//!   Domain layer (pure logic): Node, Props, RoutePattern, Params,
//!   RouteModules, ProjectName, StarterTemplate
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use arfa_core::prelude::*;
//!
//! let modules = RouteModules::new()
//!     .page("./pages/index.tsx", |_| h("h1", Props::new(), ["Home".into()]))
//!     .page("./pages/blog/[id].tsx", |p| {
//!         Node::text(format!("Post {}", p.params.get_str("id").unwrap_or("?")))
//!     });
//!
//! let router = Router::new(&modules).unwrap();
//! match router.resolve("/blog/42") {
//!     Resolution::Render(page) => assert_eq!(page.view.render(), Node::text("Post 42")),
//!     Resolution::Redirect { .. } => unreachable!(),
//! }
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GuardPolicy, Navigation, Navigator, Renderer, Resolution, Router, ScaffoldService,
        ports::{Dom, Filesystem, History, TemplateSource},
    };
    pub use crate::domain::{
        Component, DomEvent, EventHandler, LayoutModule, LayoutProps, Node, PageProps,
        ParamValue, Params, ProjectName, PropValue, Props, RouteModules, View, c, h,
    };
    pub use crate::error::{ArfaError, ArfaResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
