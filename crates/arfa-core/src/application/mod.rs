//! Application layer for Arfa.
//!
//! This layer contains:
//! - **Services**: routing, navigation, rendering and scaffolding use cases
//! - **Ports**: traits for the document, history, filesystem and templates
//! - **Errors**: application-specific error types
//!
//! Business rules (pattern syntax, classification, validation) live in
//! `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    ComposedPage, GuardPolicy, MAX_REDIRECTS, MatchReport, Navigation, Navigator, Renderer,
    Resolution, RouteSummary, RouteTable, Router, RouterBuilder, RouterSummary, ScaffoldPlan,
    ScaffoldReport, ScaffoldService,
};

pub use ports::{Dom, Filesystem, History, TemplateSource};

pub use error::ApplicationError;
