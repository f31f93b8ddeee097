//! Application services - orchestrate use cases.
//!
//! Routing (`RouteTable`, `Router`, `Navigator`), rendering (`Renderer`) and
//! project scaffolding (`ScaffoldService`).

pub mod layouts;
pub mod navigation;
pub mod renderer;
pub mod route_table;
pub mod router;
pub mod scaffold_service;

pub use layouts::{AppliedLayout, LayoutRegistry, ancestor_dirs, compose};
pub use navigation::{MAX_REDIRECTS, Navigation, Navigator, is_internal_link};
pub use renderer::Renderer;
pub use route_table::{RouteMatch, RouteTable};
pub use router::{
    ComposedPage, GuardPolicy, LayoutSummary, MatchReport, NOT_FOUND_PATH, Resolution,
    RouteSummary, Router, RouterBuilder, RouterSummary, builtin_not_found,
};
pub use scaffold_service::{PlannedFile, ScaffoldPlan, ScaffoldReport, ScaffoldService};
