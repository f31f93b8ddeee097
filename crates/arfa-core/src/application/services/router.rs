//! Router: the registered route table plus the page composition pipeline.
//!
//! ```text
//! pathname ─▶ match ─▶ page(params) ─▶ layouts (leaf → root) ─▶ _app ─▶ View
//!               │
//!               └─ no match ─▶ 404 page (or built-in) with layouts of /404
//! ```
//!
//! A router is built once from a [`RouteModules`] value and is immutable
//! afterwards; build a new one to change the registrations.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::layouts::{AppliedLayout, compose};
use super::route_table::RouteTable;
use crate::domain::{
    AppProps, Node, PageProps, PagesRoot, Params, Props, RouteModules, RouteRecord, View, h,
};
use crate::error::ArfaResult;

/// Pathname whose layouts wrap the not-found page.
pub const NOT_FOUND_PATH: &str = "/404";

/// What to do with layout guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardPolicy {
    /// Guards are never evaluated; every route renders.
    #[default]
    PassThrough,
    /// Guards are evaluated root to leaf; the first failing one redirects.
    Enforce,
}

impl GuardPolicy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PassThrough => "pass-through",
            Self::Enforce => "enforce",
        }
    }
}

impl std::fmt::Display for GuardPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully composed page ready for the render callback.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    pub pathname: String,
    /// File of the matched route; `None` when the not-found page rendered.
    pub file_path: Option<String>,
    pub params: Params,
    /// Directories of the applied layouts, outermost first.
    pub layouts: Vec<String>,
    pub view: View,
}

/// Outcome of resolving a pathname.
#[derive(Debug, Clone)]
pub enum Resolution {
    Render(ComposedPage),
    /// A guard on the layout of `guard_dir` refused access.
    Redirect { to: String, guard_dir: String },
}

/// Listing entry for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSummary {
    pub route: String,
    pub file: String,
    pub dynamic: bool,
    pub params: Vec<String>,
}

impl From<&RouteRecord> for RouteSummary {
    fn from(record: &RouteRecord) -> Self {
        Self {
            route: record.route_path().into(),
            file: record.file_path().into(),
            dynamic: record.is_dynamic(),
            params: record.param_names().into_iter().map(String::from).collect(),
        }
    }
}

/// Layout reference in listings and match reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutSummary {
    pub dir: String,
    /// Redirect target of the layout's guard, if it has one.
    pub guard_redirect: Option<String>,
}

impl From<&AppliedLayout<'_>> for LayoutSummary {
    fn from(layout: &AppliedLayout<'_>) -> Self {
        Self {
            dir: layout.dir.into(),
            guard_redirect: layout.module.guard().map(|g| g.redirect().to_owned()),
        }
    }
}

/// Everything registered with a router, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterSummary {
    pub routes: Vec<RouteSummary>,
    pub layouts: Vec<LayoutSummary>,
    pub app: bool,
    pub not_found: bool,
}

/// How a pathname would resolve, without rendering anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    pub pathname: String,
    /// Matched route; `None` means the not-found page.
    pub route: Option<RouteSummary>,
    pub params: Params,
    pub layouts: Vec<LayoutSummary>,
}

/// Builder for [`Router`].
#[derive(Debug, Clone, Default)]
pub struct RouterBuilder {
    pages_root: PagesRoot,
    guard_policy: GuardPolicy,
}

impl RouterBuilder {
    pub fn pages_root(mut self, root: impl Into<String>) -> Self {
        self.pages_root = PagesRoot::new(root);
        self
    }

    pub fn guard_policy(mut self, policy: GuardPolicy) -> Self {
        self.guard_policy = policy;
        self
    }

    pub fn build(self, modules: &RouteModules) -> ArfaResult<Router> {
        let table = RouteTable::build(modules, &self.pages_root)?;
        Ok(Router {
            table,
            guard_policy: self.guard_policy,
        })
    }
}

/// File-based router.
#[derive(Debug, Clone)]
pub struct Router {
    table: RouteTable,
    guard_policy: GuardPolicy,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::default()
    }

    /// Router with the default pages root and guards passed through.
    pub fn new(modules: &RouteModules) -> ArfaResult<Self> {
        Self::builder().build(modules)
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn guard_policy(&self) -> GuardPolicy {
        self.guard_policy
    }

    /// Match `pathname`, run guards and compose the page.
    #[instrument(skip(self), fields(policy = %self.guard_policy))]
    pub fn resolve(&self, pathname: &str) -> Resolution {
        let matched = self.table.match_path(pathname);
        let layouts = match &matched {
            Some(m) => {
                debug!(route = m.record.route_path(), "route matched");
                self.table.layouts().resolve(pathname)
            }
            None => {
                debug!("no route matched, rendering not-found page");
                self.table.layouts().resolve(NOT_FOUND_PATH)
            }
        };

        if let Some(redirect) = self.check_guards(&layouts) {
            return redirect;
        }

        let (file_path, page, params) = match matched {
            Some(m) => {
                let props = PageProps { params: m.params };
                let page = m.record.component().render(&props);
                (Some(m.record.file_path().to_owned()), page, props.params)
            }
            None => {
                let props = PageProps::default();
                let page = match self.table.not_found() {
                    Some(not_found) => not_found.render(&props),
                    None => builtin_not_found(),
                };
                (None, page, props.params)
            }
        };

        let composed = compose(page, &layouts, &params);
        let root = match self.table.app() {
            Some(app) => app.render(AppProps {
                component: View::of(composed),
                page_props: PageProps {
                    params: params.clone(),
                },
            }),
            None => composed,
        };

        Resolution::Render(ComposedPage {
            pathname: pathname.to_owned(),
            file_path,
            params,
            layouts: layouts.iter().map(|l| l.dir.to_owned()).collect(),
            view: View::of(root),
        })
    }

    fn check_guards(&self, layouts: &[AppliedLayout<'_>]) -> Option<Resolution> {
        for layout in layouts {
            let Some(guard) = layout.module.guard() else {
                continue;
            };
            match self.guard_policy {
                GuardPolicy::PassThrough => {
                    debug!(dir = layout.dir, "guard not evaluated (pass-through)");
                }
                GuardPolicy::Enforce => {
                    if !guard.allows() {
                        info!(dir = layout.dir, to = guard.redirect(), "guard refused access");
                        return Some(Resolution::Redirect {
                            to: guard.redirect().to_owned(),
                            guard_dir: layout.dir.to_owned(),
                        });
                    }
                }
            }
        }
        None
    }

    /// Registered routes in precedence order.
    pub fn routes(&self) -> Vec<RouteSummary> {
        self.table.routes().iter().map(RouteSummary::from).collect()
    }

    pub fn summary(&self) -> RouterSummary {
        let layouts = self
            .table
            .layouts()
            .dirs()
            .filter_map(|dir| {
                self.table.layouts().get(dir).map(|module| {
                    LayoutSummary::from(&AppliedLayout { dir, module })
                })
            })
            .collect();

        RouterSummary {
            routes: self.routes(),
            layouts,
            app: self.table.app().is_some(),
            not_found: self.table.not_found().is_some(),
        }
    }

    /// Describe how `pathname` would resolve. Guards are reported, not run.
    pub fn inspect(&self, pathname: &str) -> MatchReport {
        let (route, params, layouts) = match self.table.match_path(pathname) {
            Some(m) => (
                Some(RouteSummary::from(m.record)),
                m.params,
                self.table.layouts().resolve(pathname),
            ),
            None => (None, Params::new(), self.table.layouts().resolve(NOT_FOUND_PATH)),
        };

        MatchReport {
            pathname: pathname.to_owned(),
            route,
            params,
            layouts: layouts.iter().map(LayoutSummary::from).collect(),
        }
    }
}

/// Fallback rendered when no `404` page is registered.
pub fn builtin_not_found() -> Node {
    h("div", Props::new(), ["404 - Not Found".into()])
}
