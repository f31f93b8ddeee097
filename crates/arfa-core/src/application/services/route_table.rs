//! Route table: registered modules sorted into pages, layouts and the two
//! special files, plus pathname matching.
//!
//! ## Precedence
//!
//! | order | rule                                             |
//! |-------|--------------------------------------------------|
//! | 1     | static routes before dynamic ones                |
//! | 2     | more path segments first                         |
//! | 3     | registration order                               |
//!
//! Static routes only match their exact route path, so `/about/` falls
//! through to the dynamic routes and, failing those, the not-found page.

use std::cmp::Reverse;

use tracing::{debug, instrument};

use super::layouts::LayoutRegistry;
use crate::domain::{
    AppComponent, DomainError, ModuleKind, PageComponent, PagesRoot, Params, RouteFile,
    RouteModule, RouteModules, RouteRecord,
};

/// A matched route and its decoded parameters.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub record: &'a RouteRecord,
    pub params: Params,
}

/// Everything the router knows after registration.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
    layouts: LayoutRegistry,
    app: Option<AppComponent>,
    not_found: Option<PageComponent>,
}

impl RouteTable {
    /// Classify and compile every registered module.
    ///
    /// Fails only when a module's kind contradicts its file name or a pattern
    /// cannot be compiled.
    #[instrument(skip_all, fields(modules = modules.len(), root = root.as_str()))]
    pub fn build(modules: &RouteModules, root: &PagesRoot) -> Result<Self, DomainError> {
        let mut table = Self::default();

        for (file_path, module) in modules.iter() {
            let stripped = root.strip(file_path);
            match (RouteFile::classify(&stripped), module) {
                (RouteFile::NotFound, RouteModule::Page(page)) => {
                    table.not_found = Some(page.clone());
                }
                (RouteFile::App, RouteModule::App(app)) => {
                    table.app = Some(app.clone());
                }
                (RouteFile::Layout { dir }, RouteModule::Layout(layout)) => {
                    table.layouts.insert(dir, layout.clone());
                }
                (RouteFile::Page, RouteModule::Page(page)) => {
                    table
                        .routes
                        .push(RouteRecord::from_file(file_path, root, page.clone())?);
                }
                (file, module) => {
                    return Err(DomainError::ModuleKindMismatch {
                        file: file_path.to_owned(),
                        expected: expected_kind(&file).as_str(),
                        found: module.kind().as_str(),
                    });
                }
            }
        }

        table
            .routes
            .sort_by_key(|r| (r.is_dynamic(), Reverse(r.pattern().segment_count())));

        debug!(
            routes = table.routes.len(),
            layouts = table.layouts.len(),
            app = table.app.is_some(),
            not_found = table.not_found.is_some(),
            "route table built"
        );
        Ok(table)
    }

    /// Routes in precedence order.
    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        &self.layouts
    }

    pub fn app(&self) -> Option<&AppComponent> {
        self.app.as_ref()
    }

    pub fn not_found(&self) -> Option<&PageComponent> {
        self.not_found.as_ref()
    }

    /// Static routes by exact path, then dynamic routes in table order.
    pub fn match_path(&self, pathname: &str) -> Option<RouteMatch<'_>> {
        let exact = self
            .routes
            .iter()
            .find(|r| !r.is_dynamic() && r.route_path() == pathname);
        if let Some(record) = exact {
            return Some(RouteMatch {
                record,
                params: Params::new(),
            });
        }

        self.routes
            .iter()
            .filter(|r| r.is_dynamic())
            .find_map(|record| {
                record
                    .pattern()
                    .captures(pathname)
                    .map(|params| RouteMatch { record, params })
            })
    }
}

fn expected_kind(file: &RouteFile) -> ModuleKind {
    match file {
        RouteFile::NotFound | RouteFile::Page => ModuleKind::Page,
        RouteFile::Layout { .. } => ModuleKind::Layout,
        RouteFile::App => ModuleKind::App,
    }
}
