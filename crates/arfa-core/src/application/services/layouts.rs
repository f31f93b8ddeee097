//! Layout lookup and composition.
//!
//! Layouts are keyed by the directory that owns the `_layout` file. For a
//! pathname the candidate directories are its ancestors, root first:
//!
//! ```text
//! /dashboard/settings  ->  /   /dashboard   /dashboard/settings
//! ```
//!
//! Matching layouts wrap the page innermost-last, so the root layout ends up
//! outermost.

use std::collections::BTreeMap;

use tracing::trace;

use crate::domain::route::path_segments;
use crate::domain::{LayoutModule, LayoutProps, Node, Params};

/// A layout that applies to a pathname, with the directory it came from.
#[derive(Debug, Clone, Copy)]
pub struct AppliedLayout<'a> {
    pub dir: &'a str,
    pub module: &'a LayoutModule,
}

/// Registered layouts by owning directory.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, LayoutModule>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layout; a later layout for the same directory wins.
    pub fn insert(&mut self, dir: impl Into<String>, layout: LayoutModule) {
        self.layouts.insert(dir.into(), layout);
    }

    pub fn get(&self, dir: &str) -> Option<&LayoutModule> {
        self.layouts.get(dir)
    }

    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layouts applying to `pathname`, outermost first.
    pub fn resolve(&self, pathname: &str) -> Vec<AppliedLayout<'_>> {
        ancestor_dirs(pathname)
            .into_iter()
            .filter_map(|dir| {
                self.layouts
                    .get_key_value(dir.as_str())
                    .map(|(dir, module)| AppliedLayout { dir, module })
            })
            .collect()
    }
}

/// `/` followed by every cumulative prefix of `pathname`, the full path
/// included.
pub fn ancestor_dirs(pathname: &str) -> Vec<String> {
    let mut dirs = vec!["/".to_owned()];
    let mut acc = String::new();
    for segment in path_segments(pathname) {
        acc.push('/');
        acc.push_str(segment);
        dirs.push(acc.clone());
    }
    dirs
}

/// Wrap `page` in `layouts` (outermost first), leaf layout applied first.
pub fn compose(page: Node, layouts: &[AppliedLayout<'_>], params: &Params) -> Node {
    layouts.iter().rev().fold(page, |children, layout| {
        trace!(dir = layout.dir, "applying layout");
        layout.module.component().render(LayoutProps {
            children,
            params: params.clone(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Props, h};

    fn wrapper(tag: &'static str) -> LayoutModule {
        LayoutModule::new(move |p| h(tag, Props::new(), [p.children]))
    }

    #[test]
    fn ancestors_include_root_and_full_path() {
        assert_eq!(ancestor_dirs("/"), ["/"]);
        assert_eq!(ancestor_dirs("/a/b"), ["/", "/a", "/a/b"]);
        assert_eq!(ancestor_dirs("/a//b/"), ["/", "/a", "/a/b"]);
    }

    #[test]
    fn resolve_returns_outermost_first() {
        let mut registry = LayoutRegistry::new();
        registry.insert("/dashboard", wrapper("section"));
        registry.insert("/", wrapper("main"));

        let dirs: Vec<_> = registry
            .resolve("/dashboard/settings")
            .iter()
            .map(|l| l.dir)
            .collect();
        assert_eq!(dirs, ["/", "/dashboard"]);

        let dirs: Vec<_> = registry.resolve("/about").iter().map(|l| l.dir).collect();
        assert_eq!(dirs, ["/"]);
    }

    #[test]
    fn root_layout_ends_up_outermost() {
        let mut registry = LayoutRegistry::new();
        registry.insert("/", wrapper("main"));
        registry.insert("/dashboard", wrapper("section"));

        let layouts = registry.resolve("/dashboard");
        let composed = compose(Node::text("page"), &layouts, &Params::new());

        let expected = h(
            "main",
            Props::new(),
            [h("section", Props::new(), [Node::text("page")])],
        );
        assert_eq!(composed, expected);
    }

    #[test]
    fn layouts_receive_params() {
        let mut registry = LayoutRegistry::new();
        registry.insert(
            "/",
            LayoutModule::new(|p| Node::text(p.params.get_str("id").unwrap_or("none"))),
        );
        let params = Params::from([("id", crate::domain::ParamValue::One("9".into()))]);
        let composed = compose(Node::Empty, &registry.resolve("/x"), &params);
        assert_eq!(composed, Node::text("9"));
    }
}
