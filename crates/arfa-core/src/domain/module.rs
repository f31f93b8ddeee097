//! Route modules: what the host registers with the router.
//!
//! The host supplies an ordered list of `(file path, module)` pairs, the way
//! a bundler's glob import would. Special files are recognized by path
//! (`/404`, `/_app`, `*/_layout`); every other file is a page.

use std::fmt;
use std::rc::Rc;

use super::params::Params;
use super::vnode::Node;

/// Props handed to a page component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageProps {
    pub params: Params,
}

/// Props handed to a layout component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutProps {
    pub children: Node,
    pub params: Params,
}

/// Props handed to the app wrapper.
#[derive(Debug, Clone)]
pub struct AppProps {
    pub component: View,
    pub page_props: PageProps,
}

macro_rules! render_fn {
    ($(#[$meta:meta])* $name:ident, ($($arg:ty)?)) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name(Rc<dyn Fn($($arg)?) -> Node>);

        impl $name {
            pub fn new(render: impl Fn($($arg)?) -> Node + 'static) -> Self {
                Self(Rc::new(render))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(..)"))
            }
        }
    };
}

render_fn!(
    /// A zero-argument component returning an already composed tree.
    View,
    ()
);
render_fn!(PageComponent, (&PageProps));
render_fn!(LayoutComponent, (LayoutProps));
render_fn!(AppComponent, (AppProps));

impl View {
    /// A view that always returns a clone of `node`.
    pub fn of(node: Node) -> Self {
        Self::new(move || node.clone())
    }

    pub fn render(&self) -> Node {
        (self.0)()
    }
}

impl PageComponent {
    pub fn render(&self, props: &PageProps) -> Node {
        (self.0)(props)
    }
}

impl LayoutComponent {
    pub fn render(&self, props: LayoutProps) -> Node {
        (self.0)(props)
    }
}

impl AppComponent {
    pub fn render(&self, props: AppProps) -> Node {
        (self.0)(props)
    }
}

/// Access check attached to a layout, with the path to send visitors to
/// when it fails.
#[derive(Clone)]
pub struct RouteGuard {
    check: Rc<dyn Fn() -> bool>,
    redirect: String,
}

impl RouteGuard {
    pub fn new(check: impl Fn() -> bool + 'static, redirect: impl Into<String>) -> Self {
        Self {
            check: Rc::new(check),
            redirect: redirect.into(),
        }
    }

    pub fn allows(&self) -> bool {
        (self.check)()
    }

    pub fn redirect(&self) -> &str {
        &self.redirect
    }
}

impl fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteGuard")
            .field("redirect", &self.redirect)
            .finish_non_exhaustive()
    }
}

/// A layout component plus its optional guard.
#[derive(Debug, Clone)]
pub struct LayoutModule {
    component: LayoutComponent,
    guard: Option<RouteGuard>,
}

impl LayoutModule {
    pub fn new(render: impl Fn(LayoutProps) -> Node + 'static) -> Self {
        Self {
            component: LayoutComponent::new(render),
            guard: None,
        }
    }

    /// Protect every route under this layout.
    pub fn with_guard(
        mut self,
        check: impl Fn() -> bool + 'static,
        redirect: impl Into<String>,
    ) -> Self {
        self.guard = Some(RouteGuard::new(check, redirect));
        self
    }

    pub fn component(&self) -> &LayoutComponent {
        &self.component
    }

    pub fn guard(&self) -> Option<&RouteGuard> {
        self.guard.as_ref()
    }
}

/// The kind of a registered module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    Page,
    Layout,
    App,
}

impl ModuleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Layout => "layout",
            Self::App => "app wrapper",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered module.
#[derive(Debug, Clone)]
pub enum RouteModule {
    Page(PageComponent),
    Layout(LayoutModule),
    App(AppComponent),
}

impl RouteModule {
    pub fn kind(&self) -> ModuleKind {
        match self {
            Self::Page(_) => ModuleKind::Page,
            Self::Layout(_) => ModuleKind::Layout,
            Self::App(_) => ModuleKind::App,
        }
    }
}

/// Insertion-ordered mapping from file path to module.
///
/// Registering the same path twice replaces the earlier module but keeps its
/// position.
#[derive(Debug, Clone, Default)]
pub struct RouteModules {
    entries: Vec<(String, RouteModule)>,
}

impl RouteModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, path: impl Into<String>, render: impl Fn(&PageProps) -> Node + 'static) -> Self {
        self.with(path, RouteModule::Page(PageComponent::new(render)))
    }

    pub fn layout(self, path: impl Into<String>, layout: LayoutModule) -> Self {
        self.with(path, RouteModule::Layout(layout))
    }

    pub fn app(self, path: impl Into<String>, render: impl Fn(AppProps) -> Node + 'static) -> Self {
        self.with(path, RouteModule::App(AppComponent::new(render)))
    }

    pub fn with(mut self, path: impl Into<String>, module: RouteModule) -> Self {
        self.insert(path, module);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, module: RouteModule) {
        let path = path.into();
        match self.entries.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = module,
            None => self.entries.push((path, module)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteModule)> {
        self.entries.iter().map(|(p, m)| (p.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
