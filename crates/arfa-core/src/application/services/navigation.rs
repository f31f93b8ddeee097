//! Navigation controller.
//!
//! Ties a [`Router`] to the session history and a render callback. Every
//! navigation runs to completion synchronously:
//!
//! 1. resolve the target against the history's origin
//! 2. resolve the pathname (following guard redirects)
//! 3. push or replace the history entry
//! 4. hand the composed [`View`] to the render callback
//!
//! History is updated *before* rendering, so a page reading the current URL
//! while rendering sees its own location.

use std::cell::{Cell, RefCell};

use tracing::{debug, instrument, warn};
use url::{Position, Url};

use super::router::{Resolution, Router};
use crate::application::ApplicationError;
use crate::application::ports::History;
use crate::domain::{DomEvent, Params, View};
use crate::error::ArfaResult;

/// Guard redirects followed before giving up.
pub const MAX_REDIRECTS: usize = 5;

/// What a finished navigation rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Final pathname, after redirects.
    pub pathname: String,
    /// Path, query and fragment written to history.
    pub location: String,
    /// Matched page file; `None` for the not-found page.
    pub file_path: Option<String>,
    pub params: Params,
    pub redirects: usize,
}

/// Whether a link target is handled client-side: same-origin absolute paths
/// only, protocol-relative `//host` links excluded.
pub fn is_internal_link(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//")
}

struct InFlight<'a>(&'a Cell<bool>);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Drives navigation for one router, history and render target.
pub struct Navigator<H: History> {
    router: Router,
    history: H,
    render: RefCell<Box<dyn FnMut(View)>>,
    in_flight: Cell<bool>,
}

impl<H: History> Navigator<H> {
    pub fn new(router: Router, history: H, render: impl FnMut(View) + 'static) -> Self {
        Self {
            router,
            history,
            render: RefCell::new(Box::new(render)),
            in_flight: Cell::new(false),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Render the current URL without touching history.
    pub fn start(&self) -> ArfaResult<Navigation> {
        let current = self.history.current_url();
        self.navigate_to(current.as_str(), false)
    }

    /// Re-render after a back/forward move.
    pub fn handle_pop_state(&self) -> ArfaResult<Navigation> {
        let current = self.history.current_url();
        self.navigate_to(current.as_str(), false)
    }

    /// Document-level click handler.
    ///
    /// Returns `true` when the click was intercepted. Navigation failures are
    /// logged rather than returned; the default action is still prevented.
    pub fn handle_click(&self, event: &DomEvent) -> bool {
        if event.kind() != "click" {
            return false;
        }
        let Some(href) = event.anchor_href() else {
            return false;
        };
        if !is_internal_link(href) {
            return false;
        }

        event.prevent_default();
        if let Err(err) = self.navigate_to(href, true) {
            warn!(href, error = %err, "link navigation failed");
        }
        true
    }

    /// Navigate to `target`, a path or absolute URL.
    #[instrument(skip(self), fields(redirects = tracing::field::Empty))]
    pub fn navigate_to(&self, target: &str, push: bool) -> ArfaResult<Navigation> {
        if self.in_flight.replace(true) {
            return Err(ApplicationError::NavigationInProgress.into());
        }
        let _in_flight = InFlight(&self.in_flight);

        let origin = self.origin()?;
        let mut url = join(&origin, target)?;
        let mut redirects = 0;

        let page = loop {
            match self.router.resolve(url.path()) {
                Resolution::Render(page) => break page,
                Resolution::Redirect { to, .. } => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(ApplicationError::RedirectLoop {
                            path: url.path().to_owned(),
                            limit: MAX_REDIRECTS,
                        }
                        .into());
                    }
                    debug!(from = url.path(), to = %to, "following guard redirect");
                    url = join(&origin, &to)?;
                }
            }
        };
        tracing::Span::current().record("redirects", redirects);

        let location = url[Position::BeforePath..].to_owned();
        if push {
            self.history.push_state(&location);
        } else if redirects > 0 {
            self.history.replace_state(&location);
        }

        let navigation = Navigation {
            pathname: page.pathname,
            location,
            file_path: page.file_path,
            params: page.params,
            redirects,
        };

        match self.render.try_borrow_mut() {
            Ok(mut render) => (*render)(page.view),
            Err(_) => return Err(ApplicationError::NavigationInProgress.into()),
        }

        debug!(pathname = %navigation.pathname, "navigation rendered");
        Ok(navigation)
    }

    fn origin(&self) -> ArfaResult<Url> {
        let current = self.history.current_url();
        current.join("/").map_err(|e| {
            ApplicationError::InvalidUrl {
                target: current.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

fn join(base: &Url, target: &str) -> ArfaResult<Url> {
    base.join(target).map_err(|e| {
        ApplicationError::InvalidUrl {
            target: target.to_owned(),
            reason: e.to_string(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use std::cell::OnceCell;
    use std::rc::{Rc, Weak};

    use super::*;
    use crate::application::ports::MockHistory;
    use crate::domain::{LayoutModule, Node, RouteModules};
    use crate::application::services::router::{GuardPolicy, builtin_not_found};
    use crate::error::ArfaError;

    fn history_at(url: &'static str) -> MockHistory {
        let mut history = MockHistory::new();
        history
            .expect_current_url()
            .returning(move || Url::parse(url).unwrap());
        history
    }

    fn modules() -> RouteModules {
        RouteModules::new()
            .page("./pages/index.tsx", |_| Node::text("home"))
            .page("./pages/about.tsx", |_| Node::text("about"))
            .page("./pages/login.tsx", |_| Node::text("login"))
            .page("./pages/blog/[id].tsx", |p| {
                Node::text(format!("post {}", p.params.get_str("id").unwrap_or("?")))
            })
    }

    fn recorder() -> (Rc<RefCell<Vec<Node>>>, impl FnMut(View) + 'static) {
        let rendered = Rc::new(RefCell::new(Vec::new()));
        let sink = rendered.clone();
        (rendered, move |view: View| sink.borrow_mut().push(view.render()))
    }

    // ── start / pop state ─────────────────────────────────────────────────

    #[test]
    fn start_renders_current_url_without_touching_history() {
        let mut history = history_at("http://localhost:5173/blog/3?x=1#top");
        history.expect_push_state().never();
        history.expect_replace_state().never();

        let (rendered, render) = recorder();
        let nav = Navigator::new(Router::new(&modules()).unwrap(), history, render);

        let result = nav.start().unwrap();
        assert_eq!(result.pathname, "/blog/3");
        assert_eq!(result.location, "/blog/3?x=1#top");
        assert_eq!(rendered.borrow().as_slice(), [Node::text("post 3")]);
    }

    #[test]
    fn pop_state_rerenders_without_push() {
        let mut history = history_at("http://localhost/about");
        history.expect_push_state().never();

        let (rendered, render) = recorder();
        let nav = Navigator::new(Router::new(&modules()).unwrap(), history, render);
        nav.handle_pop_state().unwrap();
        assert_eq!(rendered.borrow().as_slice(), [Node::text("about")]);
    }

    // ── links ─────────────────────────────────────────────────────────────

    #[test]
    fn internal_link_is_intercepted_and_pushed() {
        let mut history = history_at("http://localhost/");
        history
            .expect_push_state()
            .withf(|url| url == "/about?tab=2#team")
            .times(1)
            .return_const(());

        let (rendered, render) = recorder();
        let nav = Navigator::new(Router::new(&modules()).unwrap(), history, render);

        let event = DomEvent::click_on_link("/about?tab=2#team");
        assert!(nav.handle_click(&event));
        assert!(event.default_prevented());
        assert_eq!(rendered.borrow().as_slice(), [Node::text("about")]);
    }

    #[test]
    fn external_and_protocol_relative_links_are_ignored() {
        let mut history = history_at("http://localhost/");
        history.expect_push_state().never();
        let nav = Navigator::new(Router::new(&modules()).unwrap(), history, |_| {});

        for href in ["//cdn.example.com/x", "https://example.com/", "about", "#top"] {
            let event = DomEvent::click_on_link(href);
            assert!(!nav.handle_click(&event), "{href}");
            assert!(!event.default_prevented(), "{href}");
        }
        assert!(!nav.handle_click(&DomEvent::new("click")));
    }

    #[test]
    fn push_happens_before_render() {
        let order = Rc::new(RefCell::new(Vec::new()));

        let mut history = history_at("http://localhost/");
        let log = order.clone();
        history
            .expect_push_state()
            .returning_st(move |_| log.borrow_mut().push("push"));

        let log = order.clone();
        let nav = Navigator::new(Router::new(&modules()).unwrap(), history, move |_| {
            log.borrow_mut().push("render")
        });

        nav.navigate_to("/about", true).unwrap();
        assert_eq!(order.borrow().as_slice(), ["push", "render"]);
    }

    #[test]
    fn unmatched_path_renders_not_found_and_still_pushes() {
        let mut history = history_at("http://localhost/");
        history
            .expect_push_state()
            .withf(|url| url == "/nope")
            .times(1)
            .return_const(());

        let (rendered, render) = recorder();
        let nav = Navigator::new(Router::new(&modules()).unwrap(), history, render);

        let result = nav.navigate_to("/nope", true).unwrap();
        assert_eq!(result.file_path, None);
        assert!(result.params.is_empty());
        assert_eq!(
            rendered.borrow().as_slice(),
            [builtin_not_found()]
        );
    }

    // ── guards ────────────────────────────────────────────────────────────

    #[test]
    fn enforced_guard_redirect_is_pushed_in_place_of_target() {
        let modules = modules()
            .page("./pages/dashboard/index.tsx", |_| Node::text("dash"))
            .layout(
                "./pages/dashboard/_layout.tsx",
                LayoutModule::new(|p| p.children).with_guard(|| false, "/login"),
            );
        let router = Router::builder()
            .guard_policy(GuardPolicy::Enforce)
            .build(&modules)
            .unwrap();

        let mut history = history_at("http://localhost/");
        history
            .expect_push_state()
            .withf(|url| url == "/login")
            .times(1)
            .return_const(());

        let (rendered, render) = recorder();
        let nav = Navigator::new(router, history, render);

        let result = nav.navigate_to("/dashboard", true).unwrap();
        assert_eq!(result.pathname, "/login");
        assert_eq!(result.redirects, 1);
        assert_eq!(rendered.borrow().as_slice(), [Node::text("login")]);
    }

    #[test]
    fn start_redirect_replaces_current_entry() {
        let modules = modules().layout(
            "./pages/_layout.tsx",
            LayoutModule::new(|p| p.children).with_guard(|| false, "/about"),
        );
        let router = Router::builder()
            .guard_policy(GuardPolicy::Enforce)
            .build(&modules)
            .unwrap();

        let mut history = history_at("http://localhost/");
        history.expect_push_state().never();
        history.expect_replace_state().never();

        let nav = Navigator::new(router, history, |_| {});
        // The root layout guards every page, the redirect target included.
        let err = nav.start().unwrap_err();
        assert!(matches!(
            err,
            ArfaError::Application(ApplicationError::RedirectLoop { limit: MAX_REDIRECTS, .. })
        ));
    }

    // ── re-entrancy ───────────────────────────────────────────────────────

    #[test]
    fn navigation_from_render_callback_is_rejected() {
        let mut history = history_at("http://localhost/");
        history.expect_push_state().return_const(());

        let slot: Rc<OnceCell<Weak<Navigator<MockHistory>>>> = Rc::default();
        let inner: Rc<RefCell<Option<ArfaResult<Navigation>>>> = Rc::default();

        let (slot_in, inner_in) = (slot.clone(), inner.clone());
        let nav = Rc::new(Navigator::new(
            Router::new(&modules()).unwrap(),
            history,
            move |_| {
                if let Some(nav) = slot_in.get().and_then(Weak::upgrade) {
                    *inner_in.borrow_mut() = Some(nav.navigate_to("/about", true));
                }
            },
        ));
        slot.set(Rc::downgrade(&nav)).unwrap();

        nav.navigate_to("/", true).unwrap();
        assert!(matches!(
            inner.borrow_mut().take(),
            Some(Err(ArfaError::Application(
                ApplicationError::NavigationInProgress
            )))
        ));

        // The flag is cleared once the outer navigation finishes.
        assert!(nav.navigate_to("/about", true).is_ok());
    }
}
