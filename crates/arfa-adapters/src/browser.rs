//! A headless host page.
//!
//! [`MemoryBrowser`] plays the part of the browser tab: it owns a
//! [`MemoryDom`] with a `<div id="root">` container and a
//! [`MemoryHistory`], renders every navigation into the container and feeds
//! clicks and back/forward moves to the [`Navigator`], the same way the
//! document-level listeners of a real page would.
//!
//! ```text
//!  click(node) ──► MemoryDom::dispatch ──► Navigator::handle_click
//!  back()      ──► MemoryHistory::back ──► Navigator::handle_pop_state
//!                                              │
//!                                              ▼
//!                              Renderer::mount(view, #root)
//! ```

use std::cell::Cell;
use std::rc::Rc;

use arfa_core::application::{Navigation, Navigator, Renderer, Router};
use arfa_core::domain::View;
use arfa_core::error::ArfaResult;
use tracing::{debug, instrument};

use crate::dom::{MemoryDom, NodeId};
use crate::history::MemoryHistory;

/// Router, document and history wired together.
pub struct MemoryBrowser {
    dom: MemoryDom,
    container: NodeId,
    navigator: Navigator<MemoryHistory>,
    renders: Rc<Cell<usize>>,
}

impl MemoryBrowser {
    /// Open `url` and render it, as a page load does.
    #[instrument(skip(router))]
    pub fn open(router: Router, url: &str) -> ArfaResult<Self> {
        let history = MemoryHistory::new(url)?;
        let dom = MemoryDom::new();
        let container = dom.create_root("div", "root");

        let renders = Rc::new(Cell::new(0));
        let renderer = Renderer::new(dom.clone());
        let count = renders.clone();
        let navigator = Navigator::new(router, history, move |view: View| {
            renderer.mount(&view, &container);
            count.set(count.get() + 1);
        });

        let browser = Self {
            dom,
            container,
            navigator,
            renders,
        };
        browser.navigator.start()?;
        Ok(browser)
    }

    /// Click `target`: element listeners run first, then the router's
    /// document listener. Returns whether the router took the click.
    pub fn click(&self, target: NodeId) -> bool {
        let event = self.dom.dispatch(target, "click");
        let handled = self.navigator.handle_click(&event);
        debug!(target = %target, handled, "click");
        handled
    }

    /// Click the first rendered link with this exact `href`.
    ///
    /// `None` when the current page has no such link.
    pub fn click_link(&self, href: &str) -> Option<bool> {
        let link = self.dom.find_link(self.container, href)?;
        Some(self.click(link))
    }

    /// Navigate as a link click would, pushing a history entry.
    pub fn navigate(&self, target: &str) -> ArfaResult<Navigation> {
        self.navigator.navigate_to(target, true)
    }

    /// Browser back button. `Ok(None)` at the start of the session.
    pub fn back(&self) -> ArfaResult<Option<Navigation>> {
        if !self.history().back() {
            return Ok(None);
        }
        self.navigator.handle_pop_state().map(Some)
    }

    /// Browser forward button. `Ok(None)` at the newest entry.
    pub fn forward(&self) -> ArfaResult<Option<Navigation>> {
        if !self.history().forward() {
            return Ok(None);
        }
        self.navigator.handle_pop_state().map(Some)
    }

    /// Markup currently inside the root container.
    pub fn html(&self) -> String {
        self.dom.inner_html(self.container)
    }

    /// Text currently inside the root container.
    pub fn text(&self) -> String {
        self.dom.text_content(self.container)
    }

    /// Path, query and fragment of the current history entry.
    pub fn location(&self) -> String {
        self.history().location()
    }

    pub fn dom(&self) -> &MemoryDom {
        &self.dom
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn history(&self) -> &MemoryHistory {
        self.navigator.history()
    }

    pub fn router(&self) -> &Router {
        self.navigator.router()
    }

    /// Completed renders since the page was opened, the initial one included.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }
}
