//! DOM events as seen by handlers and the navigation controller.

use std::cell::Cell;

/// A dispatched DOM event.
///
/// The DOM backend fills in `anchor_href` with the `href` attribute of the
/// closest `<a>` ancestor of the event target (the target itself included),
/// which is all the navigation controller needs to decide on interception.
#[derive(Debug)]
pub struct DomEvent {
    kind: String,
    anchor_href: Option<String>,
    default_prevented: Cell<bool>,
}

impl DomEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            anchor_href: None,
            default_prevented: Cell::new(false),
        }
    }

    /// A click event whose target sits inside an anchor with this `href`.
    pub fn click_on_link(href: impl Into<String>) -> Self {
        Self::new("click").with_anchor_href(href)
    }

    pub fn with_anchor_href(mut self, href: impl Into<String>) -> Self {
        self.anchor_href = Some(href.into());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn anchor_href(&self) -> Option<&str> {
        self.anchor_href.as_deref()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
