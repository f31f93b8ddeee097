//! Virtual DOM materialization.
//!
//! There is no diffing: [`Renderer::mount`] clears the container and builds
//! the whole tree again on every navigation. Pages are small and rebuilt
//! from scratch anyway, so node identity is never carried across renders.

use tracing::trace;

use crate::application::ports::Dom;
use crate::domain::{Node, PropBinding, Props, View};

/// Writes virtual trees into a [`Dom`].
#[derive(Debug, Clone)]
pub struct Renderer<D: Dom> {
    dom: D,
}

impl<D: Dom> Renderer<D> {
    pub fn new(dom: D) -> Self {
        Self { dom }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Append the materialized `node` to `container`.
    pub fn render(&self, node: &Node, container: &D::Node) {
        let created = self.create(node);
        self.dom.append_child(container, &created);
    }

    /// Replace the contents of `container` with `view`'s tree.
    pub fn mount(&self, view: &View, container: &D::Node) {
        self.dom.clear_children(container);
        self.render(&view.render(), container);
    }

    /// Build the DOM node for `node` without attaching it.
    pub fn create(&self, node: &Node) -> D::Node {
        match node {
            Node::Empty => self.dom.create_text(""),
            Node::Text(text) => self.dom.create_text(text),
            Node::Fragment(children) => {
                let fragment = self.dom.create_fragment();
                for child in children {
                    self.render(child, &fragment);
                }
                fragment
            }
            Node::Component(component) => self.create(&component.expand()),
            Node::Element(element) => {
                let el = self.dom.create_element(element.tag());
                self.apply_props(&el, element.props());
                self.render_children(element.props().children(), &el);
                el
            }
        }
    }

    /// Children go straight into the element: a list is not wrapped in a
    /// fragment and an empty child adds nothing.
    fn render_children(&self, children: &Node, el: &D::Node) {
        match children {
            Node::Empty => {}
            Node::Fragment(list) => {
                for child in list {
                    self.render(child, el);
                }
            }
            child => self.render(child, el),
        }
    }

    fn apply_props(&self, el: &D::Node, props: &Props) {
        for (key, value) in props.iter() {
            match PropBinding::classify(key, value) {
                PropBinding::Listener { event, handler } => {
                    self.dom.add_event_listener(el, &event, handler.clone());
                }
                PropBinding::Attribute { name, value } => {
                    self.dom.set_attribute(el, name, &value);
                }
                PropBinding::Ignored => trace!(key, "prop skipped"),
            }
        }
    }
}
