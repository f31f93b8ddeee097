//! Virtual DOM nodes.
//!
//! A [`Node`] describes a DOM subtree before it is materialized by the
//! renderer. Trees are immutable once built and cheap to clone (components
//! and handlers are reference counted); a fresh tree is built for every
//! render.

use std::fmt;
use std::rc::Rc;

use super::props::Props;

/// A reusable component: a pure function from props to a tree.
#[derive(Clone)]
pub struct Component(Rc<dyn Fn(&Props) -> Node>);

impl Component {
    pub fn new(render: impl Fn(&Props) -> Node + 'static) -> Self {
        Self(Rc::new(render))
    }

    pub fn render(&self, props: &Props) -> Node {
        (self.0)(props)
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Component(..)")
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

/// An element node: a tag name plus its props (children included).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    props: Props,
}

impl Element {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn props(&self) -> &Props {
        &self.props
    }
}

/// A component invocation waiting to be expanded by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentNode {
    render: Component,
    props: Props,
}

impl ComponentNode {
    pub fn expand(&self) -> Node {
        self.render.render(&self.props)
    }

    pub fn props(&self) -> &Props {
        &self.props
    }
}

/// Virtual DOM node.
///
/// `Empty` stands for `null`, `true` and `false` children alike; numbers are
/// stored as their text form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    #[default]
    Empty,
    Text(String),
    Fragment(Vec<Node>),
    Element(Element),
    Component(ComponentNode),
}

impl Node {
    pub fn element(tag: impl Into<String>, props: Props) -> Self {
        Self::Element(Element {
            tag: tag.into(),
            props,
        })
    }

    pub fn component(render: &Component, props: Props) -> Self {
        Self::Component(ComponentNode {
            render: render.clone(),
            props,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fragment(children: impl IntoIterator<Item = Node>) -> Self {
        Self::Fragment(children.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Element factory in the shape of a JSX pragma.
///
/// Children are flattened one level (a fragment child is spliced in) and
/// `Empty` children are dropped. A single remaining child is stored as is,
/// several become a fragment.
pub fn h(tag: &str, props: Props, children: impl IntoIterator<Item = Node>) -> Node {
    Node::element(tag, props.with_children(collect_children(children)))
}

/// Component counterpart of [`h`].
pub fn c(render: &Component, props: Props, children: impl IntoIterator<Item = Node>) -> Node {
    Node::component(render, props.with_children(collect_children(children)))
}

fn collect_children(children: impl IntoIterator<Item = Node>) -> Node {
    let mut flat: Vec<Node> = children
        .into_iter()
        .flat_map(|child| match child {
            Node::Fragment(inner) => inner,
            other => vec![other],
        })
        .filter(|child| !child.is_empty())
        .collect();

    match flat.len() {
        0 => Node::Empty,
        1 => flat.remove(0),
        _ => Node::Fragment(flat),
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<usize> for Node {
    fn from(value: usize) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Text(super::props::format_number(value))
    }
}

impl From<bool> for Node {
    fn from(_: bool) -> Self {
        Self::Empty
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::Fragment(value)
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}
