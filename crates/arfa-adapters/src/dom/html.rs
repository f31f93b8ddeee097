//! HTML serialization of a [`MemoryDom`] subtree.

use super::memory::{MemoryDom, NodeData, NodeId};

/// Elements written without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

impl MemoryDom {
    /// Markup of `node`'s children.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Markup of `node` itself, children included.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let Some((data, children)) =
            self.with_slot(node, |slot| Some((slot.data.clone(), slot.children.clone())))
        else {
            return;
        };
        match data {
            NodeData::Text(text) => out.push_str(&escape_text(&text)),
            NodeData::Fragment => {
                for child in children {
                    self.write_node(child, out);
                }
            }
            NodeData::Element {
                tag, attributes, ..
            } => {
                out.push('<');
                out.push_str(&tag);
                for (name, value) in &attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&tag);
                out.push('>');
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
