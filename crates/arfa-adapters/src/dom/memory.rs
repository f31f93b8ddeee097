//! In-memory document tree.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Handles are cheap
//! to clone and share the same document, so a renderer, a browser host and a
//! test can all look at one tree.
//!
//! Slots are recycled. Clearing a container frees the removed subtrees and
//! appending a fragment frees the emptied fragment. A freed id goes stale: its
//! generation no longer matches the slot, so queries on it see nothing and
//! mutations through it are ignored.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use arfa_core::application::ports::Dom;
use arfa_core::domain::{DomEvent, EventHandler};
use tracing::trace;

/// Handle to a node of a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Clone)]
pub(crate) enum NodeData {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        listeners: Vec<(String, EventHandler)>,
    },
    Text(String),
    Fragment,
}

#[derive(Clone)]
pub(crate) struct Slot {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

struct Entry {
    generation: u32,
    slot: Option<Slot>,
}

#[derive(Default)]
struct Arena {
    entries: Vec<Entry>,
    free: Vec<usize>,
    live: usize,
}

impl Arena {
    fn alloc(&mut self, data: NodeData) -> NodeId {
        let slot = Slot {
            data,
            parent: None,
            children: Vec::new(),
        };
        self.live += 1;

        match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.slot = Some(slot);
                NodeId {
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                self.entries.push(Entry {
                    generation: 0,
                    slot: Some(slot),
                });
                NodeId {
                    index: self.entries.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    fn get(&self, node: NodeId) -> Option<&Slot> {
        self.entries
            .get(node.index)
            .filter(|entry| entry.generation == node.generation)
            .and_then(|entry| entry.slot.as_ref())
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut Slot> {
        self.entries
            .get_mut(node.index)
            .filter(|entry| entry.generation == node.generation)
            .and_then(|entry| entry.slot.as_mut())
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.get_mut(node).and_then(|slot| slot.parent.take());
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|c| *c != node);
        }
    }

    /// Free `node` and everything below it. The freed slots are handed back
    /// so their listeners are dropped outside the arena borrow.
    fn release(&mut self, node: NodeId) -> Vec<Slot> {
        let mut freed = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let Some(entry) = self
                .entries
                .get_mut(id.index)
                .filter(|entry| entry.generation == id.generation)
            else {
                continue;
            };
            let Some(slot) = entry.slot.take() else {
                continue;
            };
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(id.index);
            self.live -= 1;
            stack.extend(slot.children.iter().copied());
            freed.push(slot);
        }
        freed
    }
}

/// Shared in-memory document.
#[derive(Clone, Default)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena>>,
}

impl fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.arena.borrow().live)
            .finish()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// A detached element to mount pages into, e.g. `<div id="root">`.
    pub fn create_root(&self, tag: &str, id: &str) -> NodeId {
        let root = self.create_element(tag);
        self.set_attribute(&root, "id", id);
        root
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.arena.borrow().live
    }

    /// Whether `node` still refers to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.arena.borrow().get(node).is_some()
    }

    /// Run `f` on the node's slot, or return `R::default()` for a stale id.
    pub(crate) fn with_slot<R: Default>(&self, node: NodeId, f: impl FnOnce(&Slot) -> R) -> R {
        self.arena.borrow().get(node).map(f).unwrap_or_default()
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        self.with_slot(node, |slot| match &slot.data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        })
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        self.with_slot(node, |slot| matches!(slot.data, NodeData::Text(_)))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.with_slot(node, |slot| match &slot.data {
            NodeData::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        })
    }

    pub fn attributes(&self, node: NodeId) -> Vec<(String, String)> {
        self.with_slot(node, |slot| match &slot.data {
            NodeData::Element { attributes, .. } => attributes.clone(),
            _ => Vec::new(),
        })
    }

    /// Event names with at least one listener on `node`, in registration
    /// order.
    pub fn listeners(&self, node: NodeId) -> Vec<String> {
        self.with_slot(node, |slot| match &slot.data {
            NodeData::Element { listeners, .. } => {
                listeners.iter().map(|(event, _)| event.clone()).collect()
            }
            _ => Vec::new(),
        })
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.with_slot(node, |slot| slot.parent)
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_slot(node, |slot| slot.children.clone())
    }

    /// Concatenated text of `node` and its descendants.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let (text, children) = self.with_slot(node, |slot| match &slot.data {
            NodeData::Text(text) => (Some(text.clone()), Vec::new()),
            _ => (None, slot.children.clone()),
        });
        if let Some(text) = text {
            out.push_str(&text);
        }
        for child in children {
            self.collect_text(child, out);
        }
    }

    /// Descendants of `root` (itself included) in document order.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut children = self.children(node);
            children.reverse();
            stack.extend(children);
        }
        out
    }

    pub fn find_by_tag(&self, root: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|n| self.tag(*n).as_deref() == Some(tag))
            .collect()
    }

    /// First `<a>` under `root` whose `href` equals `href`.
    pub fn find_link(&self, root: NodeId, href: &str) -> Option<NodeId> {
        self.find_by_tag(root, "a")
            .into_iter()
            .find(|a| self.attribute(*a, "href").as_deref() == Some(href))
    }

    /// Nearest element with `tag`, starting at `node` itself.
    pub fn closest(&self, node: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.tag(id).as_deref() == Some(tag) {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    /// Dispatch an event at `target` and bubble it to the root.
    ///
    /// Handlers are cloned out before being called, so they may freely
    /// mutate the document.
    pub fn dispatch(&self, target: NodeId, kind: &str) -> DomEvent {
        let mut event = DomEvent::new(kind);
        if let Some(href) = self
            .closest(target, "a")
            .and_then(|a| self.attribute(a, "href"))
        {
            event = event.with_anchor_href(href);
        }

        let mut path = vec![target];
        let mut current = self.parent(target);
        while let Some(id) = current {
            path.push(id);
            current = self.parent(id);
        }

        for node in path {
            let handlers: Vec<EventHandler> = self.with_slot(node, |slot| match &slot.data {
                NodeData::Element { listeners, .. } => listeners
                    .iter()
                    .filter(|(event, _)| event == kind)
                    .map(|(_, handler)| handler.clone())
                    .collect(),
                _ => Vec::new(),
            });
            for handler in handlers {
                trace!(node = %node, kind, "calling listener");
                handler.call(&event);
            }
        }
        event
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn create_element(&self, tag: &str) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Element {
            tag: tag.to_owned(),
            attributes: Vec::new(),
            listeners: Vec::new(),
        })
    }

    fn create_text(&self, text: &str) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Text(text.to_owned()))
    }

    fn create_fragment(&self) -> NodeId {
        self.arena.borrow_mut().alloc(NodeData::Fragment)
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) {
        let mut arena = self.arena.borrow_mut();
        if let Some(Slot {
            data: NodeData::Element { attributes, .. },
            ..
        }) = arena.get_mut(*element)
        {
            match attributes.iter_mut().find(|(n, _)| n == name) {
                Some(slot) => slot.1 = value.to_owned(),
                None => attributes.push((name.to_owned(), value.to_owned())),
            }
        }
    }

    fn add_event_listener(&self, element: &NodeId, event: &str, handler: EventHandler) {
        let mut arena = self.arena.borrow_mut();
        if let Some(Slot {
            data: NodeData::Element { listeners, .. },
            ..
        }) = arena.get_mut(*element)
        {
            listeners.push((event.to_owned(), handler));
        }
    }

    /// Appending a fragment moves its children instead and frees the
    /// fragment. Stale ids on either side make this a no-op.
    fn append_child(&self, parent: &NodeId, child: &NodeId) {
        let freed = {
            let mut arena = self.arena.borrow_mut();
            if arena.get(*parent).is_none() {
                return;
            }
            let is_fragment = match arena.get(*child) {
                Some(slot) => matches!(slot.data, NodeData::Fragment),
                None => return,
            };
            let moved = if is_fragment {
                arena
                    .get_mut(*child)
                    .map(|slot| std::mem::take(&mut slot.children))
                    .unwrap_or_default()
            } else {
                arena.detach(*child);
                vec![*child]
            };
            for node in moved {
                if let Some(slot) = arena.get_mut(node) {
                    slot.parent = Some(*parent);
                }
                if let Some(slot) = arena.get_mut(*parent) {
                    slot.children.push(node);
                }
            }
            if is_fragment {
                arena.release(*child)
            } else {
                Vec::new()
            }
        };
        drop(freed);
    }

    /// Removed subtrees are freed; ids into them go stale.
    fn clear_children(&self, parent: &NodeId) {
        let freed: Vec<Slot> = {
            let mut arena = self.arena.borrow_mut();
            let children = arena
                .get_mut(*parent)
                .map(|slot| std::mem::take(&mut slot.children))
                .unwrap_or_default();
            children
                .into_iter()
                .flat_map(|child| arena.release(child))
                .collect()
        };
        trace!(parent = %parent, freed = freed.len(), "children cleared");
        drop(freed);
    }
}
