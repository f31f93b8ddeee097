//! Session history kept in memory.

use std::cell::RefCell;
use std::rc::Rc;

use arfa_core::application::ApplicationError;
use arfa_core::application::ports::History;
use arfa_core::error::ArfaResult;
use tracing::trace;
use url::Url;

#[derive(Debug)]
struct Stack {
    entries: Vec<Url>,
    index: usize,
}

/// Back/forward stack of URLs sharing one origin.
///
/// Clones share the same stack. `push_state` drops any forward entries, like
/// a browser tab does.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    stack: Rc<RefCell<Stack>>,
}

impl MemoryHistory {
    /// Start a session at `url`, which must be absolute.
    pub fn new(url: &str) -> ArfaResult<Self> {
        let start = Url::parse(url).map_err(|e| ApplicationError::InvalidUrl {
            target: url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self::at(start))
    }

    pub fn at(start: Url) -> Self {
        Self {
            stack: Rc::new(RefCell::new(Stack {
                entries: vec![start],
                index: 0,
            })),
        }
    }

    /// Step back one entry. Returns `false` at the start of the session.
    pub fn back(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.index == 0 {
            return false;
        }
        stack.index -= 1;
        true
    }

    /// Step forward one entry. Returns `false` at the newest entry.
    pub fn forward(&self) -> bool {
        let mut stack = self.stack.borrow_mut();
        if stack.index + 1 >= stack.entries.len() {
            return false;
        }
        stack.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.stack.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn index(&self) -> usize {
        self.stack.borrow().index
    }

    /// Path, query and fragment of every entry, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.stack.borrow().entries.iter().map(location_of).collect()
    }

    /// Path, query and fragment of the current entry.
    pub fn location(&self) -> String {
        location_of(&self.current_url())
    }

    fn resolve(&self, url: &str) -> Option<Url> {
        let current = self.current_url();
        match current.join(url) {
            Ok(next) => Some(next),
            Err(err) => {
                tracing::warn!(url, error = %err, "history entry ignored");
                None
            }
        }
    }
}

fn location_of(url: &Url) -> String {
    url[url::Position::BeforePath..].to_owned()
}

impl History for MemoryHistory {
    fn current_url(&self) -> Url {
        let stack = self.stack.borrow();
        stack.entries[stack.index].clone()
    }

    fn push_state(&self, url: &str) {
        let Some(next) = self.resolve(url) else {
            return;
        };
        trace!(url, "push");
        let mut stack = self.stack.borrow_mut();
        let keep = stack.index + 1;
        stack.entries.truncate(keep);
        stack.entries.push(next);
        stack.index = keep;
    }

    fn replace_state(&self, url: &str) {
        let Some(next) = self.resolve(url) else {
            return;
        };
        trace!(url, "replace");
        let mut stack = self.stack.borrow_mut();
        let index = stack.index;
        stack.entries[index] = next;
    }
}
