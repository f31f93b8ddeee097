//! Document adapters.

mod html;
mod memory;

pub use memory::{MemoryDom, NodeId};
