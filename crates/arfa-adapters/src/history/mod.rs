//! Session history adapters.

mod memory;

pub use memory::MemoryHistory;
