//! Test harness: the in-memory index provider and the engine manager
//! built around it.


pub use index_manager::{InMemoryIndex, TestIndexManager};
