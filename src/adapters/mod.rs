// Adapters layer: concrete implementations of the domain ports.

pub mod source_tree;
pub mod storage;

pub use source_tree::{LocalSourceTree, MemorySourceTree};
pub use storage::LocalStorage;
