//! Trie node representation and manipulation

mod iterator;
mod operations;
mod representation;

pub mod visitor;

pub(crate) use iterator::*;
pub(crate) use operations::*;
pub use representation::*;
