//! Trie node lookup and manipulation

mod lookup;
pub(crate) use lookup::*;

mod insert;
pub(crate) use insert::*;

mod delete;
pub(crate) use delete::*;

mod deallocate;
pub(crate) use deallocate::*;

mod prefix;
pub(crate) use prefix::*;

mod minmax;
pub(crate) use minmax::*;
