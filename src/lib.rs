#![no_std]
#![deny(
    // missing_docs,
    clippy::missing_safety_doc,
    unsafe_op_in_unsafe_fn,
    deprecated_in_future,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rustdoc::invalid_codeblock_attributes
)]
#![doc(
    html_playground_url = "https://play.rust-lang.org/",
    test(attr(deny(warnings)))
)]

//! Crit-bit trie implementation
//!
//! A crit-bit trie is a binary radix trie where every inner node records the
//! single bit at which the keys of its two subtrees first differ. Lookups
//! consume one bit per level, so their cost depends on the key length and not
//! on the number of entries, and an in-order walk yields keys in byte-wise
//! lexicographic order.
//!
//! Two key models share the same trie core:
//!
//!  - [`StringTree`] stores NUL-terminated byte strings ([`CStr`] keys), with
//!    an optional value attached to each key.
//!  - [`FixedTree`] stores fixed-length binary keys mapped to fixed-length
//!    binary values, with [`PodMap`] as a typed wrapper for
//!    [`bytemuck::Pod`] keys and values.
//!
//! # References
//!
//!  - Bernstein, D. J. Crit-bit trees. [Link][crit-bit]
//!  - Morrison, D. R. (1968). PATRICIA: Practical Algorithm To Retrieve
//!    Information Coded in Alphanumeric. Journal of the ACM, 15(4), 514-534.
//!
//! [crit-bit]: https://cr.yp.to/critbit.html
//! [`CStr`]: core::ffi::CStr

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod allocator;
mod bytes;
mod collections;
mod nodes;

#[doc(hidden)]
pub mod tests_common;

pub use collections::*;
pub use nodes::{visitor, CriticalBit, InnerNode, LeafNode, Node};
