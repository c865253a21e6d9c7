//! Helpers shared by the unit tests, integration tests and benchmarks.

use crate::allocator::{AllocError, Allocator, Global};
use alloc::{ffi::CString, rc::Rc, vec, vec::Vec};
use core::{alloc::Layout, cell::Cell, iter, ptr::NonNull};

/// Generate NUL-free keys of growing length that form the deepest possible
/// trie: every key shares all but its last byte with the next one.
///
/// The keys are `[0xFF]`, `[0x01, 0xFF]`, `[0x01, 0x01, 0xFF]` and so on, up to
/// `max_len` bytes.
pub fn generate_keys_skewed(max_len: usize) -> impl Iterator<Item = CString> {
    iter::successors(Some(vec![u8::MAX]), move |prev| {
        if prev.len() < max_len {
            let mut key = vec![1; prev.len()];
            key.push(u8::MAX);
            Some(key)
        } else {
            None
        }
    })
    .filter_map(|bytes| CString::new(bytes).ok())
}

/// Generate every key of length `key_len` whose bytes step from `0` to
/// `u8::MAX` in increments of `u8::MAX / value_stops`, in increasing order.
pub fn generate_key_fixed_length(
    key_len: usize,
    value_stops: u8,
) -> impl Iterator<Item = Vec<u8>> {
    let step = u8::MAX / value_stops.max(1);
    iter::successors(Some(vec![u8::MIN; key_len]), move |prev| {
        let mut next = prev.clone();
        // odometer increment, least significant digit last
        for digit in next.iter_mut().rev() {
            if *digit == u8::MAX {
                *digit = u8::MIN;
            } else {
                *digit = digit.saturating_add(step);
                return Some(next);
            }
        }
        None
    })
}

/// Generate `count` distinct NUL-free keys, spread over the whole trie.
pub fn generate_string_keys(count: usize) -> impl Iterator<Item = CString> {
    (0..count).filter_map(|idx| {
        // Base 255 digits shifted by one, so no byte is ever zero.
        let mut bytes = Vec::new();
        let mut rest = idx;
        loop {
            bytes.push((rest % 255) as u8 + 1);
            rest /= 255;
            if rest == 0 {
                break;
            }
        }
        bytes.reverse();
        CString::new(bytes).ok()
    })
}

#[derive(Debug)]
struct FailingAllocatorState {
    remaining: Cell<usize>,
    live: Cell<usize>,
}

/// An [`Allocator`] that delegates to [`Global`], counts live allocations,
/// and fails every allocation after a configurable number of successes.
///
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct FailingAllocator {
    state: Rc<FailingAllocatorState>,
}

impl FailingAllocator {
    /// Create an allocator that allows `successes` allocations and then fails
    /// every later one.
    pub fn failing_after(successes: usize) -> Self {
        FailingAllocator {
            state: Rc::new(FailingAllocatorState {
                remaining: Cell::new(successes),
                live: Cell::new(0),
            }),
        }
    }

    /// Create an allocator that never fails.
    pub fn unlimited() -> Self {
        Self::failing_after(usize::MAX)
    }

    /// Allow `successes` more allocations before failing again.
    pub fn set_remaining(&self, successes: usize) {
        self.state.remaining.set(successes);
    }

    /// The number of allocations made through this allocator that have not
    /// been released yet.
    pub fn live_allocations(&self) -> usize {
        self.state.live.get()
    }
}

// SAFETY: every allocation is delegated to `Global`, which upholds the
// `Allocator` contract, and every deallocation is forwarded to it unchanged.
unsafe impl Allocator for FailingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        let remaining = self.state.remaining.get();
        if remaining == 0 {
            return Err(AllocError);
        }

        let ptr = Global.allocate(layout)?;
        self.state.remaining.set(remaining - 1);
        self.state.live.set(self.state.live.get() + 1);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.state.live.set(self.state.live.get() - 1);
        // SAFETY: `ptr` was allocated by `Global` with `layout` in `allocate`
        unsafe { Global.deallocate(ptr, layout) }
    }
}

#[cfg(test)]
pub(crate) use self::nodes::*;

#[cfg(test)]
mod nodes {
    use crate::{
        allocator::{try_alloc_bytes, AllocError, Global},
        nodes::{insert_leaf, search_for_insert_point, InsertPoint},
        CriticalBit, InnerNode, LeafNode, Node,
    };
    use allocator_api2::boxed::Box;

    /// Build a leaf node holding `bytes`.
    pub(crate) fn leaf<V>(bytes: &[u8], value: V) -> Node<V> {
        Node::Leaf(LeafNode::new(
            try_alloc_bytes(&[bytes], Global).unwrap(),
            value,
        ))
    }

    /// Build an inner node over `left` and `right`.
    pub(crate) fn split<V>(byte_index: usize, bit_mask: u8, left: Node<V>, right: Node<V>) -> Node<V> {
        Node::Inner(Box::new_in(
            InnerNode {
                critical_bit: CriticalBit::new(byte_index, bit_mask).unwrap(),
                children: [left, right],
            },
            Global,
        ))
    }

    /// Insert `key` with `value` into the tree rooted at `root`, returning
    /// `true` if the key was new. An existing value is left untouched.
    pub(crate) fn insert_key<V>(
        root: &mut Option<Node<V>>,
        key: &[u8],
        value: V,
    ) -> Result<bool, AllocError> {
        let Some(node) = root else {
            *root = Some(leaf(key, value));
            return Ok(true);
        };

        match search_for_insert_point(node, key) {
            InsertPoint::Existing(_) => Ok(false),
            InsertPoint::Split(critical_bit) => {
                let bytes = try_alloc_bytes(&[key], Global)?;
                insert_leaf(node, critical_bit, LeafNode::new(bytes, value), &Global)?;
                Ok(true)
            },
        }
    }

    /// Build a tree containing every key from `keys`, with the position of
    /// the key as its value.
    pub(crate) fn tree_from_keys<K: AsRef<[u8]>>(
        keys: impl IntoIterator<Item = K>,
    ) -> Option<Node<usize>> {
        let mut root = None;
        for (idx, key) in keys.into_iter().enumerate() {
            insert_key(&mut root, key.as_ref(), idx).unwrap();
        }
        root
    }
}
