//! Trie node representation

use crate::{allocator::Global, bytes::byte_at};
use allocator_api2::{alloc::Allocator, boxed::Box, vec::Vec};
use core::{cmp::Ordering, fmt};


/// The bit at which the keys of the two subtrees of an inner node first
/// differ.
///
/// The bit is addressed by the index of the byte that contains it and a mask
/// with exactly one bit set. Bits are numbered from the most significant bit
/// of the first byte, so a bit sorts before another if it is in an earlier
/// byte, or in the same byte with a more significant mask.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CriticalBit {
    byte_index: usize,
    bit_mask: u8,
}

impl CriticalBit {
    /// Create a critical bit from a byte index and a mask.
    ///
    /// Returns `None` if `bit_mask` does not have exactly one bit set.
    pub const fn new(byte_index: usize, bit_mask: u8) -> Option<Self> {
        if bit_mask.count_ones() == 1 {
            Some(CriticalBit {
                byte_index,
                bit_mask,
            })
        } else {
            None
        }
    }

    /// The critical bit of two different bytes found at `byte_index`: the most
    /// significant bit of their XOR.
    ///
    /// `a` and `b` must be different.
    pub(crate) const fn from_differing_bytes(byte_index: usize, a: u8, b: u8) -> Self {
        let diff = a ^ b;
        debug_assert!(diff != 0, "bytes must differ");

        CriticalBit {
            byte_index,
            bit_mask: 0x80 >> diff.leading_zeros(),
        }
    }

    /// The index of the key byte that holds this bit.
    pub const fn byte_index(&self) -> usize {
        self.byte_index
    }

    /// A mask with the single bit of interest set.
    pub const fn bit_mask(&self) -> u8 {
        self.bit_mask
    }

    /// Return `true` if `key` has this bit set. Bytes past the end of `key`
    /// read as zero.
    #[inline]
    pub fn is_set(&self, key: &[u8]) -> bool {
        byte_at(key, self.byte_index) & self.bit_mask != 0
    }

    /// The index of the child that `key` descends into: `0` for left, `1` for
    /// right.
    #[inline]
    pub fn child_index(&self, key: &[u8]) -> usize {
        usize::from(self.is_set(key))
    }
}

impl Ord for CriticalBit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.byte_index
            .cmp(&other.byte_index)
            // a larger mask is a more significant bit, which comes first
            .then_with(|| other.bit_mask.cmp(&self.bit_mask))
    }
}

impl PartialOrd for CriticalBit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for CriticalBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CriticalBit")
            .field("byte_index", &self.byte_index)
            .field("bit_mask", &format_args!("{:#010b}", self.bit_mask))
            .finish()
    }
}

/// A node of the trie, exclusively owned by its parent slot (or the tree
/// root).
pub enum Node<V, A: Allocator = Global> {
    /// A node holding a single entry
    Leaf(LeafNode<V, A>),
    /// A node with exactly two children
    Inner(Box<InnerNode<V, A>, A>),
}

impl<V, A: Allocator> Node<V, A> {
    /// Return `true` if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// Return the leaf if this node is one.
    pub fn as_leaf(&self) -> Option<&LeafNode<V, A>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Inner(_) => None,
        }
    }

    /// Return the inner node if this node is one.
    pub fn as_inner(&self) -> Option<&InnerNode<V, A>> {
        match self {
            Node::Leaf(_) => None,
            Node::Inner(inner) => Some(inner),
        }
    }
}

impl<V: fmt::Debug, A: Allocator> fmt::Debug for Node<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => f.debug_tuple("Leaf").field(leaf).finish(),
            Node::Inner(inner) => f.debug_tuple("Inner").field(&**inner).finish(),
        }
    }
}

/// Node that contains a single entry.
///
/// The leaf owns one byte buffer allocated through the tree allocator. For
/// string trees the buffer is the key including its NUL terminator, for fixed
/// length trees it is the key immediately followed by the value bytes.
pub struct LeafNode<V, A: Allocator = Global> {
    bytes: Vec<u8, A>,
    value: V,
}

impl<V, A: Allocator> LeafNode<V, A> {
    /// Create a new leaf node from its byte buffer and value.
    pub fn new(bytes: Vec<u8, A>, value: V) -> Self {
        LeafNode { bytes, value }
    }

    /// The stored bytes: the key, and for fixed length trees the value after
    /// it.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The stored bytes, mutably.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Get a reference to the value stored next to the bytes.
    pub fn value_ref(&self) -> &V {
        &self.value
    }

    /// Get a mutable reference to the value stored next to the bytes.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Return a reference to the bytes and value.
    pub fn entry_ref(&self) -> (&[u8], &V) {
        (self.bytes.as_slice(), &self.value)
    }

    /// Return a mutable reference to the bytes and a mutable reference to the
    /// value.
    pub fn entry_mut(&mut self) -> (&mut [u8], &mut V) {
        (self.bytes.as_mut_slice(), &mut self.value)
    }

    /// Consume the leaf node and return its parts.
    pub fn into_entry(self) -> (Vec<u8, A>, V) {
        (self.bytes, self.value)
    }

    /// Check that the stored bytes start with the given key.
    ///
    /// Keys stored in one tree are self-delimiting, so for a key of the
    /// tree's own format this is a full key comparison.
    pub fn matches_key(&self, key: &[u8]) -> bool {
        self.bytes.starts_with(key)
    }
}

impl<V: fmt::Debug, A: Allocator> fmt::Debug for LeafNode<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafNode")
            .field("bytes", &&*self.bytes)
            .field("value", &self.value)
            .finish()
    }
}

/// Node with exactly two children, split on a [`CriticalBit`].
///
/// Every key under the left child has the critical bit cleared, every key
/// under the right child has it set.
pub struct InnerNode<V, A: Allocator = Global> {
    /// The bit that separates the two children
    pub critical_bit: CriticalBit,
    /// The `[left, right]` children
    pub children: [Node<V, A>; 2],
}

impl<V, A: Allocator> InnerNode<V, A> {
    /// The left child, containing keys with the critical bit cleared.
    pub fn left(&self) -> &Node<V, A> {
        &self.children[0]
    }

    /// The right child, containing keys with the critical bit set.
    pub fn right(&self) -> &Node<V, A> {
        &self.children[1]
    }

    /// The child that `key` descends into.
    #[inline]
    pub fn child_for(&self, key: &[u8]) -> &Node<V, A> {
        &self.children[self.critical_bit.child_index(key)]
    }

    /// The child that `key` descends into, mutably.
    #[inline]
    pub fn child_for_mut(&mut self, key: &[u8]) -> &mut Node<V, A> {
        &mut self.children[self.critical_bit.child_index(key)]
    }
}

impl<V: fmt::Debug, A: Allocator> fmt::Debug for InnerNode<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InnerNode")
            .field("critical_bit", &self.critical_bit)
            .field("left", self.left())
            .field("right", self.right())
            .finish()
    }
}
