use crate::{
    allocator::{AllocError, Allocator},
    bytes::find_critical_bit,
    nodes::find_leaf_mut,
    CriticalBit, InnerNode, LeafNode, Node,
};
use allocator_api2::boxed::Box;
use core::ptr;


/// The outcome of searching a non-empty tree for the place of a new key.
pub(crate) enum InsertPoint<'a, V, A: Allocator> {
    /// The key is already stored in this leaf
    Existing(&'a mut LeafNode<V, A>),
    /// The key is new, and differs from its closest stored key at this bit
    Split(CriticalBit),
}

/// Find where `key` would be inserted in the tree rooted at `root`.
///
/// The lookup descent ends at the stored key that shares the longest run of
/// critical bits with `key`. The first bit at which those two keys differ is
/// the critical bit of the new inner node.
pub(crate) fn search_for_insert_point<'a, V, A: Allocator>(
    root: &'a mut Node<V, A>,
    key: &[u8],
) -> InsertPoint<'a, V, A> {
    let closest = find_leaf_mut(root, key);
    match find_critical_bit(closest.bytes(), key) {
        None => InsertPoint::Existing(closest),
        Some(critical_bit) => InsertPoint::Split(critical_bit),
    }
}

/// Walk from `slot` along the path of `key` and return the first slot that
/// does not hold an inner node testing a bit before `critical_bit`.
fn find_splice_slot<'a, V, A: Allocator>(
    mut slot: &'a mut Node<V, A>,
    key: &[u8],
    critical_bit: CriticalBit,
) -> &'a mut Node<V, A> {
    loop {
        let descend = match &*slot {
            Node::Inner(inner) => inner.critical_bit < critical_bit,
            Node::Leaf(_) => false,
        };
        if !descend {
            return slot;
        }

        let Node::Inner(inner) = slot else {
            return slot;
        };
        slot = inner.child_for_mut(key);
    }
}

/// Insert `leaf` into the non-empty tree rooted at `root`, splitting on
/// `critical_bit`.
///
/// `critical_bit` must come from [`search_for_insert_point`] for the key of
/// `leaf`. The new inner node is allocated before the tree is touched. If
/// that allocation fails the tree is unchanged and `leaf` is dropped, which
/// releases its buffer.
pub(crate) fn insert_leaf<V, A: Allocator + Clone>(
    root: &mut Node<V, A>,
    critical_bit: CriticalBit,
    leaf: LeafNode<V, A>,
    alloc: &A,
) -> Result<(), AllocError> {
    let mut inner = Box::<InnerNode<V, A>, A>::try_new_uninit_in(alloc.clone())?;

    let direction = critical_bit.child_index(leaf.bytes());
    let slot = find_splice_slot(root, leaf.bytes(), critical_bit);

    // SAFETY: `slot` is a valid, initialized node which is moved into the new
    // inner node by `ptr::read` and then overwritten without being dropped by
    // `ptr::write`, so it keeps exactly one owner. Nothing between the read
    // and the write can unwind: the allocation already happened above.
    unsafe {
        let displaced = ptr::read(slot);
        let new_leaf = Node::Leaf(leaf);
        let children = if direction == 0 {
            [new_leaf, displaced]
        } else {
            [displaced, new_leaf]
        };
        inner.write(InnerNode {
            critical_bit,
            children,
        });
        ptr::write(slot, Node::Inner(inner.assume_init()));
    }

    Ok(())
}
