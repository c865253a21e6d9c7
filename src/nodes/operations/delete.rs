use crate::{allocator::Allocator, InnerNode, LeafNode, Node};
use allocator_api2::boxed::Box;
use core::{mem::MaybeUninit, ptr};


/// Remove the leaf stored with `key` from the tree rooted at `root`.
///
/// The parent inner node of the leaf is freed and its slot is taken over by
/// the sibling subtree. When the leaf is the root, the tree becomes empty.
/// Returns `None`, and leaves the tree unchanged, if `key` is not present.
pub(crate) fn delete<V, A: Allocator>(
    root: &mut Option<Node<V, A>>,
    key: &[u8],
) -> Option<LeafNode<V, A>> {
    match root.as_mut()? {
        Node::Leaf(leaf) if leaf.matches_key(key) => match root.take() {
            Some(Node::Leaf(leaf)) => Some(leaf),
            other => {
                *root = other;
                None
            },
        },
        Node::Leaf(_) => None,
        Node::Inner(_) => {
            let slot = find_parent_slot(root.as_mut()?, key)?;
            remove_child(slot, key)
        },
    }
}

/// Find the slot holding the inner node whose child on the path of `key` is
/// the leaf stored with `key`.
fn find_parent_slot<'a, V, A: Allocator>(
    mut slot: &'a mut Node<V, A>,
    key: &[u8],
) -> Option<&'a mut Node<V, A>> {
    loop {
        let Node::Inner(inner) = &*slot else {
            return None;
        };
        if let Node::Leaf(leaf) = inner.child_for(key) {
            return leaf.matches_key(key).then_some(slot);
        }

        let Node::Inner(inner) = slot else {
            return None;
        };
        slot = inner.child_for_mut(key);
    }
}

/// Replace the inner node in `slot` by the child that `key` does not descend
/// into, and return the leaf that `key` does descend into.
fn remove_child<V, A: Allocator>(slot: &mut Node<V, A>, key: &[u8]) -> Option<LeafNode<V, A>> {
    let Node::Inner(inner) = slot else {
        return None;
    };
    if !inner.child_for(key).is_leaf() {
        return None;
    }

    // SAFETY: The box is moved out of `slot` by `ptr::read` and `slot` is then
    // overwritten by `ptr::write` without being dropped, so every node keeps
    // exactly one owner. The inner node is moved out of its allocation before
    // the allocation is released as `MaybeUninit`, which does not drop it
    // again. Nothing between the read and the write can unwind.
    let removed = unsafe {
        let boxed: Box<InnerNode<V, A>, A> = ptr::read(inner);
        let (raw, alloc) = Box::into_raw_with_allocator(boxed);
        let InnerNode {
            critical_bit,
            children: [left, right],
        } = ptr::read(raw);

        let (removed, sibling) = if critical_bit.child_index(key) == 0 {
            (left, right)
        } else {
            (right, left)
        };
        ptr::write(slot, sibling);

        drop(Box::from_raw_in(raw.cast::<MaybeUninit<InnerNode<V, A>>>(), alloc));
        removed
    };

    match removed {
        Node::Leaf(leaf) => Some(leaf),
        Node::Inner(_) => None,
    }
}
