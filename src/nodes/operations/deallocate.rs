use crate::{allocator::box_into_inner, allocator::Allocator, InnerNode, Node};
use alloc::vec::Vec;

/// Deallocate the given node and all children of the given node, returning
/// the number of leaves that were released.
///
/// Nodes are released from an explicit stack, so the depth of the trie is not
/// limited by the call stack.
pub(crate) fn deallocate_tree<V, A: Allocator>(root: Node<V, A>) -> usize {
    let mut num_leaves = 0;
    let mut stack = Vec::new();
    stack.push(root);

    while let Some(node) = stack.pop() {
        match node {
            Node::Leaf(leaf) => {
                drop(leaf);
                num_leaves += 1;
            },
            Node::Inner(inner) => {
                let InnerNode {
                    children: [left, right],
                    ..
                } = box_into_inner(inner);
                stack.push(right);
                stack.push(left);
            },
        }
    }

    num_leaves
}
