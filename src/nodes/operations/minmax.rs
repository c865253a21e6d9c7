use crate::{allocator::Allocator, LeafNode, Node};

/// Search for the leaf with the minimum key, by always choosing the left
/// child.
pub(crate) fn minimum<V, A: Allocator>(root: &Node<V, A>) -> &LeafNode<V, A> {
    let mut node = root;
    loop {
        match node {
            Node::Leaf(leaf) => return leaf,
            Node::Inner(inner) => node = inner.left(),
        }
    }
}

/// Search for the leaf with the maximum key, by always choosing the right
/// child.
pub(crate) fn maximum<V, A: Allocator>(root: &Node<V, A>) -> &LeafNode<V, A> {
    let mut node = root;
    loop {
        match node {
            Node::Leaf(leaf) => return leaf,
            Node::Inner(inner) => node = inner.right(),
        }
    }
}
