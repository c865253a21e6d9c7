use crate::{allocator::Allocator, LeafNode, Node};

/// Descend from `root` following the bits of `key` until a leaf is reached.
///
/// The returned leaf is the only possible match for `key`, but its key may
/// still differ from `key` at bits that were never tested on the way down.
pub(crate) fn find_leaf<'a, V, A: Allocator>(
    root: &'a Node<V, A>,
    key: &[u8],
) -> &'a LeafNode<V, A> {
    let mut node = root;
    loop {
        match node {
            Node::Leaf(leaf) => return leaf,
            Node::Inner(inner) => node = inner.child_for(key),
        }
    }
}

/// Descend from `root` following the bits of `key` until a leaf is reached,
/// returning a mutable reference to that leaf.
pub(crate) fn find_leaf_mut<'a, V, A: Allocator>(
    root: &'a mut Node<V, A>,
    key: &[u8],
) -> &'a mut LeafNode<V, A> {
    let mut node = root;
    loop {
        match node {
            Node::Leaf(leaf) => return leaf,
            Node::Inner(inner) => node = inner.child_for_mut(key),
        }
    }
}

/// Search in the given tree for the leaf stored with the given key.
pub(crate) fn search<'a, V, A: Allocator>(
    root: &'a Node<V, A>,
    key: &[u8],
) -> Option<&'a LeafNode<V, A>> {
    let leaf = find_leaf(root, key);

    // The descent only tested the critical bits, so compare the full key.
    leaf.matches_key(key).then_some(leaf)
}

/// Search in the given tree for the leaf stored with the given key, returning
/// a mutable reference.
pub(crate) fn search_mut<'a, V, A: Allocator>(
    root: &'a mut Node<V, A>,
    key: &[u8],
) -> Option<&'a mut LeafNode<V, A>> {
    let leaf = find_leaf_mut(root, key);
    leaf.matches_key(key).then_some(leaf)
}
