use crate::{allocator::Allocator, LeafNode, Node};
use alloc::collections::VecDeque;
use core::{fmt, iter::FusedIterator};

/// A sorted, double-ended iterator over the leaves of a subtree.
///
/// The deque holds the unvisited subtrees in descending key order, so the
/// front yields the maximum leaves and the back yields the minimum leaves.
pub(crate) struct Leaves<'a, V, A: Allocator> {
    nodes: VecDeque<&'a Node<V, A>>,
    /// The number of leaves left to visit, if it is known
    remaining: Option<usize>,
}

impl<'a, V, A: Allocator> Leaves<'a, V, A> {
    /// Create a new iterator that will visit all leaf nodes descended from the
    /// given node.
    ///
    /// `num_leaves` must be the exact number of leaves under `root` when it is
    /// given.
    pub(crate) fn new(root: &'a Node<V, A>, num_leaves: Option<usize>) -> Self {
        Leaves {
            nodes: VecDeque::from([root]),
            remaining: num_leaves,
        }
    }

    /// Create an iterator that yields nothing.
    pub(crate) fn empty() -> Self {
        Leaves {
            nodes: VecDeque::new(),
            remaining: Some(0),
        }
    }

    fn take_leaf(&mut self, leaf: &'a LeafNode<V, A>) -> Option<&'a LeafNode<V, A>> {
        if let Some(remaining) = &mut self.remaining {
            *remaining = remaining.saturating_sub(1);
        }
        Some(leaf)
    }
}

impl<'a, V, A: Allocator> Iterator for Leaves<'a, V, A> {
    type Item = &'a LeafNode<V, A>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.nodes.pop_back() {
            match node {
                Node::Leaf(leaf) => return self.take_leaf(leaf),
                Node::Inner(inner) => {
                    self.nodes.push_back(inner.right());
                    self.nodes.push_back(inner.left());
                },
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(remaining) => (remaining, Some(remaining)),
            None => (usize::from(!self.nodes.is_empty()), None),
        }
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<V, A: Allocator> DoubleEndedIterator for Leaves<'_, V, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.nodes.pop_front() {
            match node {
                Node::Leaf(leaf) => return self.take_leaf(leaf),
                Node::Inner(inner) => {
                    self.nodes.push_front(inner.left());
                    self.nodes.push_front(inner.right());
                },
            }
        }

        None
    }
}

impl<V, A: Allocator> FusedIterator for Leaves<'_, V, A> {}

impl<V, A: Allocator> Clone for Leaves<'_, V, A> {
    fn clone(&self) -> Self {
        Leaves {
            nodes: self.nodes.clone(),
            remaining: self.remaining,
        }
    }
}

impl<V, A: Allocator> fmt::Debug for Leaves<'_, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaves")
            .field("pending_subtrees", &self.nodes.len())
            .field("remaining", &self.remaining)
            .finish()
    }
}
