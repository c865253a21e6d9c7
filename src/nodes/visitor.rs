//! Utilities for inspecting the trie structure.

mod tree_stats;
mod well_formed;

use crate::{allocator::Allocator, InnerNode, LeafNode, Node};
pub use tree_stats::*;
pub use well_formed::*;

/// The `Visitable` trait allows [`Visitor`]s to traverse the structure of the
/// implementing type and produce some output.
pub trait Visitable<T, A: Allocator> {
    /// This function provides the default traversal behavior for the
    /// implementing type.
    ///
    /// The implementation should call `visit_with(visitor)` for all relevant
    /// sub-fields of the type. If there are no relevant sub-fields, it should
    /// just produce the default output.
    fn super_visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output;

    /// This function will traverse the implementing type and execute any
    /// specific logic from the given [`Visitor`].
    ///
    /// This function should be overridden for types that have corresponding
    /// hooks in the [`Visitor`] trait, so that the call to
    /// `visitor.visit_inner(self)` or `visitor.visit_leaf(self)` can run the
    /// visitor specific handling logic.
    fn visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output {
        self.super_visit_with(visitor)
    }
}

impl<T, A: Allocator> Visitable<T, A> for Node<T, A> {
    fn super_visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output {
        match self {
            Node::Leaf(leaf) => leaf.visit_with(visitor),
            Node::Inner(inner) => inner.visit_with(visitor),
        }
    }
}

impl<T, A: Allocator> Visitable<T, A> for InnerNode<T, A> {
    fn super_visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output {
        let left = self.left().visit_with(visitor);
        let right = self.right().visit_with(visitor);
        visitor.combine_output(left, right)
    }

    fn visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_inner(self)
    }
}

impl<T, A: Allocator> Visitable<T, A> for LeafNode<T, A> {
    fn super_visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output {
        visitor.default_output()
    }

    fn visit_with<V: Visitor<T, A>>(&self, visitor: &mut V) -> V::Output {
        visitor.visit_leaf(self)
    }
}

/// The `Visitor` trait allows creating new operations on the trie by
/// overriding specific handling methods for each of the node types.
pub trait Visitor<T, A: Allocator>: Sized {
    /// The type of value that the visitor produces.
    type Output;

    /// Produce the default value of the [`Self::Output`] type.
    fn default_output(&self) -> Self::Output;

    /// Combine two instances of the [`Self::Output`] type for this [`Visitor`].
    fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output;

    /// Visit an [`InnerNode`].
    fn visit_inner(&mut self, t: &InnerNode<T, A>) -> Self::Output {
        t.super_visit_with(self)
    }

    /// Visit a [`LeafNode`].
    fn visit_leaf(&mut self, t: &LeafNode<T, A>) -> Self::Output {
        t.super_visit_with(self)
    }
}
