use crate::{
    allocator::{try_alloc_bytes, Allocator},
    nodes::{
        deallocate_tree, delete, insert_leaf, locate_prefix, maximum, minimum, search, search_mut,
        search_for_insert_point,
        visitor::{KeyFormat, MalformedTreeError, TreeStats, TreeStatsCollector, WellFormedChecker},
        InsertPoint, Leaves,
    },
    Enumeration, Error, LeafNode, Node,
};
use core::{ops::ControlFlow, ptr};
use tracing::{debug, trace};

/// The key-model agnostic part of every tree: the optional root, the entry
/// count and the allocator.
///
/// Keys are plain byte slices here. The public trees decide what the leaf
/// buffers hold and how they are turned back into keys and values.
pub(crate) struct RawTrie<V, A: Allocator> {
    root: Option<Node<V, A>>,
    num_entries: usize,
    alloc: A,
}

impl<V, A: Allocator> RawTrie<V, A> {
    pub(crate) const fn new_in(alloc: A) -> Self {
        RawTrie {
            root: None,
            num_entries: 0,
            alloc,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.num_entries
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    pub(crate) fn get(&self, key: &[u8]) -> Option<&LeafNode<V, A>> {
        search(self.root.as_ref()?, key)
    }

    pub(crate) fn get_mut(&mut self, key: &[u8]) -> Option<&mut LeafNode<V, A>> {
        search_mut(self.root.as_mut()?, key)
    }

    /// Insert a new leaf for `key` built from the concatenation of `parts`,
    /// or hand the existing leaf for `key` to `update`.
    ///
    /// `parts` must start with `key`. Returns `Ok(None)` when a new entry was
    /// created and `Ok(Some(_))` with the output of `update` otherwise. On
    /// allocation failure nothing is changed and `value` is dropped.
    pub(crate) fn insert<R>(
        &mut self,
        key: &[u8],
        parts: &[&[u8]],
        value: V,
        update: impl FnOnce(&mut LeafNode<V, A>, V) -> R,
    ) -> Result<Option<R>, Error>
    where
        A: Clone,
    {
        let Some(root) = &mut self.root else {
            let bytes = try_alloc_bytes(parts, self.alloc.clone()).inspect_err(|_| {
                debug!(key_len = key.len(), "allocation of root leaf failed");
            })?;
            self.root = Some(Node::Leaf(LeafNode::new(bytes, value)));
            self.num_entries = 1;
            return Ok(None);
        };

        match search_for_insert_point(root, key) {
            InsertPoint::Existing(leaf) => Ok(Some(update(leaf, value))),
            InsertPoint::Split(critical_bit) => {
                let bytes = try_alloc_bytes(parts, self.alloc.clone()).inspect_err(|_| {
                    debug!(key_len = key.len(), "allocation of leaf failed, insert rolled back");
                })?;
                insert_leaf(root, critical_bit, LeafNode::new(bytes, value), &self.alloc)
                    .inspect_err(|_| {
                        debug!(
                            key_len = key.len(),
                            "allocation of inner node failed, insert rolled back"
                        );
                    })?;
                self.num_entries += 1;
                Ok(None)
            },
        }
    }

    pub(crate) fn remove(&mut self, key: &[u8]) -> Option<LeafNode<V, A>> {
        let leaf = delete(&mut self.root, key)?;
        self.num_entries -= 1;
        Some(leaf)
    }

    /// Release every node and reset to an empty tree.
    pub(crate) fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            let released = deallocate_tree(root);
            trace!(released, "cleared tree");
        }
        self.num_entries = 0;
    }

    pub(crate) fn leaves(&self) -> Leaves<'_, V, A> {
        match &self.root {
            Some(root) => Leaves::new(root, Some(self.num_entries)),
            None => Leaves::empty(),
        }
    }

    /// Iterate over the leaves whose bytes start with `prefix`.
    pub(crate) fn prefix(&self, prefix: &[u8]) -> Leaves<'_, V, A> {
        let Some(root) = &self.root else {
            return Leaves::empty();
        };

        match locate_prefix(root, prefix) {
            // every entry matches
            Some(top) if ptr::eq(top, root) => Leaves::new(top, Some(self.num_entries)),
            Some(top) => Leaves::new(top, None),
            None => Leaves::empty(),
        }
    }

    pub(crate) fn for_each_prefixed<E>(
        &self,
        prefix: &[u8],
        mut visit: impl FnMut(&LeafNode<V, A>) -> Result<ControlFlow<()>, E>,
    ) -> Result<Enumeration, E> {
        for leaf in self.prefix(prefix) {
            if visit(leaf)?.is_break() {
                return Ok(Enumeration::StoppedEarly);
            }
        }

        Ok(Enumeration::AllVisited)
    }

    pub(crate) fn first(&self) -> Option<&LeafNode<V, A>> {
        self.root.as_ref().map(minimum)
    }

    pub(crate) fn last(&self) -> Option<&LeafNode<V, A>> {
        self.root.as_ref().map(maximum)
    }

    pub(crate) fn check_well_formed(&self, format: KeyFormat) -> Result<usize, MalformedTreeError> {
        WellFormedChecker::check_tree(self.root.as_ref(), self.num_entries, format)
    }

    pub(crate) fn stats(&self) -> TreeStats {
        TreeStatsCollector::collect(self.root.as_ref())
    }
}

impl<V, A: Allocator> Drop for RawTrie<V, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests;
