use crate::{
    allocator::Allocator,
    visitor::{Visitable, Visitor},
    InnerNode, LeafNode, Node,
};
use core::{fmt, mem};

/// A visitor of the trie which collects statistics about the tree, like how
/// many inner nodes and leaves it has and how deep the leaves are.
#[derive(Debug)]
pub struct TreeStatsCollector {
    depth: usize,
    stats: TreeStats,
}

impl TreeStatsCollector {
    /// Run the tree stats collection on the given root node, then return the
    /// accumulated stats.
    pub fn collect<T, A: Allocator>(root: Option<&Node<T, A>>) -> TreeStats {
        let mut collector = TreeStatsCollector {
            depth: 0,
            stats: TreeStats::default(),
        };

        if let Some(root) = root {
            root.visit_with(&mut collector);
        }

        collector.stats
    }
}

/// Collection of stats about the shape of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// The number of leaves, which is the number of entries
    pub num_leaves: usize,
    /// The number of inner nodes
    pub num_inner_nodes: usize,
    /// The number of inner nodes on the longest path from the root to a leaf
    pub max_depth: usize,
    /// The sum over all leaves of the number of inner nodes above the leaf
    pub total_leaf_depth: usize,
    /// The sum of the leaf buffer lengths
    pub total_leaf_bytes: usize,
    /// The size in bytes of all the inner node allocations
    pub total_inner_node_bytes: usize,
}

impl TreeStats {
    /// The average number of inner nodes above a leaf, or `0.0` for an empty
    /// tree.
    pub fn mean_leaf_depth(&self) -> f64 {
        if self.num_leaves == 0 {
            0.0
        } else {
            self.total_leaf_depth as f64 / self.num_leaves as f64
        }
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStats")
            .field("num_leaves", &self.num_leaves)
            .field("num_inner_nodes", &self.num_inner_nodes)
            .field("max_depth", &self.max_depth)
            .field("mean_leaf_depth", &self.mean_leaf_depth())
            .field("total_leaf_bytes", &self.total_leaf_bytes)
            .field("total_inner_node_bytes", &self.total_inner_node_bytes)
            .finish()
    }
}

impl<T, A: Allocator> Visitor<T, A> for TreeStatsCollector {
    type Output = ();

    fn default_output(&self) -> Self::Output {}

    fn combine_output(&self, _: Self::Output, _: Self::Output) -> Self::Output {}

    fn visit_inner(&mut self, t: &InnerNode<T, A>) -> Self::Output {
        self.stats.num_inner_nodes += 1;
        self.stats.total_inner_node_bytes += mem::size_of::<InnerNode<T, A>>();

        self.depth += 1;
        t.super_visit_with(self);
        self.depth -= 1;
    }

    fn visit_leaf(&mut self, t: &LeafNode<T, A>) -> Self::Output {
        self.stats.num_leaves += 1;
        self.stats.total_leaf_bytes += t.bytes().len();
        self.stats.total_leaf_depth += self.depth;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
    }
}
