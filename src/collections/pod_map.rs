//! A typed map over the fixed length tree, and its iterators.

use crate::{
    allocator::{Allocator, Global},
    nodes::{
        visitor::{MalformedTreeError, TreeStats},
        Leaves,
    },
    Error, FixedTree, LeafNode,
};
use bytemuck::{bytes_of, pod_read_unaligned, Pod};
use core::{fmt, marker::PhantomData, mem::size_of};


/// An ordered map from plain-old-data keys to plain-old-data values, stored
/// as a [`FixedTree`].
///
/// Keys and values are copied in and out of the tree as their raw bytes, so
/// they are returned by value. Entries are ordered by the in-memory bytes of
/// the key, compared as unsigned bytes. For byte arrays this is the natural
/// order, but multi-byte integers only sort numerically when they are stored
/// big-endian.
///
/// # Examples
///
/// ```rust
/// use critbit::PodMap;
///
/// let mut map = PodMap::<[u8; 4], f32>::new();
/// map.insert(*b"pear", 1.5).unwrap();
/// map.insert(*b"fig!", 0.5).unwrap();
///
/// assert_eq!(map.get(b"pear"), Some(1.5));
/// assert_eq!(map.insert(*b"pear", 2.0), Ok(Some(1.5)));
///
/// let keys: Vec<_> = map.keys().collect();
/// assert_eq!(keys, [*b"fig!", *b"pear"]);
/// ```
pub struct PodMap<K, V, A: Allocator = Global> {
    tree: FixedTree<A>,
    marker: PhantomData<fn() -> (K, V)>,
}

impl<K: Pod, V: Pod> PodMap<K, V> {
    /// Create a new, empty [`PodMap`].
    ///
    /// This function will not pre-allocate anything.
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<K: Pod, V: Pod, A: Allocator> PodMap<K, V, A> {
    /// Create a new, empty [`PodMap`] which will allocate nodes using the
    /// given allocator.
    ///
    /// This function will not pre-allocate anything.
    pub const fn new_in(alloc: A) -> Self {
        PodMap {
            tree: FixedTree::new_in(size_of::<K>(), size_of::<V>(), alloc),
            marker: PhantomData,
        }
    }

    /// Returns a reference to the underlying allocator.
    pub fn allocator(&self) -> &A {
        self.tree.allocator()
    }

    /// Returns the untyped tree holding the entries.
    pub fn as_fixed_tree(&self) -> &FixedTree<A> {
        &self.tree
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Remove every entry from the map and release all nodes.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns true if the map contains `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(bytes_of(key))
    }

    /// Returns a copy of the value stored with `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.tree.get(bytes_of(key)).map(pod_read_unaligned)
    }

    /// Insert `key` with `value`, returning the previous value if the key was
    /// present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if a node could not be allocated.
    /// The map is unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, Error>
    where
        A: Clone,
    {
        let value_bytes = bytes_of(&value);
        self.tree.insert_with(bytes_of(&key), value_bytes, |stored| {
            let previous = pod_read_unaligned(stored);
            stored.copy_from_slice(value_bytes);
            previous
        })
    }

    /// Remove `key` from the map, returning its value if it was present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let leaf = self.tree.remove_leaf(bytes_of(key))?;
        Some(pod_read_unaligned(&leaf.bytes()[size_of::<K>()..]))
    }

    /// Iterate over all entries in sorted order.
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        Iter {
            leaves: self.tree.leaves(),
            marker: PhantomData,
        }
    }

    /// Iterate over all keys in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V, A> {
        Keys {
            leaves: self.tree.leaves(),
            marker: PhantomData,
        }
    }

    /// Iterate over all values in the sorted order of their keys.
    pub fn values(&self) -> Values<'_, K, V, A> {
        Values {
            leaves: self.tree.leaves(),
            marker: PhantomData,
        }
    }

    /// Iterate over the entries whose key bytes start with `prefix`, in
    /// sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrefixLength`] if `prefix` is longer than a key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::PodMap;
    ///
    /// let mut map = PodMap::<[u8; 2], u8>::new();
    /// for (idx, key) in [*b"aa", *b"ab", *b"ba"].into_iter().enumerate() {
    ///     map.insert(key, idx as u8).unwrap();
    /// }
    ///
    /// let entries: Vec<_> = map.prefix(b"a").unwrap().collect();
    /// assert_eq!(entries, [(*b"aa", 0), (*b"ab", 1)]);
    /// ```
    pub fn prefix(&self, prefix: &[u8]) -> Result<Iter<'_, K, V, A>, Error> {
        Ok(Iter {
            leaves: self.tree.prefix_leaves(prefix)?,
            marker: PhantomData,
        })
    }

    /// Returns the entry with the minimum key.
    pub fn first_key_value(&self) -> Option<(K, V)> {
        self.iter().next()
    }

    /// Returns the entry with the maximum key.
    pub fn last_key_value(&self) -> Option<(K, V)> {
        self.iter().next_back()
    }

    /// Walk the whole tree and verify its structural invariants, returning
    /// the number of leaves.
    pub fn check_well_formed(&self) -> Result<usize, MalformedTreeError> {
        self.tree.check_well_formed()
    }

    /// Collect statistics about the shape of the tree.
    pub fn stats(&self) -> TreeStats {
        self.tree.stats()
    }
}

/// Read the key and value out of a leaf of a map with these types.
fn read_entry<K: Pod, V: Pod, A: Allocator>(leaf: &LeafNode<(), A>) -> (K, V) {
    let (key, value) = leaf.bytes().split_at(size_of::<K>());
    (pod_read_unaligned(key), pod_read_unaligned(value))
}

impl<K: Pod + fmt::Debug, V: Pod + fmt::Debug, A: Allocator> fmt::Debug for PodMap<K, V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Pod, V: Pod> Default for PodMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Pod, V: Pod, A: Allocator, B: Allocator> PartialEq<PodMap<K, V, B>> for PodMap<K, V, A> {
    fn eq(&self, other: &PodMap<K, V, B>) -> bool {
        self.tree == other.tree
    }
}

impl<K: Pod, V: Pod, A: Allocator> Eq for PodMap<K, V, A> {}

impl<'a, K: Pod, V: Pod, A: Allocator> IntoIterator for &'a PodMap<K, V, A> {
    type IntoIter = Iter<'a, K, V, A>;
    type Item = (K, V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over copies of the entries of a [`PodMap`].
///
/// This struct is created by the [`iter`](PodMap::iter) and
/// [`prefix`](PodMap::prefix) methods.
pub struct Iter<'a, K, V, A: Allocator = Global> {
    leaves: Leaves<'a, (), A>,
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'a, K: Pod, V: Pod, A: Allocator> Iter<'a, K, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<(), A>) -> (K, V) {
        read_entry(leaf)
    }
}

impl_leaf_iterator!(impl<'a, K: Pod, V: Pod, A: Allocator> for Iter<'a, K, V, A> => (K, V));

/// An iterator over copies of the keys of a [`PodMap`].
///
/// This struct is created by the [`keys`](PodMap::keys) method.
pub struct Keys<'a, K, V, A: Allocator = Global> {
    leaves: Leaves<'a, (), A>,
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'a, K: Pod, V: Pod, A: Allocator> Keys<'a, K, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<(), A>) -> K {
        pod_read_unaligned(&leaf.bytes()[..size_of::<K>()])
    }
}

impl_leaf_iterator!(impl<'a, K: Pod, V: Pod, A: Allocator> for Keys<'a, K, V, A> => K);

impl<K: Pod, V: Pod, A: Allocator> ExactSizeIterator for Keys<'_, K, V, A> {}

/// An iterator over copies of the values of a [`PodMap`].
///
/// This struct is created by the [`values`](PodMap::values) method.
pub struct Values<'a, K, V, A: Allocator = Global> {
    leaves: Leaves<'a, (), A>,
    marker: PhantomData<fn() -> (K, V)>,
}

impl<'a, K: Pod, V: Pod, A: Allocator> Values<'a, K, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<(), A>) -> V {
        pod_read_unaligned(&leaf.bytes()[size_of::<K>()..])
    }
}

impl_leaf_iterator!(impl<'a, K: Pod, V: Pod, A: Allocator> for Values<'a, K, V, A> => V);

impl<K: Pod, V: Pod, A: Allocator> ExactSizeIterator for Values<'_, K, V, A> {}

macro_rules! impl_clone_and_debug {
    ($($name:ident),*) => {
        $(
            impl<K, V, A: Allocator> Clone for $name<'_, K, V, A> {
                fn clone(&self) -> Self {
                    $name {
                        leaves: self.leaves.clone(),
                        marker: PhantomData,
                    }
                }
            }

            impl<K, V, A: Allocator> fmt::Debug for $name<'_, K, V, A> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.leaves).finish()
                }
            }
        )*
    };
}

impl_clone_and_debug!(Iter, Keys, Values);
