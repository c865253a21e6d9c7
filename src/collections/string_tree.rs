//! The tree for NUL-terminated string keys, and its iterators.

use crate::{
    allocator::{Allocator, Global},
    collections::RawTrie,
    nodes::{
        visitor::{KeyFormat, MalformedTreeError, TreeStats},
        Leaves,
    },
    Enumeration, Error, LeafNode,
};
use core::{ffi::CStr, fmt, hash::Hash, mem, ops::ControlFlow};


/// An ordered map from NUL-terminated strings to values, based on a crit-bit
/// trie.
///
/// With the default value type `()` the tree is a plain ordered set of
/// strings. Keys are compared byte-wise as unsigned bytes, with the NUL
/// terminator taking part in the comparison, so a key always sorts before
/// every longer key that it is a prefix of.
///
/// Each entry costs one leaf allocation holding the key bytes, and every
/// entry but the first one costs an inner node allocation.
pub struct StringTree<V = (), A: Allocator = Global> {
    raw: RawTrie<V, A>,
}

impl<V> StringTree<V> {
    /// Create a new, empty [`StringTree`].
    ///
    /// This function will not pre-allocate anything.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let tree = StringTree::<u32>::new();
    /// assert!(tree.is_empty());
    /// ```
    pub const fn new() -> Self {
        Self::new_in(Global)
    }
}

impl<V, A: Allocator> StringTree<V, A> {
    /// Create a new, empty [`StringTree`] which will allocate nodes using the
    /// given allocator.
    ///
    /// This function will not pre-allocate anything.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::{allocator::Global, StringTree};
    ///
    /// let mut tree = StringTree::new_in(Global);
    /// tree.insert(c"abc", 0).unwrap();
    /// assert_eq!(tree.get(c"abc"), Some(&0));
    /// ```
    pub const fn new_in(alloc: A) -> Self {
        StringTree {
            raw: RawTrie::new_in(alloc),
        }
    }

    /// Returns a reference to the underlying allocator.
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// Returns the number of entries in the tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::<()>::new();
    /// tree.insert(c"a", ()).unwrap();
    /// tree.insert(c"a", ()).unwrap();
    /// tree.insert(c"b", ()).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Remove every entry from the tree and release all nodes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::new();
    /// tree.insert(c"abc", 'a').unwrap();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// assert!(tree.get(c"abc").is_none());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns true if the tree contains `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::<()>::new();
    /// tree.insert(c"abc", ()).unwrap();
    /// assert!(tree.contains(c"abc"));
    /// assert!(!tree.contains(c"ab"));
    /// ```
    pub fn contains(&self, key: &CStr) -> bool {
        self.raw.get(key.to_bytes_with_nul()).is_some()
    }

    /// Returns a reference to the value stored with `key`.
    pub fn get(&self, key: &CStr) -> Option<&V> {
        self.raw
            .get(key.to_bytes_with_nul())
            .map(LeafNode::value_ref)
    }

    /// Returns the stored key and a reference to the value for `key`.
    pub fn get_key_value(&self, key: &CStr) -> Option<(&CStr, &V)> {
        self.raw.get(key.to_bytes_with_nul()).map(entry)
    }

    /// Returns a mutable reference to the value stored with `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::new();
    /// tree.insert(c"count", 1).unwrap();
    /// *tree.get_mut(c"count").unwrap() += 1;
    /// assert_eq!(tree.get(c"count"), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &CStr) -> Option<&mut V> {
        self.raw
            .get_mut(key.to_bytes_with_nul())
            .map(LeafNode::value_mut)
    }

    /// Insert `key` with `value`.
    ///
    /// Returns `Ok(None)` if the key was not present. If it was present the
    /// value is replaced, the key is kept, and the old value is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailed`] if a node could not be allocated.
    /// The tree is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::new();
    /// assert_eq!(tree.insert(c"abc", 1), Ok(None));
    /// assert_eq!(tree.insert(c"abc", 2), Ok(Some(1)));
    /// assert_eq!(tree.get(c"abc"), Some(&2));
    /// ```
    pub fn insert(&mut self, key: &CStr, value: V) -> Result<Option<V>, Error>
    where
        A: Clone,
    {
        let bytes = key.to_bytes_with_nul();
        self.raw.insert(bytes, &[bytes], value, |leaf, value| {
            mem::replace(leaf.value_mut(), value)
        })
    }

    /// Remove `key` from the tree, returning its value if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::new();
    /// tree.insert(c"abc", 'x').unwrap();
    /// assert_eq!(tree.remove(c"abc"), Some('x'));
    /// assert_eq!(tree.remove(c"abc"), None);
    /// ```
    pub fn remove(&mut self, key: &CStr) -> Option<V> {
        let leaf = self.raw.remove(key.to_bytes_with_nul())?;
        let (_, value) = leaf.into_entry();
        Some(value)
    }

    /// Call `visit` on every entry whose key starts with `prefix`, in sorted
    /// order.
    ///
    /// The prefix is compared against the key bytes, so it should not
    /// contain a NUL byte unless it is meant to match the terminator. The
    /// enumeration stops early when `visit` returns [`ControlFlow::Break`],
    /// and is aborted with the error when `visit` fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::{Enumeration, StringTree};
    /// use std::{convert::Infallible, ops::ControlFlow};
    ///
    /// let mut tree = StringTree::<()>::new();
    /// for key in [c"a", c"aa", c"aaz", c"abz", c"bba"] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// let mut keys = Vec::new();
    /// let outcome = tree.for_each_prefixed(b"aa", |key, _| {
    ///     keys.push(key.to_str().unwrap().to_owned());
    ///     Ok::<_, Infallible>(ControlFlow::Continue(()))
    /// });
    /// assert_eq!(outcome, Ok(Enumeration::AllVisited));
    /// assert_eq!(keys, ["aa", "aaz"]);
    /// ```
    pub fn for_each_prefixed<E, F>(&self, prefix: &[u8], mut visit: F) -> Result<Enumeration, E>
    where
        F: FnMut(&CStr, &V) -> Result<ControlFlow<()>, E>,
    {
        self.raw.for_each_prefixed(prefix, |leaf| {
            let (key, value) = entry(leaf);
            visit(key, value)
        })
    }

    /// Iterate over the entries whose key starts with `prefix`, in sorted
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::<()>::new();
    /// for key in [c"a", c"aa", c"aaz", c"abz", c"bba"] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// let keys: Vec<_> = tree.prefix(b"a").map(|(key, _)| key).collect();
    /// assert_eq!(keys, [c"a", c"aa", c"aaz", c"abz"]);
    ///
    /// let last = tree.prefix(b"aa").next_back().map(|(key, _)| key);
    /// assert_eq!(last, Some(c"aaz"));
    /// ```
    pub fn prefix(&self, prefix: &[u8]) -> Prefix<'_, V, A> {
        Prefix {
            leaves: self.raw.prefix(prefix),
        }
    }

    /// Iterate over all entries in sorted order.
    pub fn iter(&self) -> Iter<'_, V, A> {
        Iter {
            leaves: self.raw.leaves(),
        }
    }

    /// Iterate over all keys in sorted order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::StringTree;
    ///
    /// let mut tree = StringTree::<()>::new();
    /// for key in [c"pear", c"apple", c"fig"] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// let keys: Vec<_> = tree.keys().collect();
    /// assert_eq!(keys, [c"apple", c"fig", c"pear"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, V, A> {
        Keys {
            leaves: self.raw.leaves(),
        }
    }

    /// Iterate over all values in the sorted order of their keys.
    pub fn values(&self) -> Values<'_, V, A> {
        Values {
            leaves: self.raw.leaves(),
        }
    }

    /// Returns the entry with the minimum key.
    pub fn first_key_value(&self) -> Option<(&CStr, &V)> {
        self.raw.first().map(entry)
    }

    /// Returns the entry with the maximum key.
    pub fn last_key_value(&self) -> Option<(&CStr, &V)> {
        self.raw.last().map(entry)
    }

    /// Walk the whole tree and verify its structural invariants, returning
    /// the number of leaves.
    pub fn check_well_formed(&self) -> Result<usize, MalformedTreeError> {
        self.raw.check_well_formed(KeyFormat::NulTerminated)
    }

    /// Collect statistics about the shape of the tree.
    pub fn stats(&self) -> TreeStats {
        self.raw.stats()
    }
}

/// Split a string tree leaf into its key and value.
fn entry<V, A: Allocator>(leaf: &LeafNode<V, A>) -> (&CStr, &V) {
    let (bytes, value) = leaf.entry_ref();
    // SAFETY: string tree leaves are only created from the bytes of a `CStr`
    // including the terminator, and the key bytes are never modified.
    let key = unsafe { CStr::from_bytes_with_nul_unchecked(bytes) };
    (key, value)
}

impl<V: fmt::Debug, A: Allocator> fmt::Debug for StringTree<V, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Default for StringTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq, A: Allocator, B: Allocator> PartialEq<StringTree<V, B>> for StringTree<V, A> {
    fn eq(&self, other: &StringTree<V, B>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq, A: Allocator> Eq for StringTree<V, A> {}

impl<V: Hash, A: Allocator> Hash for StringTree<V, A> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for elt in self {
            elt.hash(state);
        }
    }
}

impl<'a, V, A: Allocator> IntoIterator for &'a StringTree<V, A> {
    type IntoIter = Iter<'a, V, A>;
    type Item = (&'a CStr, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`StringTree`].
///
/// This struct is created by the [`iter`](StringTree::iter) method.
pub struct Iter<'a, V, A: Allocator = Global> {
    leaves: Leaves<'a, V, A>,
}

impl<'a, V, A: Allocator> Iter<'a, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<V, A>) -> (&'a CStr, &'a V) {
        entry(leaf)
    }
}

impl_leaf_iterator!(impl<'a, V, A: Allocator> for Iter<'a, V, A> => (&'a CStr, &'a V));

impl<V, A: Allocator> ExactSizeIterator for Iter<'_, V, A> {}

/// An iterator over the keys of a [`StringTree`].
///
/// This struct is created by the [`keys`](StringTree::keys) method.
pub struct Keys<'a, V, A: Allocator = Global> {
    leaves: Leaves<'a, V, A>,
}

impl<'a, V, A: Allocator> Keys<'a, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<V, A>) -> &'a CStr {
        entry(leaf).0
    }
}

impl_leaf_iterator!(impl<'a, V, A: Allocator> for Keys<'a, V, A> => &'a CStr);

impl<V, A: Allocator> ExactSizeIterator for Keys<'_, V, A> {}

/// An iterator over the values of a [`StringTree`].
///
/// This struct is created by the [`values`](StringTree::values) method.
pub struct Values<'a, V, A: Allocator = Global> {
    leaves: Leaves<'a, V, A>,
}

impl<'a, V, A: Allocator> Values<'a, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<V, A>) -> &'a V {
        leaf.value_ref()
    }
}

impl_leaf_iterator!(impl<'a, V, A: Allocator> for Values<'a, V, A> => &'a V);

impl<V, A: Allocator> ExactSizeIterator for Values<'_, V, A> {}

/// An iterator over the entries of a [`StringTree`] whose keys start with a
/// common prefix.
///
/// This struct is created by the [`prefix`](StringTree::prefix) method.
pub struct Prefix<'a, V, A: Allocator = Global> {
    leaves: Leaves<'a, V, A>,
}

impl<'a, V, A: Allocator> Prefix<'a, V, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<V, A>) -> (&'a CStr, &'a V) {
        entry(leaf)
    }
}

impl_leaf_iterator!(impl<'a, V, A: Allocator> for Prefix<'a, V, A> => (&'a CStr, &'a V));

macro_rules! impl_clone_and_debug {
    ($($name:ident),*) => {
        $(
            impl<V, A: Allocator> Clone for $name<'_, V, A> {
                fn clone(&self) -> Self {
                    $name {
                        leaves: self.leaves.clone(),
                    }
                }
            }

            impl<V, A: Allocator> fmt::Debug for $name<'_, V, A> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.leaves).finish()
                }
            }
        )*
    };
}

impl_clone_and_debug!(Iter, Keys, Values, Prefix);
