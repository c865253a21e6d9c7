//! The tree for fixed length binary keys and values, and its iterators.

use crate::{
    allocator::{Allocator, Global},
    collections::RawTrie,
    nodes::{
        visitor::{KeyFormat, MalformedTreeError, TreeStats},
        Leaves,
    },
    Enumeration, Error, Insertion, LeafNode, PrefixError,
};
use core::{fmt, ops::ControlFlow};


/// An ordered map from fixed length byte keys to fixed length byte values,
/// based on a crit-bit trie.
///
/// Every key stored in the tree is exactly [`key_len`](FixedTree::key_len)
/// bytes long and every value is exactly [`value_len`](FixedTree::value_len)
/// bytes long. Both lengths are set when the tree is created. Keys are
/// compared byte-wise as unsigned bytes, so multi-byte integers should be
/// stored big-endian to sort numerically.
///
/// Each entry is stored as a single buffer holding the key immediately
/// followed by the value.
///
/// # Examples
///
/// ```rust
/// use critbit::{FixedTree, Insertion};
///
/// // a two field key and a float value
/// let key = [5u32.to_be_bytes(), 7u32.to_be_bytes()].concat();
///
/// let mut tree = FixedTree::new(8, 8);
/// assert_eq!(tree.insert(&key, &3.14f64.to_ne_bytes()), Ok(Insertion::Inserted));
/// assert_eq!(tree.insert(&key, &2.71f64.to_ne_bytes()), Ok(Insertion::Updated));
///
/// let value = f64::from_ne_bytes(tree.get(&key).unwrap().try_into().unwrap());
/// assert_eq!(value, 2.71);
/// ```
pub struct FixedTree<A: Allocator = Global> {
    raw: RawTrie<(), A>,
    key_len: usize,
    value_len: usize,
}

impl FixedTree {
    /// Create a new, empty [`FixedTree`] for keys of `key_len` bytes and
    /// values of `value_len` bytes.
    ///
    /// This function will not pre-allocate anything.
    pub const fn new(key_len: usize, value_len: usize) -> Self {
        Self::new_in(key_len, value_len, Global)
    }
}

impl<A: Allocator> FixedTree<A> {
    /// Create a new, empty [`FixedTree`] for keys of `key_len` bytes and
    /// values of `value_len` bytes, which will allocate nodes using the given
    /// allocator.
    ///
    /// This function will not pre-allocate anything.
    pub const fn new_in(key_len: usize, value_len: usize, alloc: A) -> Self {
        FixedTree {
            raw: RawTrie::new_in(alloc),
            key_len,
            value_len,
        }
    }

    /// Returns a reference to the underlying allocator.
    pub fn allocator(&self) -> &A {
        self.raw.allocator()
    }

    /// The length of every key in the tree.
    pub fn key_len(&self) -> usize {
        self.key_len
    }

    /// The length of every value in the tree.
    pub fn value_len(&self) -> usize {
        self.value_len
    }

    /// Returns the number of entries in the tree.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree contains no entries.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Remove every entry from the tree and release all nodes.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    fn find(&self, key: &[u8]) -> Option<&LeafNode<(), A>> {
        if key.len() != self.key_len {
            return None;
        }
        self.raw.get(key)
    }

    /// Returns true if the tree contains `key`.
    ///
    /// A key with the wrong length is never contained in the tree.
    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_some()
    }

    /// Returns the value bytes stored with `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::FixedTree;
    ///
    /// let mut tree = FixedTree::new(2, 1);
    /// tree.insert(&[1, 2], &[3]).unwrap();
    /// assert_eq!(tree.get(&[1, 2]), Some([3].as_slice()));
    /// assert_eq!(tree.get(&[1]), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let leaf = self.find(key)?;
        Some(&leaf.bytes()[self.key_len..])
    }

    /// Returns the stored key and value bytes for `key`.
    pub fn get_key_value(&self, key: &[u8]) -> Option<(&[u8], &[u8])> {
        let leaf = self.find(key)?;
        Some(leaf.bytes().split_at(self.key_len))
    }

    /// Returns the value bytes stored with `key`, which can be modified in
    /// place.
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut [u8]> {
        if key.len() != self.key_len {
            return None;
        }
        let leaf = self.raw.get_mut(key)?;
        Some(&mut leaf.bytes_mut()[self.key_len..])
    }

    fn check_lengths(&self, key: &[u8], value: &[u8]) -> Result<(), Error> {
        if key.len() != self.key_len {
            return Err(Error::KeyLength {
                expected: self.key_len,
                actual: key.len(),
            });
        }
        if value.len() != self.value_len {
            return Err(Error::ValueLength {
                expected: self.value_len,
                actual: value.len(),
            });
        }
        Ok(())
    }

    /// Insert `key` with `value`, or hand the value bytes of the existing
    /// entry to `update`.
    pub(crate) fn insert_with<R>(
        &mut self,
        key: &[u8],
        value: &[u8],
        update: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<Option<R>, Error>
    where
        A: Clone,
    {
        self.check_lengths(key, value)?;
        let key_len = self.key_len;
        self.raw.insert(key, &[key, value], (), |leaf, ()| {
            update(&mut leaf.bytes_mut()[key_len..])
        })
    }

    /// Insert `key` with `value`, overwriting the value of an existing entry.
    ///
    /// # Errors
    ///
    ///  - [`Error::KeyLength`] or [`Error::ValueLength`] if an argument does
    ///    not have the configured length. Nothing is allocated in this case.
    ///  - [`Error::AllocationFailed`] if a node could not be allocated.
    ///
    /// The tree is unchanged when an error is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::{Error, FixedTree, Insertion};
    ///
    /// let mut tree = FixedTree::new(2, 1);
    /// assert_eq!(tree.insert(&[1, 2], &[3]), Ok(Insertion::Inserted));
    /// assert_eq!(tree.insert(&[1, 2], &[4]), Ok(Insertion::Updated));
    /// assert_eq!(
    ///     tree.insert(&[1, 2, 3], &[4]),
    ///     Err(Error::KeyLength { expected: 2, actual: 3 })
    /// );
    /// ```
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<Insertion, Error>
    where
        A: Clone,
    {
        let outcome = self.insert_with(key, value, |stored| stored.copy_from_slice(value))?;
        Ok(match outcome {
            None => Insertion::Inserted,
            Some(()) => Insertion::Updated,
        })
    }

    pub(crate) fn remove_leaf(&mut self, key: &[u8]) -> Option<LeafNode<(), A>> {
        if key.len() != self.key_len {
            return None;
        }
        self.raw.remove(key)
    }

    /// Remove `key` from the tree, returning true if it was present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.remove_leaf(key).is_some()
    }

    fn check_prefix(&self, prefix: &[u8]) -> Result<(), Error> {
        if prefix.len() > self.key_len {
            return Err(Error::PrefixLength {
                max: self.key_len,
                actual: prefix.len(),
            });
        }
        Ok(())
    }

    /// Call `visit` with the key and value of every entry whose key starts
    /// with `prefix`, in sorted order.
    ///
    /// The enumeration stops early when `visit` returns
    /// [`ControlFlow::Break`], and is aborted with [`PrefixError::Visitor`]
    /// when `visit` fails.
    ///
    /// # Errors
    ///
    /// Returns [`PrefixError::Length`] without visiting anything if `prefix`
    /// is longer than the keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use critbit::{Enumeration, FixedTree};
    /// use std::{convert::Infallible, ops::ControlFlow};
    ///
    /// let mut tree = FixedTree::new(2, 1);
    /// tree.insert(&[1, 1], &[10]).unwrap();
    /// tree.insert(&[1, 2], &[20]).unwrap();
    /// tree.insert(&[2, 1], &[30]).unwrap();
    ///
    /// let mut total = 0;
    /// let outcome = tree.for_each_prefixed(&[1], |_, value| {
    ///     total += value[0];
    ///     Ok::<_, Infallible>(ControlFlow::Continue(()))
    /// });
    /// assert_eq!(outcome, Ok(Enumeration::AllVisited));
    /// assert_eq!(total, 30);
    /// ```
    pub fn for_each_prefixed<E, F>(
        &self,
        prefix: &[u8],
        mut visit: F,
    ) -> Result<Enumeration, PrefixError<E>>
    where
        F: FnMut(&[u8], &[u8]) -> Result<ControlFlow<()>, E>,
    {
        self.check_prefix(prefix).map_err(PrefixError::Length)?;
        self.raw
            .for_each_prefixed(prefix, |leaf| {
                let (key, value) = leaf.bytes().split_at(self.key_len);
                visit(key, value)
            })
            .map_err(PrefixError::Visitor)
    }

    pub(crate) fn prefix_leaves(&self, prefix: &[u8]) -> Result<Leaves<'_, (), A>, Error> {
        self.check_prefix(prefix)?;
        Ok(self.raw.prefix(prefix))
    }

    /// Iterate over the entries whose key starts with `prefix`, in sorted
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PrefixLength`] if `prefix` is longer than the keys.
    pub fn prefix(&self, prefix: &[u8]) -> Result<Prefix<'_, A>, Error> {
        Ok(Prefix {
            leaves: self.prefix_leaves(prefix)?,
            key_len: self.key_len,
        })
    }

    pub(crate) fn leaves(&self) -> Leaves<'_, (), A> {
        self.raw.leaves()
    }

    /// Iterate over all entries in sorted order.
    pub fn iter(&self) -> Iter<'_, A> {
        Iter {
            leaves: self.leaves(),
            key_len: self.key_len,
        }
    }

    /// Returns the entry with the minimum key.
    pub fn first_key_value(&self) -> Option<(&[u8], &[u8])> {
        Some(self.raw.first()?.bytes().split_at(self.key_len))
    }

    /// Returns the entry with the maximum key.
    pub fn last_key_value(&self) -> Option<(&[u8], &[u8])> {
        Some(self.raw.last()?.bytes().split_at(self.key_len))
    }

    /// Walk the whole tree and verify its structural invariants, returning
    /// the number of leaves.
    pub fn check_well_formed(&self) -> Result<usize, MalformedTreeError> {
        self.raw.check_well_formed(KeyFormat::Fixed {
            key_len: self.key_len,
            value_len: self.value_len,
        })
    }

    /// Collect statistics about the shape of the tree.
    pub fn stats(&self) -> TreeStats {
        self.raw.stats()
    }
}

impl<A: Allocator> fmt::Debug for FixedTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<A: Allocator, B: Allocator> PartialEq<FixedTree<B>> for FixedTree<A> {
    fn eq(&self, other: &FixedTree<B>) -> bool {
        self.key_len == other.key_len
            && self.value_len == other.value_len
            && self.len() == other.len()
            && self.iter().eq(other.iter())
    }
}

impl<A: Allocator> Eq for FixedTree<A> {}

impl<'a, A: Allocator> IntoIterator for &'a FixedTree<A> {
    type IntoIter = Iter<'a, A>;
    type Item = (&'a [u8], &'a [u8]);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`FixedTree`], as key and value bytes.
///
/// This struct is created by the [`iter`](FixedTree::iter) method.
pub struct Iter<'a, A: Allocator = Global> {
    leaves: Leaves<'a, (), A>,
    key_len: usize,
}

impl<'a, A: Allocator> Iter<'a, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<(), A>) -> (&'a [u8], &'a [u8]) {
        leaf.bytes().split_at(self.key_len)
    }
}

impl_leaf_iterator!(impl<'a, A: Allocator> for Iter<'a, A> => (&'a [u8], &'a [u8]));

impl<A: Allocator> ExactSizeIterator for Iter<'_, A> {}

/// An iterator over the entries of a [`FixedTree`] whose keys start with a
/// common prefix.
///
/// This struct is created by the [`prefix`](FixedTree::prefix) method.
pub struct Prefix<'a, A: Allocator = Global> {
    leaves: Leaves<'a, (), A>,
    key_len: usize,
}

impl<'a, A: Allocator> Prefix<'a, A> {
    fn map_leaf(&self, leaf: &'a LeafNode<(), A>) -> (&'a [u8], &'a [u8]) {
        leaf.bytes().split_at(self.key_len)
    }
}

impl_leaf_iterator!(impl<'a, A: Allocator> for Prefix<'a, A> => (&'a [u8], &'a [u8]));

macro_rules! impl_clone_and_debug {
    ($($name:ident),*) => {
        $(
            impl<A: Allocator> Clone for $name<'_, A> {
                fn clone(&self) -> Self {
                    $name {
                        leaves: self.leaves.clone(),
                        key_len: self.key_len,
                    }
                }
            }

            impl<A: Allocator> fmt::Debug for $name<'_, A> {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($name))
                        .field("leaves", &self.leaves)
                        .field("key_len", &self.key_len)
                        .finish()
                }
            }
        )*
    };
}

impl_clone_and_debug!(Iter, Prefix);
