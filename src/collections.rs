//! Trie based collections

use crate::allocator::AllocError;
use core::{error::Error as StdError, fmt};

/// Implement [`Iterator`], [`DoubleEndedIterator`] and [`FusedIterator`] for
/// a struct with a `leaves: Leaves` field and a `map_leaf` method.
///
/// [`FusedIterator`]: core::iter::FusedIterator
macro_rules! impl_leaf_iterator {
    (
        impl<$lt:lifetime $(, $param:ident $(: $bound:path)?)*> for $ty:ty => $item:ty
    ) => {
        impl<$lt $(, $param $(: $bound)?)*> Iterator for $ty {
            type Item = $item;

            fn next(&mut self) -> Option<Self::Item> {
                let leaf = self.leaves.next()?;
                Some(self.map_leaf(leaf))
            }

            fn size_hint(&self) -> (usize, Option<usize>) {
                self.leaves.size_hint()
            }

            fn last(mut self) -> Option<Self::Item> {
                self.next_back()
            }
        }

        impl<$lt $(, $param $(: $bound)?)*> DoubleEndedIterator for $ty {
            fn next_back(&mut self) -> Option<Self::Item> {
                let leaf = self.leaves.next_back()?;
                Some(self.map_leaf(leaf))
            }
        }

        impl<$lt $(, $param $(: $bound)?)*> ::core::iter::FusedIterator for $ty {}
    };
}

pub mod fixed_tree;
pub mod pod_map;
mod raw;
pub mod string_tree;

pub use fixed_tree::FixedTree;
pub use pod_map::PodMap;
pub(crate) use raw::*;
pub use string_tree::StringTree;

/// Errors returned by the fallible tree operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The tree allocator could not provide memory for a new node. The tree
    /// was left unchanged.
    AllocationFailed,
    /// The key passed to a fixed length tree did not have the configured key
    /// length.
    KeyLength {
        /// The configured key length
        expected: usize,
        /// The length of the key that was passed
        actual: usize,
    },
    /// The value passed to a fixed length tree did not have the configured
    /// value length.
    ValueLength {
        /// The configured value length
        expected: usize,
        /// The length of the value that was passed
        actual: usize,
    },
    /// The prefix passed to a fixed length tree was longer than the keys.
    PrefixLength {
        /// The configured key length
        max: usize,
        /// The length of the prefix that was passed
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocationFailed => write!(f, "Memory allocation failed, tree is unchanged."),
            Error::KeyLength { expected, actual } => write!(
                f,
                "Key has length [{actual}], but the tree only stores keys of length [{expected}]."
            ),
            Error::ValueLength { expected, actual } => write!(
                f,
                "Value has length [{actual}], but the tree only stores values of length \
                 [{expected}]."
            ),
            Error::PrefixLength { max, actual } => write!(
                f,
                "Prefix has length [{actual}], which is longer than the key length [{max}]."
            ),
        }
    }
}

impl StdError for Error {}

impl From<AllocError> for Error {
    fn from(_: AllocError) -> Self {
        Error::AllocationFailed
    }
}

/// The error returned by a prefix enumeration that can fail either before it
/// starts, or inside the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrefixError<E> {
    /// The prefix was rejected, no entries were visited
    Length(Error),
    /// The visitor returned this error and the enumeration was aborted
    Visitor(E),
}

impl<E: fmt::Display> fmt::Display for PrefixError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixError::Length(err) => write!(f, "Invalid prefix: {err}"),
            PrefixError::Visitor(err) => write!(f, "Prefix visitor failed: {err}"),
        }
    }
}

impl<E: StdError + 'static> StdError for PrefixError<E> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            PrefixError::Length(err) => Some(err),
            PrefixError::Visitor(err) => Some(err),
        }
    }
}

/// The outcome of a successful insert into a [`FixedTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// The key was not present and a new entry was created
    Inserted,
    /// The key was present and its value was overwritten
    Updated,
}

/// The outcome of a prefix enumeration whose visitor did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Enumeration {
    /// Every entry with the prefix was passed to the visitor
    AllVisited,
    /// The visitor returned [`ControlFlow::Break`] before the last entry
    ///
    /// [`ControlFlow::Break`]: core::ops::ControlFlow::Break
    StoppedEarly,
}
