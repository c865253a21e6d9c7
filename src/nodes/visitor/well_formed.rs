use crate::{
    allocator::Allocator,
    visitor::{Visitable, Visitor},
    CriticalBit, InnerNode, LeafNode, Node,
};
use alloc::{boxed::Box, vec::Vec};
use core::{error::Error, fmt};

/// How the keys of a tree are laid out in the leaf buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// Every leaf buffer is a key followed by a single NUL byte, with no other
    /// NUL bytes.
    NulTerminated,
    /// Every leaf buffer is `key_len` key bytes followed by `value_len` value
    /// bytes.
    Fixed {
        /// Length of every key
        key_len: usize,
        /// Length of every value
        value_len: usize,
    },
}

impl KeyFormat {
    /// The part of a leaf buffer that is the key.
    fn key_of<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        match self {
            KeyFormat::NulTerminated => bytes,
            KeyFormat::Fixed { key_len, .. } => &bytes[..(*key_len).min(bytes.len())],
        }
    }

    fn is_valid_leaf(&self, bytes: &[u8]) -> bool {
        match self {
            KeyFormat::NulTerminated => {
                matches!(bytes.split_last(), Some((0, key)) if !key.contains(&0))
            },
            KeyFormat::Fixed { key_len, value_len } => bytes.len() == key_len + value_len,
        }
    }
}

/// An issue with the well-formed-ness of the tree. See the documentation on
/// [`WellFormedChecker`] for more context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// An inner node tests a bit that does not come strictly after the bit
    /// tested by its parent
    CriticalBitOutOfOrder {
        /// The critical bit of the parent
        parent: CriticalBit,
        /// The critical bit of the child
        child: CriticalBit,
    },
    /// An inner node of a fixed length tree tests a bit past the end of the
    /// keys
    CriticalBitPastKeyEnd {
        /// The critical bit of the inner node
        critical_bit: CriticalBit,
        /// The length of every key in the tree
        key_len: usize,
    },
    /// A leaf was found under the child of an inner node that does not match
    /// its bit
    KeyOnWrongSide {
        /// The entire leaf key
        key: Box<[u8]>,
        /// The critical bit of the inner node
        critical_bit: CriticalBit,
        /// `true` if the leaf was found under the right child
        found_right: bool,
    },
    /// A leaf buffer does not have the layout the tree expects
    MalformedLeaf {
        /// The entire leaf buffer
        bytes: Box<[u8]>,
        /// The expected layout
        format: KeyFormat,
    },
    /// The leaves were not in strictly increasing key order
    UnsortedLeaves {
        /// The key of the earlier leaf
        previous: Box<[u8]>,
        /// The key of the later leaf
        next: Box<[u8]>,
    },
    /// The number of leaves in the tree does not match the recorded length
    WrongEntryCount {
        /// The length recorded by the tree
        expected: usize,
        /// The number of leaves found
        actual: usize,
    },
    /// The length of the tree is not 0, even though the root is
    /// [`Option::None`]
    EmptyTreeWithLen,
}

impl fmt::Display for MalformedTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTreeError::CriticalBitOutOfOrder { parent, child } => write!(
                f,
                "Found an inner node with critical bit [{child:?}] below an inner node with \
                 critical bit [{parent:?}], but child bits must come strictly after their parent"
            ),
            MalformedTreeError::CriticalBitPastKeyEnd {
                critical_bit,
                key_len,
            } => write!(
                f,
                "Found an inner node with critical bit [{critical_bit:?}] in a tree where all keys \
                 are [{key_len}] bytes long"
            ),
            MalformedTreeError::KeyOnWrongSide {
                key,
                critical_bit,
                found_right,
            } => {
                let side = if *found_right { "right" } else { "left" };
                write!(
                    f,
                    "Found the leaf with key [{key:?}] under the {side} child of an inner node \
                     with critical bit [{critical_bit:?}]"
                )
            },
            MalformedTreeError::MalformedLeaf { bytes, format } => write!(
                f,
                "Found a leaf with bytes [{bytes:?}] that does not match the key format \
                 [{format:?}]"
            ),
            MalformedTreeError::UnsortedLeaves { previous, next } => write!(
                f,
                "Found the leaf with key [{next:?}] after the leaf with key [{previous:?}], but \
                 leaves must be in increasing order"
            ),
            MalformedTreeError::WrongEntryCount { expected, actual } => write!(
                f,
                "Found [{actual}] leaves, but the tree length is [{expected}]"
            ),
            MalformedTreeError::EmptyTreeWithLen => write!(
                f,
                "The length of the tree is not 0, even though the root is None"
            ),
        }
    }
}

impl Error for MalformedTreeError {}

/// A visitor of the trie which checks that the tree is well-formed.
///
/// In this context, well-formed means that in the tree:
///  1. along every path from the root, the critical bits are strictly
///     increasing (later byte, or same byte and less significant bit)
///  2. every leaf under the left child of an inner node has its critical bit
///     cleared, and every leaf under the right child has it set
///  3. every leaf buffer matches the [`KeyFormat`] of the tree, and for fixed
///     length trees no critical bit is past the end of the keys
///  4. an in-order walk visits the keys in strictly increasing order
///  5. the number of leaves matches the length recorded by the tree
///
/// This checker will only return a single issue at a time. A tree is only
/// well-formed if the checker returns `Ok`.
#[derive(Debug)]
pub struct WellFormedChecker {
    format: KeyFormat,
    /// The critical bits of the inner nodes on the current path, with the
    /// side that was taken
    path: Vec<(CriticalBit, bool)>,
    previous_key: Option<Box<[u8]>>,
    num_leaves: usize,
}

impl WellFormedChecker {
    /// Traverse the tree rooted at the optional `root` and check that it is
    /// well-formed. Returns the number of leaves in the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the given tree is not well-formed.
    pub fn check_tree<T, A: Allocator>(
        root: Option<&Node<T, A>>,
        num_entries: usize,
        format: KeyFormat,
    ) -> Result<usize, MalformedTreeError> {
        match root {
            Some(root) => Self::check(root, num_entries, format),
            None if num_entries == 0 => Ok(0),
            None => Err(MalformedTreeError::EmptyTreeWithLen),
        }
    }

    /// Traverse the tree rooted at `root` and check that it is well-formed.
    /// Returns the number of leaves in the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the given tree is not well-formed.
    pub fn check<T, A: Allocator>(
        root: &Node<T, A>,
        num_entries: usize,
        format: KeyFormat,
    ) -> Result<usize, MalformedTreeError> {
        let mut checker = WellFormedChecker {
            format,
            path: Vec::new(),
            previous_key: None,
            num_leaves: 0,
        };

        root.visit_with(&mut checker)?;

        if checker.num_leaves == num_entries {
            Ok(checker.num_leaves)
        } else {
            Err(MalformedTreeError::WrongEntryCount {
                expected: num_entries,
                actual: checker.num_leaves,
            })
        }
    }
}

impl<T, A: Allocator> Visitor<T, A> for WellFormedChecker {
    type Output = Result<(), MalformedTreeError>;

    fn default_output(&self) -> Self::Output {
        Ok(())
    }

    fn combine_output(&self, o1: Self::Output, o2: Self::Output) -> Self::Output {
        o1.and(o2)
    }

    fn visit_inner(&mut self, t: &InnerNode<T, A>) -> Self::Output {
        let critical_bit = t.critical_bit;

        if let Some(&(parent, _)) = self.path.last() {
            if critical_bit <= parent {
                return Err(MalformedTreeError::CriticalBitOutOfOrder {
                    parent,
                    child: critical_bit,
                });
            }
        }

        if let KeyFormat::Fixed { key_len, .. } = self.format {
            if critical_bit.byte_index() >= key_len {
                return Err(MalformedTreeError::CriticalBitPastKeyEnd {
                    critical_bit,
                    key_len,
                });
            }
        }

        for (side, child) in [(false, t.left()), (true, t.right())] {
            self.path.push((critical_bit, side));
            let result = child.visit_with(self);
            self.path.pop();
            result?;
        }

        Ok(())
    }

    fn visit_leaf(&mut self, t: &LeafNode<T, A>) -> Self::Output {
        let bytes = t.bytes();
        if !self.format.is_valid_leaf(bytes) {
            return Err(MalformedTreeError::MalformedLeaf {
                bytes: bytes.into(),
                format: self.format,
            });
        }

        let key = self.format.key_of(bytes);
        if let Some(&(critical_bit, found_right)) = self
            .path
            .iter()
            .find(|(critical_bit, right)| critical_bit.is_set(key) != *right)
        {
            return Err(MalformedTreeError::KeyOnWrongSide {
                key: key.into(),
                critical_bit,
                found_right,
            });
        }

        if let Some(previous) = self.previous_key.take() {
            if *previous >= *key {
                return Err(MalformedTreeError::UnsortedLeaves {
                    previous,
                    next: key.into(),
                });
            }
        }

        self.previous_key = Some(key.into());
        self.num_leaves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_common::{leaf, split, tree_from_keys};

    const STRINGS: KeyFormat = KeyFormat::NulTerminated;

    #[test]
    fn well_formed_trees() {
        let root = tree_from_keys([
            b"a\0".as_slice(),
            b"aa\0".as_slice(),
            b"aaz\0".as_slice(),
            b"abz\0".as_slice(),
            b"bba\0".as_slice(),
        ])
        .unwrap();
        assert_eq!(WellFormedChecker::check(&root, 5, STRINGS), Ok(5));

        let root = tree_from_keys([[0u8, 1], [0, 2], [7, 0]]).unwrap();
        let format = KeyFormat::Fixed {
            key_len: 2,
            value_len: 0,
        };
        assert_eq!(WellFormedChecker::check(&root, 3, format), Ok(3));
    }

    #[test]
    fn empty_tree() {
        assert_eq!(
            WellFormedChecker::check_tree::<(), crate::allocator::Global>(None, 0, STRINGS),
            Ok(0)
        );
        assert_eq!(
            WellFormedChecker::check_tree::<(), crate::allocator::Global>(None, 1, STRINGS),
            Err(MalformedTreeError::EmptyTreeWithLen)
        );
    }

    #[test]
    fn wrong_entry_count() {
        let root = tree_from_keys([b"a\0".as_slice(), b"b\0".as_slice()]).unwrap();
        assert_eq!(
            WellFormedChecker::check(&root, 3, STRINGS),
            Err(MalformedTreeError::WrongEntryCount {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn critical_bits_out_of_order() {
        let root = split(
            1,
            0b0000_0001,
            split(0, 0b1000_0000, leaf(b"a\0", ()), leaf(b"\xE1\0", ())),
            leaf(b"ab\0", ()),
        );

        let err = WellFormedChecker::check(&root, 3, STRINGS).unwrap_err();
        assert_eq!(
            err,
            MalformedTreeError::CriticalBitOutOfOrder {
                parent: CriticalBit::new(1, 0b0000_0001).unwrap(),
                child: CriticalBit::new(0, 0b1000_0000).unwrap(),
            }
        );
    }

    #[test]
    fn leaf_on_wrong_side() {
        // "b" has bit 0b10 of byte 0 set, so it belongs on the right
        let root = split(0, 0b0000_0010, leaf(b"b\0", ()), leaf(b"a\0", ()));

        assert_eq!(
            WellFormedChecker::check(&root, 2, STRINGS),
            Err(MalformedTreeError::KeyOnWrongSide {
                key: b"b\0".as_slice().into(),
                critical_bit: CriticalBit::new(0, 0b0000_0010).unwrap(),
                found_right: false,
            })
        );
    }

    #[test]
    fn malformed_leaves() {
        let root = leaf(b"a\0b\0", ());
        assert!(matches!(
            WellFormedChecker::check(&root, 1, STRINGS),
            Err(MalformedTreeError::MalformedLeaf { .. })
        ));

        let root = leaf(b"abc", ());
        assert!(matches!(
            WellFormedChecker::check(&root, 1, STRINGS),
            Err(MalformedTreeError::MalformedLeaf { .. })
        ));

        let format = KeyFormat::Fixed {
            key_len: 2,
            value_len: 2,
        };
        assert_eq!(WellFormedChecker::check(&leaf(&[1, 2, 3, 4], ()), 1, format), Ok(1));
        assert!(matches!(
            WellFormedChecker::check(&leaf(&[1, 2, 3], ()), 1, format),
            Err(MalformedTreeError::MalformedLeaf { .. })
        ));
    }

    #[test]
    fn critical_bit_past_key_end() {
        let root = split(2, 0b0000_0001, leaf(&[0, 0, 0], ()), leaf(&[0, 0, 1], ()));
        let format = KeyFormat::Fixed {
            key_len: 2,
            value_len: 1,
        };

        assert_eq!(
            WellFormedChecker::check(&root, 2, format),
            Err(MalformedTreeError::CriticalBitPastKeyEnd {
                critical_bit: CriticalBit::new(2, 0b0000_0001).unwrap(),
                key_len: 2,
            })
        );
    }

    #[test]
    fn display_errors() {
        let err = MalformedTreeError::WrongEntryCount {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            alloc::format!("{err}"),
            "Found [2] leaves, but the tree length is [3]"
        );
    }
}
