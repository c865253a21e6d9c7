use crate::{allocator::Allocator, Node};

/// Find the root of the subtree holding every key that starts with `prefix`.
///
/// The descent follows `prefix` through every inner node that tests a bit
/// inside it. Past the end of the prefix it keeps going down to some leaf
/// without moving the subtree root, and that leaf decides: if it starts with
/// `prefix` then so does every leaf of the subtree, and no leaf outside of it
/// does. Returns `None` if no key starts with `prefix`.
///
/// The comparison is byte-wise, so for fixed length trees a prefix must not
/// be longer than the keys.
pub(crate) fn locate_prefix<'a, V, A: Allocator>(
    root: &'a Node<V, A>,
    prefix: &[u8],
) -> Option<&'a Node<V, A>> {
    let mut top = root;
    let mut node = root;

    let leaf = loop {
        match node {
            Node::Leaf(leaf) => break leaf,
            Node::Inner(inner) => {
                node = inner.child_for(prefix);
                if inner.critical_bit.byte_index() < prefix.len() {
                    top = node;
                }
            },
        }
    };

    leaf.matches_key(prefix).then_some(top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        nodes::Leaves,
        tests_common::{generate_key_fixed_length, tree_from_keys},
    };
    use alloc::vec::Vec;

    fn prefixed<'a>(root: &'a Node<usize>, prefix: &[u8]) -> Vec<&'a [u8]> {
        locate_prefix(root, prefix)
            .map(|top| Leaves::new(top, None).map(|leaf| leaf.bytes()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn locate_prefix_of_strings() {
        let root = tree_from_keys([
            b"a\0".as_slice(),
            b"aa\0".as_slice(),
            b"aaz\0".as_slice(),
            b"abz\0".as_slice(),
            b"bba\0".as_slice(),
        ])
        .unwrap();

        assert_eq!(
            prefixed(&root, b"a"),
            [
                b"a\0".as_slice(),
                b"aa\0".as_slice(),
                b"aaz\0".as_slice(),
                b"abz\0".as_slice()
            ]
        );
        assert_eq!(prefixed(&root, b"aa"), [b"aa\0".as_slice(), b"aaz\0".as_slice()]);
        assert_eq!(prefixed(&root, b"b"), [b"bba\0".as_slice()]);
        assert_eq!(prefixed(&root, b"abz\0"), [b"abz\0".as_slice()]);
        assert_eq!(prefixed(&root, b"").len(), 5);
        assert!(prefixed(&root, b"c").is_empty());
        assert!(prefixed(&root, b"ac").is_empty());
        assert!(prefixed(&root, b"aaa").is_empty());
        assert!(prefixed(&root, b"bbaa").is_empty());
    }

    #[test]
    fn locate_prefix_stops_at_prefix_end() {
        // The subtree for "ab" is a single leaf, even though "ab" splits from
        // "aa" above it.
        let root = tree_from_keys([b"aa\0".as_slice(), b"abc\0".as_slice()]).unwrap();
        let top = locate_prefix(&root, b"ab").unwrap();
        assert_eq!(top.as_leaf().unwrap().bytes(), b"abc\0");

        let top = locate_prefix(&root, b"a").unwrap();
        assert!(top.as_inner().is_some());
    }

    #[test]
    fn locate_prefix_of_fixed_length_keys() {
        let keys: Vec<_> = generate_key_fixed_length(3, 3).collect();
        let root = tree_from_keys(&keys).unwrap();

        for first in [0u8, 85, 170, 255] {
            let expected: Vec<_> = keys
                .iter()
                .filter(|key| key[0] == first)
                .map(|key| key.as_slice())
                .collect();
            assert_eq!(prefixed(&root, &[first]), expected);
        }

        assert_eq!(prefixed(&root, &[85, 170, 0]), [[85, 170, 0].as_slice()]);
        assert!(prefixed(&root, &[1]).is_empty());
        assert!(prefixed(&root, &[85, 171]).is_empty());
    }
}
