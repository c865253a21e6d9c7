use super::*;
use crate::{
    allocator::Global,
    tests_common::{generate_string_keys, FailingAllocator},
};
use alloc::{vec, vec::Vec};

fn insert_str<A: Allocator + Clone>(
    trie: &mut RawTrie<usize, A>,
    key: &[u8],
    value: usize,
) -> Result<Option<usize>, Error> {
    trie.insert(key, &[key], value, |leaf, value| {
        core::mem::replace(leaf.value_mut(), value)
    })
}

#[test]
fn insert_update_remove() {
    let mut trie = RawTrie::new_in(Global);
    assert!(trie.is_empty());
    assert!(trie.get(b"a\0").is_none());

    assert_eq!(insert_str(&mut trie, b"a\0", 1), Ok(None));
    assert_eq!(insert_str(&mut trie, b"ab\0", 2), Ok(None));
    assert_eq!(insert_str(&mut trie, b"a\0", 3), Ok(Some(1)));
    assert_eq!(trie.len(), 2);
    assert_eq!(trie.get(b"a\0").map(|leaf| *leaf.value_ref()), Some(3));

    *trie.get_mut(b"ab\0").unwrap().value_mut() += 10;
    assert_eq!(trie.get(b"ab\0").map(|leaf| *leaf.value_ref()), Some(12));

    assert_eq!(trie.remove(b"zz\0").map(|leaf| *leaf.value_ref()), None);
    assert_eq!(trie.remove(b"a\0").map(|leaf| *leaf.value_ref()), Some(3));
    assert_eq!(trie.len(), 1);
    assert_eq!(trie.remove(b"ab\0").map(|leaf| *leaf.value_ref()), Some(12));
    assert!(trie.is_empty());
    assert!(trie.root.is_none());
}

#[test]
fn insert_concatenates_parts() {
    let mut trie = RawTrie::new_in(Global);
    let outcome = trie.insert(b"key", &[b"key".as_slice(), b"value".as_slice()], (), |_, _| {});
    assert_eq!(outcome, Ok(None));
    assert_eq!(trie.first().unwrap().bytes(), b"keyvalue");
}

#[test]
fn prefix_size_hint() {
    let mut trie = RawTrie::new_in(Global);
    for (idx, key) in [b"a\0".as_slice(), b"ab\0".as_slice(), b"b\0".as_slice()]
        .into_iter()
        .enumerate()
    {
        insert_str(&mut trie, key, idx).unwrap();
    }

    assert_eq!(trie.prefix(b"").size_hint(), (3, Some(3)));
    assert_eq!(trie.prefix(b"a").count(), 2);
    assert_eq!(trie.prefix(b"c").size_hint(), (0, Some(0)));
    assert_eq!(trie.leaves().size_hint(), (3, Some(3)));
}

#[test]
fn for_each_prefixed_control_flow() {
    let mut trie = RawTrie::new_in(Global);
    for (idx, key) in generate_string_keys(50).enumerate() {
        insert_str(&mut trie, key.as_bytes_with_nul(), idx).unwrap();
    }

    let mut seen = 0;
    let outcome = trie.for_each_prefixed::<()>(b"", |_| {
        seen += 1;
        Ok(if seen == 10 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        })
    });
    assert_eq!(outcome, Ok(Enumeration::StoppedEarly));
    assert_eq!(seen, 10);

    let outcome = trie.for_each_prefixed(b"", |leaf| {
        if *leaf.value_ref() == 20 {
            Err(leaf.bytes().to_vec())
        } else {
            Ok(ControlFlow::Continue(()))
        }
    });
    assert_eq!(outcome, Err(vec![21, 0]));

    let outcome = trie.for_each_prefixed::<()>(b"\xFF", |_| unreachable!());
    assert_eq!(outcome, Ok(Enumeration::AllVisited));
}

#[test]
fn failed_root_allocation() {
    let alloc = FailingAllocator::failing_after(0);
    let mut trie = RawTrie::new_in(alloc.clone());

    assert_eq!(insert_str(&mut trie, b"a\0", 1), Err(Error::AllocationFailed));
    assert!(trie.is_empty());
    assert_eq!(alloc.live_allocations(), 0);
}

#[test]
fn failed_leaf_allocation() {
    let alloc = FailingAllocator::failing_after(1);
    let mut trie = RawTrie::new_in(alloc.clone());
    insert_str(&mut trie, b"a\0", 1).unwrap();

    assert_eq!(insert_str(&mut trie, b"b\0", 2), Err(Error::AllocationFailed));
    assert_eq!(trie.len(), 1);
    assert_eq!(alloc.live_allocations(), 1);
    assert_eq!(trie.check_well_formed(KeyFormat::NulTerminated), Ok(1));
}

#[test]
fn failed_inner_node_allocation() {
    let alloc = FailingAllocator::failing_after(2);
    let mut trie = RawTrie::new_in(alloc.clone());
    insert_str(&mut trie, b"a\0", 1).unwrap();

    // the leaf buffer is allocated, then the inner node fails
    assert_eq!(insert_str(&mut trie, b"b\0", 2), Err(Error::AllocationFailed));
    assert_eq!(trie.len(), 1);
    assert_eq!(alloc.live_allocations(), 1);
    assert!(trie.get(b"b\0").is_none());
    assert_eq!(trie.check_well_formed(KeyFormat::NulTerminated), Ok(1));

    alloc.set_remaining(2);
    assert_eq!(insert_str(&mut trie, b"b\0", 2), Ok(None));
    assert_eq!(alloc.live_allocations(), 3);
}

#[test]
fn update_does_not_allocate() {
    let alloc = FailingAllocator::failing_after(1);
    let mut trie = RawTrie::new_in(alloc.clone());
    insert_str(&mut trie, b"a\0", 1).unwrap();

    assert_eq!(insert_str(&mut trie, b"a\0", 2), Ok(Some(1)));
    assert_eq!(alloc.live_allocations(), 1);
}

#[test]
fn clear_and_drop_release_everything() {
    let alloc = FailingAllocator::unlimited();
    let mut trie = RawTrie::new_in(alloc.clone());
    let keys: Vec<_> = generate_string_keys(300).collect();
    for (idx, key) in keys.iter().enumerate() {
        insert_str(&mut trie, key.as_bytes_with_nul(), idx).unwrap();
    }
    assert_eq!(alloc.live_allocations(), 2 * keys.len() - 1);
    assert_eq!(trie.stats().num_leaves, keys.len());

    trie.clear();
    assert!(trie.is_empty());
    assert_eq!(alloc.live_allocations(), 0);
    trie.clear();
    assert!(trie.is_empty());

    for (idx, key) in keys.iter().enumerate().take(10) {
        insert_str(&mut trie, key.as_bytes_with_nul(), idx).unwrap();
    }
    assert_eq!(alloc.live_allocations(), 19);
    drop(trie);
    assert_eq!(alloc.live_allocations(), 0);
}

#[test]
fn first_and_last() {
    let mut trie = RawTrie::new_in(Global);
    assert!(trie.first().is_none());
    assert!(trie.last().is_none());

    for (idx, key) in [b"m\0".as_slice(), b"b\0".as_slice(), b"x\0".as_slice()]
        .into_iter()
        .enumerate()
    {
        insert_str(&mut trie, key, idx).unwrap();
    }
    assert_eq!(trie.first().unwrap().bytes(), b"b\0");
    assert_eq!(trie.last().unwrap().bytes(), b"x\0");
}
