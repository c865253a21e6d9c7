#![no_main]

use critbit::StringTree;
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use std::{
    collections::BTreeMap,
    convert::Infallible,
    ffi::CString,
    ops::ControlFlow,
};

#[derive(Arbitrary, Debug)]
enum Action {
    Clear,
    Contains(CString),
    GetMinimum,
    GetMaximum,
    GetMut(CString),
    Remove(CString),
    Insert(CString),
    Prefix(Box<[u8]>),
    ForEachPrefixed { prefix: Box<[u8]>, stop_after: u8 },
    CheckIter,
}

libfuzzer_sys::fuzz_target!(|actions: Vec<Action>| {
    let mut tree = StringTree::<u32>::new();
    let mut oracle = BTreeMap::<CString, u32>::new();
    let mut next_value = 0;

    for action in actions {
        match action {
            Action::Clear => {
                tree.clear();
                oracle.clear();
            },
            Action::Contains(key) => {
                assert_eq!(tree.contains(&key), oracle.contains_key(&key));
            },
            Action::GetMinimum => {
                let min = tree.first_key_value();
                assert_eq!(min, oracle.first_key_value().map(|(k, v)| (k.as_c_str(), v)));
            },
            Action::GetMaximum => {
                let max = tree.last_key_value();
                assert_eq!(max, oracle.last_key_value().map(|(k, v)| (k.as_c_str(), v)));
            },
            Action::GetMut(key) => {
                let value = tree.get_mut(&key);
                assert_eq!(value, oracle.get_mut(&key));
                if let Some(value) = value {
                    *value = value.saturating_sub(1);
                }
            },
            Action::Remove(key) => {
                let value = tree.remove(&key);
                assert_eq!(value, oracle.remove(&key));
                if let Some(value) = value {
                    assert!(value < next_value);
                }
            },
            Action::Insert(key) => {
                let value = next_value;
                next_value += 1;

                let old = tree.insert(&key, value).expect("global allocator failed");
                assert_eq!(old, oracle.insert(key, value));
            },
            Action::Prefix(prefix) => {
                let expected = oracle
                    .iter()
                    .filter(|(k, _)| k.as_bytes_with_nul().starts_with(&prefix))
                    .map(|(k, v)| (k.as_c_str(), v));
                assert!(tree.prefix(&prefix).eq(expected.clone()));
                assert!(tree.prefix(&prefix).rev().eq(expected.rev()));
            },
            Action::ForEachPrefixed { prefix, stop_after } => {
                let mut visited = Vec::new();
                let outcome = tree.for_each_prefixed(&prefix, |key, _| {
                    visited.push(key.to_owned());
                    if visited.len() == usize::from(stop_after) {
                        Ok::<_, Infallible>(ControlFlow::Break(()))
                    } else {
                        Ok(ControlFlow::Continue(()))
                    }
                });
                assert!(outcome.is_ok());
                assert!(tree
                    .prefix(&prefix)
                    .map(|(k, _)| k)
                    .take(visited.len())
                    .eq(visited.iter().map(CString::as_c_str)));
            },
            Action::CheckIter => {
                assert!(tree.keys().is_sorted());
                assert!(tree.keys().rev().is_sorted_by(|a, b| a >= b));
                assert_eq!(tree.iter().count(), tree.len());
                assert_eq!(tree.iter().rev().count(), tree.len());
            },
        }

        assert_eq!(tree.len(), oracle.len());
        assert!(tree.iter().eq(oracle.iter().map(|(k, v)| (k.as_c_str(), v))));
        tree.check_well_formed().expect("tree should be well-formed");
    }
});
