#![no_main]

use critbit::{FixedTree, Insertion};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use std::collections::BTreeMap;

const KEY_LEN: usize = 3;
const VALUE_LEN: usize = 2;

#[derive(Arbitrary, Debug)]
enum Action {
    Clear,
    Contains([u8; KEY_LEN]),
    Get(Box<[u8]>),
    GetMinimum,
    GetMaximum,
    Remove([u8; KEY_LEN]),
    Insert(Box<[u8]>, [u8; VALUE_LEN]),
    Prefix(Box<[u8]>),
}

libfuzzer_sys::fuzz_target!(|actions: Vec<Action>| {
    let mut tree = FixedTree::new(KEY_LEN, VALUE_LEN);
    let mut oracle = BTreeMap::<[u8; KEY_LEN], [u8; VALUE_LEN]>::new();

    for action in actions {
        match action {
            Action::Clear => {
                tree.clear();
                oracle.clear();
            },
            Action::Contains(key) => {
                assert_eq!(tree.contains(&key), oracle.contains_key(&key));
            },
            Action::Get(key) => {
                let expected = <[u8; KEY_LEN]>::try_from(&*key)
                    .ok()
                    .and_then(|key| oracle.get(&key));
                assert_eq!(tree.get(&key), expected.map(|value| value.as_slice()));
            },
            Action::GetMinimum => {
                let min = tree.first_key_value();
                assert_eq!(
                    min,
                    oracle
                        .first_key_value()
                        .map(|(k, v)| (k.as_slice(), v.as_slice()))
                );
            },
            Action::GetMaximum => {
                let max = tree.last_key_value();
                assert_eq!(
                    max,
                    oracle
                        .last_key_value()
                        .map(|(k, v)| (k.as_slice(), v.as_slice()))
                );
            },
            Action::Remove(key) => {
                assert_eq!(tree.remove(&key), oracle.remove(&key).is_some());
            },
            Action::Insert(key, value) => match <[u8; KEY_LEN]>::try_from(&*key) {
                Ok(fixed) => {
                    let expected = match oracle.insert(fixed, value) {
                        None => Insertion::Inserted,
                        Some(_) => Insertion::Updated,
                    };
                    assert_eq!(tree.insert(&key, &value), Ok(expected));
                },
                Err(_) => {
                    assert!(tree.insert(&key, &value).is_err());
                },
            },
            Action::Prefix(prefix) => match tree.prefix(&prefix) {
                Ok(entries) => {
                    assert!(prefix.len() <= KEY_LEN);
                    let expected = oracle
                        .iter()
                        .filter(|(k, _)| k.starts_with(&prefix))
                        .map(|(k, v)| (k.as_slice(), v.as_slice()));
                    assert!(entries.eq(expected));
                },
                Err(_) => assert!(prefix.len() > KEY_LEN),
            },
        }

        assert_eq!(tree.len(), oracle.len());
        assert!(tree
            .iter()
            .eq(oracle.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))));
        tree.check_well_formed().expect("tree should be well-formed");
    }
});
