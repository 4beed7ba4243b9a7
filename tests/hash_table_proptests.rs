// HashTable property tests through the public API.
//
// Property 1: round-trip and overwrite against a model.
//  - Model: std HashMap from stored key bytes to the last value set.
//  - Invariant: get(k) == model[k] for every key ever set; len() == model.len().
//  - Operations: byte-key and string-key sets over a small alphabet so that
//    overwrites and string/byte aliasing both happen often.
//
// Property 2: traversal completeness.
//  - Invariant: on a fixed table, key_after, a cursor and iter() produce the
//    same sequence, of length len(), with no repeats.
//
// Property 3: string/byte key aliasing.
//  - Invariant: for any string s without NUL, set_str(s) is visible through
//    get(s + "\0") and invisible through get(s).
use chain_dict::{HashTable, LOAD_FACTOR};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

fn stored(key: &[u8], as_str: bool) -> Vec<u8> {
    let mut k = key.to_vec();
    if as_str {
        k.push(0);
    }
    k
}

// Property 1: model equivalence under byte and string sets.
proptest! {
    #[test]
    fn prop_round_trip_and_overwrite(
        hint in 0usize..20,
        ops in proptest::collection::vec(("[ab]{1,3}", any::<bool>(), any::<u16>()), 1..150),
    ) {
        let mut m: HashTable<u16> = HashTable::with_size_hint(hint).unwrap();
        let mut model: HashMap<Vec<u8>, u16> = HashMap::new();

        for (key, as_str, v) in ops {
            let prev = if as_str {
                m.set_str(&key, v).unwrap()
            } else {
                m.set(key.as_bytes(), v).unwrap()
            };
            prop_assert_eq!(prev, model.insert(stored(key.as_bytes(), as_str), v));
            prop_assert!(m.len() * LOAD_FACTOR < m.bucket_count());
        }

        prop_assert_eq!(m.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
            prop_assert!(m.has(k));
        }
    }
}

// Property 2: all traversal forms agree and are complete.
proptest! {
    #[test]
    fn prop_traversals_agree(
        keys in proptest::collection::hash_set(proptest::collection::vec(any::<u8>(), 1..8), 0..120),
    ) {
        let mut m = HashTable::new();
        for k in &keys {
            m.set(k, ()).unwrap();
        }

        let via_iter: Vec<Vec<u8>> = m.keys().map(|k| k.to_vec()).collect();

        let mut via_walk = Vec::new();
        let mut prev: Option<&[u8]> = None;
        while let Some(k) = m.key_after(prev) {
            via_walk.push(k.to_vec());
            prev = Some(k);
        }

        let mut cursor = m.begin();
        let mut via_cursor = Vec::new();
        while let Some((k, _)) = m.advance(&mut cursor).unwrap() {
            via_cursor.push(k.to_vec());
        }

        prop_assert_eq!(&via_walk, &via_iter);
        prop_assert_eq!(&via_cursor, &via_iter);
        prop_assert_eq!(via_iter.len(), keys.len());
        let distinct: BTreeSet<Vec<u8>> = via_iter.into_iter().collect();
        let expected: BTreeSet<Vec<u8>> = keys.into_iter().collect();
        prop_assert_eq!(distinct, expected);
    }
}

// Property 3: string keys alias their NUL-terminated byte form only.
proptest! {
    #[test]
    fn prop_string_byte_aliasing(s in "[^\\x00]{0,12}", v in any::<i64>()) {
        let mut m = HashTable::new();
        m.set_str(&s, v).unwrap();
        prop_assert_eq!(m.get(&stored(s.as_bytes(), true)), Some(&v));
        prop_assert!(m.get(s.as_bytes()).is_none());
        prop_assert_eq!(m.key_after_str(None), Some(&stored(s.as_bytes(), true)[..]));
    }
}
