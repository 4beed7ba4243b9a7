#![cfg(test)]

// Property tests for HashTable kept inside the crate so they can check
// bucket placement through private fields.

use crate::error::Error;
use crate::hash_table::{HashTable, LOAD_FACTOR};
use crate::hasher::hash_bytes;
use crate::prime::is_prime;
use hashbrown::HashMap;
use proptest::prelude::*;
use std::collections::BTreeSet;

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    SetStr(usize, i32),
    Get(usize),
    GetStr(usize),
    Has(Vec<u8>),
    Mutate(usize, i32),
    Resize,
    Iterate,
    Walk,
}

fn str_key(s: &str) -> Vec<u8> {
    let mut k = s.as_bytes().to_vec();
    k.push(0);
    k
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-c]{0,4}", 1..=12).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::SetStr(i, v)),
            idx.clone().prop_map(OpI::Get),
            idx.clone().prop_map(OpI::GetStr),
            proptest::collection::vec(any::<u8>(), 0..5).prop_map(OpI::Has),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Resize),
            Just(OpI::Iterate),
            Just(OpI::Walk),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_structure<V>(t: &HashTable<V>) -> Result<(), TestCaseError> {
    prop_assert!(is_prime(t.bucket_count()));
    let mut reachable = 0;
    for (b, head) in t.buckets.iter().enumerate() {
        let mut cur = *head;
        while let Some(k) = cur {
            let e = &t.slots[k];
            prop_assert_eq!(hash_bytes(&e.key, t.bucket_count()), b);
            reachable += 1;
            cur = e.next;
        }
    }
    prop_assert_eq!(reachable, t.len());
    Ok(())
}

// Property: State-machine equivalence against hashbrown::HashMap keyed by
// the stored byte form of each key.
// Invariants exercised across random operation sequences:
// - `set` returns the previous value exactly when the model had one.
// - Byte keys and NUL-terminated string keys share entries; empty byte keys
//   are rejected and never present.
// - `get`/`has` parity with the model, including misses.
// - Every entry sits in the bucket its key hashes to and the bucket count is
//   prime after every op; `len * LOAD_FACTOR < bucket_count` after every set.
// - `iter` and a `key_after` walk both visit the model's key set exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: HashTable<i32> = HashTable::new();
        let mut model: HashMap<Vec<u8>, i32> = HashMap::new();

        for op in ops {
            match op {
                OpI::Set(i, v) => {
                    let k = pool[i].as_bytes();
                    match sut.set(k, v) {
                        Ok(prev) => {
                            prop_assert!(!k.is_empty());
                            prop_assert_eq!(prev, model.insert(k.to_vec(), v));
                            prop_assert!(sut.len() * LOAD_FACTOR < sut.bucket_count());
                        }
                        Err(Error::EmptyKey) => prop_assert!(k.is_empty()),
                        Err(e) => prop_assert!(false, "unexpected error: {}", e),
                    }
                }
                OpI::SetStr(i, v) => {
                    let prev = sut.set_str(&pool[i], v).expect("string keys are never empty");
                    prop_assert_eq!(prev, model.insert(str_key(&pool[i]), v));
                    prop_assert!(sut.len() * LOAD_FACTOR < sut.bucket_count());
                }
                OpI::Get(i) => {
                    let k = pool[i].as_bytes();
                    prop_assert_eq!(sut.get(k), model.get(k));
                }
                OpI::GetStr(i) => {
                    prop_assert_eq!(sut.get_str(&pool[i]), model.get(&str_key(&pool[i])));
                    prop_assert_eq!(sut.has_str(&pool[i]), model.contains_key(&str_key(&pool[i])));
                }
                OpI::Has(k) => {
                    prop_assert_eq!(sut.has(&k), model.contains_key(&k));
                }
                OpI::Mutate(i, d) => {
                    let k = pool[i].as_bytes();
                    if let Some(v) = sut.get_mut(k) {
                        *v = v.saturating_add(d);
                        let mv = model.get_mut(k).expect("present in model");
                        *mv = mv.saturating_add(d);
                    } else {
                        prop_assert!(!model.contains_key(k));
                    }
                }
                OpI::Resize => {
                    sut.resize().expect("small resize allocates");
                    prop_assert!(sut.len() * LOAD_FACTOR < sut.bucket_count());
                }
                OpI::Iterate => {
                    let s_keys: Vec<_> = sut.keys().map(|k| k.to_vec()).collect();
                    let distinct: BTreeSet<_> = s_keys.iter().cloned().collect();
                    prop_assert_eq!(distinct.len(), s_keys.len());
                    let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                    prop_assert_eq!(distinct, m_keys);
                }
                OpI::Walk => {
                    let mut walked = Vec::new();
                    let mut prev: Option<&[u8]> = None;
                    while let Some(k) = sut.key_after(prev) {
                        walked.push(k.to_vec());
                        prev = Some(k);
                    }
                    let iterated: Vec<_> = sut.keys().map(|k| k.to_vec()).collect();
                    prop_assert_eq!(walked, iterated);
                }
            }

            check_structure(&sut)?;
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}

// Property: growth from any size hint keeps the load-factor invariant and
// every mapping, whatever the distinct key count.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_growth_preserves_mapping(
        hint in 0usize..64,
        keys in proptest::collection::btree_set(proptest::collection::vec(any::<u8>(), 1..6), 0..200),
    ) {
        let mut sut: HashTable<usize> = HashTable::with_size_hint(hint).unwrap();
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(sut.set(k, i).unwrap(), None);
            prop_assert!(sut.len() * LOAD_FACTOR < sut.bucket_count());
        }
        check_structure(&sut)?;
        for (i, k) in keys.iter().enumerate() {
            prop_assert_eq!(sut.get(k), Some(&i));
        }
        let visited: BTreeSet<Vec<u8>> = sut.keys().map(|k| k.to_vec()).collect();
        prop_assert_eq!(visited, keys);
    }
}
