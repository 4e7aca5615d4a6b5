#![cfg(test)]

// Property tests for ChainedHashTable kept inside the crate so every step
// can audit the bucket bookkeeping directly.

use crate::chained_hash_table::ChainedHashTable;
use crate::config::TableConfig;
use crate::error::TableError;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::hash::{BuildHasher, Hasher};

// Pool-indexed operations shrink towards earlier keys and shorter scripts.
#[derive(Clone, Debug)]
enum Op {
    Set(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<Op>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idx = proptest::sample::select((0..pool.len()).collect::<Vec<_>>());
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| Op::Set(i, v)),
            2 => idx.clone().prop_map(Op::Remove),
            2 => idx.clone().prop_map(Op::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(Op::Contains),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| Op::Mutate(i, d)),
            1 => Just(Op::Iterate),
            1 => Just(Op::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Runs one script against the table and a std HashMap model, checking
// after every step:
// - `len` parity with the model and `sum(bucket_size) == len`;
// - the full bucket audit (chain lengths, used count, placement);
// - bucket count never decreases and only ever doubles.
fn run_script<S: BuildHasher>(
    mut sut: ChainedHashTable<String, i32, S>,
    pool: &[String],
    ops: Vec<Op>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    for op in ops {
        let capacity_before = sut.bucket_count();
        match op {
            Op::Set(i, v) => {
                let k = pool[i].clone();
                let prev = sut.set(k.clone(), v);
                prop_assert_eq!(prev, model.insert(k, v));
            }
            Op::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k.as_str());
                prop_assert_eq!(removed, model.remove(k).is_some());
                prop_assert!(!sut.contains(k.as_str()));
            }
            Op::Get(i) => {
                let k = &pool[i];
                match model.get(k) {
                    Some(v) => prop_assert_eq!(sut.get(k.as_str()), Ok(v)),
                    None => prop_assert_eq!(sut.get(k.as_str()), Err(TableError::NotFound)),
                }
            }
            Op::Contains(s) => {
                prop_assert_eq!(sut.contains(s.as_str()), model.contains_key(&s));
            }
            Op::Mutate(i, d) => {
                let k = &pool[i];
                match (sut.get_mut(k.as_str()), model.get_mut(k)) {
                    (Ok(v), Some(m)) => {
                        *v = v.wrapping_add(d);
                        *m = m.wrapping_add(d);
                    }
                    (Err(TableError::NotFound), None) => {}
                    (s, m) => prop_assert!(false, "get_mut mismatch: {:?} vs {:?}", s, m),
                }
            }
            Op::Iterate => {
                let s_keys: BTreeSet<_> = sut.iter().map(|(k, _)| k.clone()).collect();
                let m_keys: BTreeSet<_> = model.keys().cloned().collect();
                prop_assert_eq!(sut.iter().count(), model.len());
                prop_assert_eq!(s_keys, m_keys);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
            }
        }

        let after = sut.bucket_count();
        prop_assert!(after == capacity_before || after == capacity_before * 2);
        prop_assert_eq!(sut.len(), model.len());
        let sum: usize = (0..after).map(|b| sut.bucket_size(b).unwrap()).sum();
        prop_assert_eq!(sum, sut.len());
        if let Err(msg) = sut.buckets().audit() {
            prop_assert!(false, "{}", msg);
        }
    }
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k.as_str()), Ok(v));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_script(ChainedHashTable::new(), &pool, ops)?;
    }

    // Worst-case collisions: everything chains in bucket 0.
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_script(ChainedHashTable::with_hasher(ConstBuildHasher), &pool, ops)?;
    }

    // Tiny tables grow on nearly every new key.
    #[test]
    fn prop_state_machine_small_start((pool, ops) in arb_scenario(), cap in 1usize..4) {
        let config = TableConfig::new().initial_capacity(cap).collision_threshold(1);
        run_script(ChainedHashTable::with_config(config).unwrap(), &pool, ops)?;
    }
}
