//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the capacity and ordering rules of both cache tiers.

use proptest::prelude::*;
use std::collections::{BTreeSet, VecDeque};

use crate::cache::{EntityCache, ResponseCache, ResponseStore};
use crate::models::Entity;

// == Strategies ==
/// Small key space so sequences revisit keys often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-h]{1,2}".prop_map(|s| s)
}

/// Reads and writes against the response store
#[derive(Debug, Clone)]
enum StoreOp {
    Get(String),
    Insert(String, u32),
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        key_strategy().prop_map(StoreOp::Get),
        (key_strategy(), any::<u32>()).prop_map(|(k, v)| StoreOp::Insert(k, v)),
    ]
}

fn entity(id: u32) -> Entity {
    Entity {
        id,
        name: format!("mon-{id}"),
        sprite: None,
        types: Vec::new(),
        stats: Vec::new(),
        height: 0,
        weight: 0,
        generation: "Gen I".to_string(),
        lineage: vec![format!("mon-{id}")],
    }
}

/// Moves `key` to the back (newest end) of a recency model.
fn model_touch(model: &mut VecDeque<String>, key: &str) {
    model.retain(|k| k != key);
    model.push_back(key.to_string());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of reads and writes, the store never holds more than
    // its capacity and always evicts the least recently touched key.
    #[test]
    fn prop_response_store_matches_lru_model(
        capacity in 1usize..6,
        ops in prop::collection::vec(store_op_strategy(), 1..80)
    ) {
        let mut store = ResponseStore::new(capacity);
        let mut model: VecDeque<String> = VecDeque::new();

        for op in ops {
            match op {
                StoreOp::Get(key) => {
                    let hit = store.get(&key).is_some();
                    prop_assert_eq!(hit, model.contains(&key));
                    if hit {
                        model_touch(&mut model, &key);
                    }
                }
                StoreOp::Insert(key, value) => {
                    if !model.contains(&key) && model.len() >= capacity {
                        let expected = model.pop_front();
                        prop_assert_eq!(store.oldest_key().map(str::to_string), expected);
                    }
                    store.insert(key.clone(), value);
                    model_touch(&mut model, &key);
                }
            }

            prop_assert!(store.len() <= capacity);
            prop_assert_eq!(store.len(), model.len());
            prop_assert_eq!(store.oldest_key(), model.front().map(String::as_str));
        }
    }

    // Populating through the async cache respects capacity, and a second
    // fetch of a cached key returns the stored payload without loading.
    #[test]
    fn prop_fetch_or_populate_bounded_and_cached(
        capacity in 1usize..5,
        keys in prop::collection::vec(key_strategy(), 1..40)
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache: ResponseCache<String> = ResponseCache::new(capacity);
            for key in &keys {
                let expected = format!("payload-{key}");
                let value = cache
                    .fetch_or_populate(key, || async { Ok(format!("payload-{key}")) })
                    .await
                    .unwrap();
                assert_eq!(value, expected);
                assert!(cache.len().await <= capacity);

                let again = cache
                    .fetch_or_populate(key, || async { Ok("reloaded".to_string()) })
                    .await
                    .unwrap();
                assert_eq!(again, expected);
            }
        });
    }

    // Below the ceiling, merging the same batch twice gives the same snapshot
    // as merging it once.
    #[test]
    fn prop_merge_batch_idempotent(
        initial in prop::collection::btree_set(1u32..400, 0..60),
        batch in prop::collection::vec(1u32..400, 0..60),
        capacity in 120usize..200,
        trim in 1usize..15
    ) {
        let mut once = EntityCache::new(capacity, trim);
        once.load_initial(initial.iter().copied().map(entity));
        let mut twice = once.clone();

        let batch: Vec<Entity> = batch.into_iter().map(entity).collect();
        once.merge_batch(batch.clone());
        twice.merge_batch(batch.clone());
        twice.merge_batch(batch);

        prop_assert!(once.len() <= capacity);
        prop_assert_eq!(once.snapshot_sorted(), twice.snapshot_sorted());
    }

    // After an overflowing merge the removed ids are exactly the smallest ones.
    #[test]
    fn prop_trim_removes_smallest_ids(
        initial in prop::collection::btree_set(1u32..2000, 0..120),
        batch in prop::collection::btree_set(1u32..2000, 1..40),
        capacity in 20usize..100,
        trim in 1usize..25
    ) {
        let mut cache = EntityCache::new(capacity, trim);
        cache.load_initial(initial.iter().copied().map(entity));
        let before: BTreeSet<u32> = cache.iter_sorted().map(|e| e.id).collect();

        let report = cache.merge_batch(batch.iter().copied().map(entity));

        let union: Vec<u32> = before.union(&batch).copied().collect();
        let overflow_rounds = if union.len() > capacity {
            (union.len() - capacity).div_ceil(trim)
        } else {
            0
        };
        let removed = (overflow_rounds * trim).min(union.len());

        prop_assert_eq!(&report.trimmed, &union[..removed].to_vec());
        prop_assert_eq!(cache.len(), union.len() - removed);
        prop_assert!(cache.len() <= capacity);
        let survivors: Vec<u32> = cache.iter_sorted().map(|e| e.id).collect();
        prop_assert_eq!(survivors, union[removed..].to_vec());
    }
}
