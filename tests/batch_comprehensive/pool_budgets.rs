//! Tier 1: Pool Budgets
//!
//! Size and count bookkeeping, and the flush-before-overflow rule.

use crate::test_utils::*;
use proptest::prelude::*;

/// Entity whose encoded size is exactly `size` bytes.
fn entity_of_size(id: i64, size: usize) -> Entity {
    let base = test_entity(id, 0).encoded_size().unwrap();
    let entity = test_entity(id, size - base);
    assert_eq!(entity.encoded_size().unwrap(), size);
    entity
}

#[test]
fn oversize_put_flushes_previous_batch() {
    let (store, mut pool) = pool_with_limits(1000, DEFAULT_MAX_ENTITY_COUNT);
    let small = test_entity(1, 4);
    let big = entity_of_size(2, 1000);

    pool.put(&small).unwrap();
    assert_eq!(store.call_count(), 0);

    pool.put(&big).unwrap();
    assert_eq!(store.calls(), vec![DatastoreCall::Put(vec![small])]);
    assert_eq!(pool.puts().items(), &[big]);
    assert_eq!(pool.puts().size(), 1000);
}

#[test]
fn too_many_puts_leave_remainder_buffered() {
    let store = std::sync::Arc::new(RecordingDatastore::new());
    let mut pool = MutationPool::new(store.clone());
    let entities: Vec<Entity> = (1..=250).map(|i| test_entity(i, 1)).collect();

    for entity in &entities {
        pool.put(entity).unwrap();
    }

    assert_eq!(store.calls(), vec![DatastoreCall::Put(entities[..200].to_vec())]);
    assert_eq!(pool.puts().items(), &entities[200..]);
}

#[test]
fn flush_sends_remaining_batch_in_order() {
    let (store, mut pool) = pool_with_limits(DEFAULT_MAX_POOL_SIZE, 3);
    let entities: Vec<Entity> = (1..=7).map(|i| test_entity(i, 8)).collect();
    for entity in &entities {
        pool.put(entity).unwrap();
    }
    pool.flush().unwrap();

    assert_eq!(store.put_entities(), entities);
    assert_eq!(store.call_count(), 3);
    assert!(pool.is_empty());
}

#[test]
fn empty_flush_makes_no_calls() {
    let (store, mut pool) = pool_with_limits(100, 10);
    pool.flush().unwrap();
    pool.flush().unwrap();
    assert_eq!(store.call_count(), 0);
}

#[test]
fn model_puts_use_serialization_hook() {
    let (store, mut pool) = pool_with_limits(DEFAULT_MAX_POOL_SIZE, DEFAULT_MAX_ENTITY_COUNT);
    let model = TestModel {
        id: 5,
        tag: "blue".to_string(),
    };
    pool.put_model(&model).unwrap();
    pool.flush().unwrap();

    let written = store.put_entities();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].key(), &test_key(5));
    assert_eq!(written[0].get("tag"), Some(&Value::from("blue")));
}

#[test]
fn backend_failure_keeps_batch_for_retry() {
    let (store, mut pool) = pool_with_limits(DEFAULT_MAX_POOL_SIZE, 2);
    pool.put(test_entity(1, 1)).unwrap();
    pool.put(test_entity(2, 1)).unwrap();

    store.set_fail_puts(true);
    assert!(pool.put(test_entity(3, 1)).unwrap_err().is_backend());
    assert_eq!(pool.puts().len(), 2);

    store.set_fail_puts(false);
    pool.put(test_entity(3, 1)).unwrap();
    pool.flush().unwrap();
    let ids: Vec<Key> = store.put_entities().iter().map(|e| e.key().clone()).collect();
    assert_eq!(ids, vec![test_key(1), test_key(2), test_key(3)]);
}

#[test]
#[allow(deprecated)]
fn entity_list_alias_reads_same_items() {
    let mut list: EntityList<i32> = ItemList::new();
    list.append(7, 3);
    assert_eq!(list.entities(), list.items());
    assert_eq!(list.size(), 3);
}

proptest! {
    #[test]
    fn buffers_never_exceed_budgets(
        sizes in prop::collection::vec(0usize..64, 1..80),
        max_count in 1usize..20,
    ) {
        let (store, mut pool) = pool_with_limits(600, max_count);
        let mut expected = Vec::new();
        for (i, payload) in sizes.iter().enumerate() {
            let entity = test_entity(i as i64 + 1, *payload);
            expected.push(entity.clone());
            pool.put(entity).unwrap();
            prop_assert!(pool.puts().len() <= max_count);
            prop_assert!(pool.puts().len() == 1 || pool.puts().size() <= 600);
        }
        pool.flush().unwrap();
        prop_assert_eq!(store.put_entities(), expected);
    }
}
