//! Tier 2: Delete Normalization
//!
//! Every accepted delete form buffers the same canonical key.

use crate::test_utils::*;

#[test]
fn all_delete_forms_produce_equal_keys() {
    let (store, mut pool) = pool_with_limits(DEFAULT_MAX_POOL_SIZE, DEFAULT_MAX_ENTITY_COUNT);
    let model = TestModel {
        id: 42,
        tag: "t".to_string(),
    };
    let entity = model.to_entity().unwrap();
    let key = test_key(42);
    let encoded = key.encode().unwrap();

    pool.delete_model(&model).unwrap();
    pool.delete(&entity).unwrap();
    pool.delete(key.clone()).unwrap();
    pool.delete(encoded.as_str()).unwrap();

    assert_eq!(pool.deletes().items(), &[key.clone(), key.clone(), key.clone(), key.clone()]);

    pool.flush().unwrap();
    assert_eq!(store.calls(), vec![DatastoreCall::Delete(vec![key; 4])]);
}

#[test]
fn malformed_key_string_is_rejected() {
    let (store, mut pool) = pool_with_limits(100, 10);
    let err = pool.delete("not a key!").unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(pool.deletes().is_empty());
    assert_eq!(store.call_count(), 0);
}

#[test]
fn incomplete_key_cannot_be_deleted() {
    let (_store, mut pool) = pool_with_limits(100, 10);
    let err = pool.delete(Key::incomplete(APP, "TestEntity")).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(pool.deletes().is_empty());
}

#[test]
fn encoded_key_round_trips_with_namespace_and_ancestors() {
    let key = Key::from_path(APP, "Parent", "p")
        .child("Child", 7)
        .with_namespace("tenant-a");
    let parsed: Key = key.to_string().parse().unwrap();
    assert_eq!(parsed, key);
    assert_eq!(parsed.namespace(), Some("tenant-a"));
    assert_eq!(parsed.parent().unwrap().kind(), "Parent");
}

#[test]
fn deletes_flush_after_puts() {
    let (store, mut pool) = pool_with_limits(DEFAULT_MAX_POOL_SIZE, DEFAULT_MAX_ENTITY_COUNT);
    pool.delete(test_key(1)).unwrap();
    pool.put(test_entity(2, 1)).unwrap();
    pool.flush().unwrap();

    assert!(matches!(store.calls()[0], DatastoreCall::Put(_)));
    assert_eq!(store.calls()[1], DatastoreCall::Delete(vec![test_key(1)]));
}
