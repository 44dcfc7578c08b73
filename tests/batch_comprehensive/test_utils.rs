//! Shared fixtures for the batch suite.

#![allow(dead_code)]

use std::sync::Arc;

pub use strata_batch::testing::{DatastoreCall, FlushProbe, RecordingDatastore};
pub use strata_batch::*;

/// Application id used by every test key.
pub const APP: &str = "testapp";

/// Complete key `TestEntity:<id>` under the test app.
pub fn test_key(id: i64) -> Key {
    Key::from_path(APP, "TestEntity", id)
}

/// Entity with a single text payload of `payload_len` bytes.
pub fn test_entity(id: i64, payload_len: usize) -> Entity {
    Entity::new(test_key(id)).with("payload", Value::Text("x".repeat(payload_len)))
}

/// Datastore handle plus a pool with the given budgets.
pub fn pool_with_limits(max_pool_size: usize, max_entity_count: usize) -> (Arc<RecordingDatastore>, MutationPool) {
    let store = Arc::new(RecordingDatastore::new());
    let pool = MutationPool::with_limits(
        store.clone(),
        PoolLimits::new(max_pool_size, max_entity_count),
    )
    .unwrap();
    (store, pool)
}

/// Model type exercising the serialization hook.
#[derive(Debug, Clone)]
pub struct TestModel {
    pub id: i64,
    pub tag: String,
}

impl Model for TestModel {
    fn key(&self) -> Key {
        test_key(self.id)
    }

    fn to_entity(&self) -> Result<Entity> {
        Ok(Entity::new(self.key()).with("tag", self.tag.as_str()))
    }
}
