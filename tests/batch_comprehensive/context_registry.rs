//! Tier 3: Context Registry
//!
//! Custom pool registration and the ordered, fail-fast context flush.

use crate::test_utils::*;
use parking_lot::Mutex;
use std::sync::Arc;

/// Pool that appends its name to a shared log on every flush.
struct OrderedPool {
    name: &'static str,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl Flushable for OrderedPool {
    fn flush(&mut self) -> Result<()> {
        self.log.lock().push(self.name);
        Ok(())
    }
}

fn new_context() -> (Arc<RecordingDatastore>, Context) {
    let store = Arc::new(RecordingDatastore::new());
    let ctx = Context::new(Some(TaskAttempt::new("job", 0, 0)), store.clone(), None);
    (store, ctx)
}

#[test]
fn custom_pool_is_found_and_flushed() {
    let (_store, ctx) = new_context();
    assert!(ctx.get_pool("test").is_none());

    let probe = FlushProbe::new();
    let handle: PoolHandle = Arc::new(Mutex::new(probe.clone()));
    ctx.register_pool("test", handle.clone());

    let found = ctx.get_pool("test").unwrap();
    assert!(Arc::ptr_eq(&found, &handle));

    ctx.flush().unwrap();
    assert_eq!(probe.flush_count(), 1);
}

#[test]
fn pools_flush_in_registration_order() {
    let (_store, ctx) = new_context();
    let log = Arc::new(Mutex::new(Vec::new()));
    for name in ["first", "second", "third"] {
        ctx.register(
            name,
            OrderedPool {
                name,
                log: log.clone(),
            },
        );
    }
    ctx.flush().unwrap();
    assert_eq!(*log.lock(), vec!["first", "second", "third"]);
}

#[test]
fn builtins_flush_before_custom_pools() {
    let (store, ctx) = new_context();
    let probe = ctx.register("probe", FlushProbe::failing());
    ctx.mutation_pool().lock().put(test_entity(1, 1)).unwrap();

    assert!(ctx.flush().is_err());
    assert_eq!(store.call_count(), 1);
    assert_eq!(probe.lock().flush_count(), 1);
}

#[test]
fn first_failure_stops_the_flush() {
    let (_store, ctx) = new_context();
    let failing = ctx.register("failing", FlushProbe::failing());
    let skipped = ctx.register("skipped", FlushProbe::new());

    let err = ctx.flush().unwrap_err();
    assert!(err.is_backend());
    assert_eq!(failing.lock().flush_count(), 1);
    assert_eq!(skipped.lock().flush_count(), 0);
}

#[test]
fn replacing_a_pool_keeps_its_position() {
    let (_store, ctx) = new_context();
    let log = Arc::new(Mutex::new(Vec::new()));
    ctx.register("a", OrderedPool { name: "a-old", log: log.clone() });
    ctx.register("b", OrderedPool { name: "b", log: log.clone() });
    ctx.register("a", OrderedPool { name: "a-new", log: log.clone() });

    ctx.flush().unwrap();
    assert_eq!(*log.lock(), vec!["a-new", "b"]);
    assert_eq!(ctx.pool_names(), vec![MUTATION_POOL, COUNTERS, "a", "b"]);
}

#[test]
fn context_from_config_file_uses_its_budgets() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "max_entity_count = 2\n").unwrap();
    let config = PoolConfig::from_file(&path).unwrap();

    let store = Arc::new(RecordingDatastore::new());
    let ctx = Context::builder(store.clone()).config(&config).build().unwrap();
    for i in 1..=5 {
        ctx.mutation_pool().lock().put(test_entity(i, 1)).unwrap();
    }
    assert_eq!(store.call_count(), 2);
    ctx.flush().unwrap();
    assert_eq!(store.put_entities().len(), 5);
}
