//! Tier 5: Mapper Lifecycle
//!
//! Task slices over several shards sharing one counters map.

use crate::test_utils::*;
use std::sync::Arc;
use std::thread;

/// Copies every input entity and deletes the ones tagged stale.
struct CopyMapper;

impl TaskMapper for CopyMapper {
    type Input = Entity;

    fn map(&mut self, entity: Entity, ctx: &Context) -> Result<()> {
        let stale = entity.get("stale") == Some(&Value::Bool(true));
        let pool = ctx.mutation_pool();
        let mut pool = pool.lock();
        if stale {
            pool.delete(&entity)?;
            ctx.increment("deleted", 1);
        } else {
            pool.put(entity)?;
            ctx.increment("copied", 1);
        }
        Ok(())
    }
}

fn shard_inputs(shard: i64, count: i64) -> Vec<Entity> {
    (0..count)
        .map(|i| test_entity(shard * 1000 + i + 1, 4).with("stale", i % 5 == 0))
        .collect()
}

#[test]
fn slice_writes_and_counts_through_context() {
    let store = Arc::new(RecordingDatastore::new());
    let shared = Arc::new(ShardCounters::new());
    let ctx = Arc::new(
        Context::builder(store.clone())
            .task(TaskAttempt::new("copy-job", 0, 0))
            .counters_map(shared.clone())
            .build()
            .unwrap(),
    );

    let mapped = run_slice(&mut CopyMapper, ctx.clone(), shard_inputs(0, 20)).unwrap();
    assert_eq!(mapped, 20);
    assert_eq!(store.put_entities().len(), 16);
    assert_eq!(store.deleted_keys().len(), 4);
    assert_eq!(shared.get("copied"), 16);
    assert_eq!(shared.get("deleted"), 4);
    assert!(current::get().is_none());
}

#[test]
fn shards_on_worker_threads_merge_counters() {
    const SHARDS: i64 = 4;
    let store = Arc::new(RecordingDatastore::new());
    let shared = Arc::new(ShardCounters::new());

    let handles: Vec<_> = (0..SHARDS)
        .map(|shard| {
            let store = store.clone();
            let shared = shared.clone();
            thread::spawn(move || {
                let ctx = Arc::new(
                    Context::builder(store)
                        .task(TaskAttempt::new("copy-job", shard as u32, 0))
                        .counters_map(shared)
                        .limits(PoolLimits::new(DEFAULT_MAX_POOL_SIZE, 7))
                        .build()
                        .unwrap(),
                );
                run_slice(&mut CopyMapper, ctx, shard_inputs(shard, 50)).unwrap()
            })
        })
        .collect();

    let mapped: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(mapped, 200);
    assert_eq!(store.put_entities().len(), 160);
    assert_eq!(store.deleted_keys().len(), 40);
    assert_eq!(shared.snapshot().get("copied"), Some(&160));
    assert_eq!(shared.get("deleted"), 40);
}

#[test]
fn retried_attempt_resends_after_backend_failure() {
    let store = Arc::new(RecordingDatastore::new());
    let task = TaskAttempt::new("copy-job", 9, 0);
    let first = Arc::new(Context::builder(store.clone()).task(task.clone()).build().unwrap());

    store.set_fail_puts(true);
    assert!(run_slice(&mut CopyMapper, first.clone(), shard_inputs(9, 3)).is_err());
    assert!(store.put_entities().is_empty());

    store.set_fail_puts(false);
    let retry = Arc::new(Context::builder(store.clone()).task(task.retry()).build().unwrap());
    run_slice(&mut CopyMapper, retry.clone(), shard_inputs(9, 3)).unwrap();
    assert_eq!(retry.task().unwrap().attempt, 1);
    assert_eq!(store.put_entities().len(), 2);
    assert_eq!(store.deleted_keys().len(), 1);
}
