//! Integration tests for description rendering
//!
//! Covers the full label pipeline across related rows plus the cache
//! behavior around store writes.

use planforge::core::types::TimeOfDay;
use planforge::model::{Plan, PlanFilters, PlanLock, Stage};
use planforge::render::cache::DescriptionCache;
use planforge::render::{plan_filters_description, stage_description};
use planforge::store::ContentStore;

#[test]
fn test_stage_renders_through_lock_slot() {
    let mut store = ContentStore::new();
    let lock = store
        .save_plan_lock(PlanLock {
            title: "cellar door".to_string(),
            ..Default::default()
        })
        .unwrap();
    let stage = store.save_stage(Stage {
        lock_id: Some(lock),
        ..Default::default()
    });
    store.save_plan(Plan {
        title: "enter".to_string(),
        one_id: stage,
        ..Default::default()
    });

    let row = store.stages.get(stage).unwrap().clone();
    // one referencing plan gives the trailing count
    assert_eq!(
        stage_description(&store, &row),
        format!("PlanLock({lock}): cellar door(1)")
    );

    // recomputing from scratch yields the same text
    let first = stage_description(&store, &row);
    store.descriptions().clear();
    assert_eq!(stage_description(&store, &row), first);
}

#[test]
fn test_stage_cache_cleared_on_write() {
    let mut store = ContentStore::new();
    let lock = store
        .save_plan_lock(PlanLock {
            title: "cellar door".to_string(),
            ..Default::default()
        })
        .unwrap();
    let stage = store.save_stage(Stage {
        lock_id: Some(lock),
        ..Default::default()
    });

    let row = store.stages.get(stage).unwrap().clone();
    let before = stage_description(&store, &row);
    assert!(before.contains("cellar door"));

    // a raw table write bypasses invalidation, the stale text sticks
    store.plan_locks.get_mut(lock).unwrap().title = "vault door".to_string();
    assert_eq!(stage_description(&store, &row), before);

    // going through the store clears and re-warms the cache
    let updated = store.plan_locks.get(lock).unwrap().clone();
    store.save_plan_lock(updated).unwrap();
    assert!(stage_description(&store, &row).contains("vault door"));
}

#[test]
fn test_empty_stage_not_cached() {
    let mut store = ContentStore::new();
    let stage = store.save_stage(Stage::default());
    let row = store.stages.get(stage).unwrap().clone();
    assert_eq!(stage_description(&store, &row), "empty");
    assert!(store.descriptions().is_empty());
}

#[test]
fn test_plan_filters_description_cached() {
    let mut store = ContentStore::new();
    let id = store.save_plan_filters(PlanFilters {
        time_from: TimeOfDay::new(8, 0, 0),
        ..Default::default()
    });
    let row = store.plan_filters.get(id).unwrap().clone();
    assert_eq!(plan_filters_description(&store, &row), "from 08:00:00(0)");
    assert!(!store.descriptions().is_empty());
}
