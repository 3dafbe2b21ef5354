//! End-to-end flows through the store: add → rank → complete → archive,
//! the new-day review cycle, and degradation under persistence failure.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};

use tempo_core::review::ReviewAction;
use tempo_core::task::{Deadline, Effort, Impact, Quadrant, Tier};
use tempo_store::{FsKv, KeyValue, MemoryKv, TaskStore};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn add_rank_complete_flow() {
    let mut store = TaskStore::load(MemoryKv::new());
    let now = Utc::now();

    let a = store
        .add_task("A", Impact::High, Effort::Low, Deadline::Today, now)
        .unwrap();
    let b = store
        .add_task("B", Impact::Low, Effort::High, Deadline::AfterSprint, now)
        .unwrap();

    let ranked = store.ranked();
    assert_eq!(ranked[0].id(), a);
    assert_eq!(ranked[0].quadrant, Quadrant::QuickWin);
    assert_eq!(ranked[0].score, 130);
    assert_eq!(ranked[0].tier, Tier::DoToday);
    assert_eq!(ranked[1].id(), b);
    assert_eq!(ranked[1].quadrant, Quadrant::TimeSink);
    assert_eq!(ranked[1].score, 10);
    assert_eq!(ranked[1].tier, Tier::Defer);

    let created = store.active()[0].created_at;
    store.complete(&a, Utc::now()).unwrap();

    assert!(store.ranked().iter().all(|r| r.id() != a));
    let done = &store.completed()[0];
    assert_eq!(done.task.id, a);
    assert!(done.completed_at >= created);
}

#[test]
fn new_day_review_dismiss_closes_session() {
    let mut store = TaskStore::load(MemoryKv::new());
    let now = Utc::now();
    let id = store
        .add_task("carry me over", Impact::High, Effort::High, Deadline::ThisWeek, now)
        .unwrap();
    store.advance_day(day(2026, 3, 14));

    let today = day(2026, 3, 15);
    let mut session = store.begin_daily_review(today).unwrap();
    assert_eq!(session.pending(), vec![id.as_str()]);

    store
        .apply_review_action(&mut session, &id, ReviewAction::Dismiss, now)
        .unwrap();

    assert!(store.active().is_empty());
    assert!(store.completed().is_empty());
    assert_eq!(store.last_active_day(), Some(today));
    assert!(store.begin_daily_review(today).is_none());
}

#[test]
fn ids_stay_unique_across_collections() {
    let mut store = TaskStore::load(MemoryKv::new());
    let now = Utc::now();

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(
            store
                .add_task(&format!("task {i}"), Impact::High, Effort::Low, Deadline::ThisWeek, now)
                .unwrap(),
        );
    }

    store.complete(&ids[0], now).unwrap();
    store.complete(&ids[1], now).unwrap();
    store.archive_completed(now);
    store.complete(&ids[2], now).unwrap();
    store.uncomplete(&ids[2]).unwrap();

    let union: Vec<&str> = store
        .active()
        .iter()
        .map(|t| t.id.as_str())
        .chain(store.completed().iter().map(|c| c.task.id.as_str()))
        .chain(store.archived().iter().map(|a| a.completed.task.id.as_str()))
        .collect();
    let unique: BTreeSet<&str> = union.iter().copied().collect();
    assert_eq!(union.len(), unique.len());
    assert_eq!(union.len(), ids.len());
}

#[test]
fn collections_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let now = Utc::now();

    let id = {
        let kv = FsKv::open(dir.path().join("store")).unwrap();
        let mut store = TaskStore::load(kv);
        let id = store
            .add_task("persist me", Impact::Low, Effort::Low, Deadline::ThisSprint, now)
            .unwrap();
        store
            .add_task("and me", Impact::High, Effort::High, Deadline::Today, now)
            .unwrap();
        store.complete(&id, now).unwrap();
        store.archive_completed(now);
        id
    };

    let kv = FsKv::open(dir.path().join("store")).unwrap();
    let store = TaskStore::load(kv);
    assert_eq!(store.active().len(), 1);
    assert_eq!(store.active()[0].name, "and me");
    assert_eq!(store.active()[0].created_at, now);
    assert!(store.completed().is_empty());
    assert_eq!(store.archived().len(), 1);
    let archived = &store.archived()[0];
    assert_eq!(archived.completed.task.id, id);
    // Frozen fields survive storage untouched.
    assert_eq!(archived.completed.score, 40);
    assert_eq!(archived.completed.tier, Tier::CouldDo);
}

/// A store whose writes all fail, for exercising silent degradation.
#[derive(Debug, Default, Clone)]
struct ReadOnlyKv {
    inner: MemoryKv,
}

impl KeyValue for ReadOnlyKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
        bail!("quota exceeded")
    }

    fn remove(&mut self, _key: &str) -> Result<()> {
        bail!("quota exceeded")
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        self.inner.list_keys()
    }
}

#[test]
fn write_failure_keeps_memory_authoritative() {
    let mut store = TaskStore::load(ReadOnlyKv::default());
    let now = Utc::now();

    let id = store
        .add_task("unsaved", Impact::High, Effort::Low, Deadline::Today, now)
        .unwrap();
    assert_eq!(store.active().len(), 1);

    store.complete(&id, now).unwrap();
    assert!(store.active().is_empty());
    assert_eq!(store.completed().len(), 1);

    // Nothing was durably saved, and nothing blew up.
    assert!(store.kv().inner.get("tasks").unwrap().is_none());
}
