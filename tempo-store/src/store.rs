//! TaskStore: single-writer owner of the three task collections.
//!
//! All mutations are applied to the in-memory collections first and then
//! persisted best-effort. A failed write is logged and the in-memory state
//! stays authoritative for the session; the caller is never blocked on
//! persistence. Loading is fail-closed per record: a blob element that does
//! not deserialize is dropped, not fatal.

use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

use tempo_core::review::{ReviewAction, ReviewSession};
use tempo_core::task::{ArchivedTask, CompletedTask, Deadline, Effort, Impact, Task};
use tempo_core::{RankedTask, format_day, parse_day, rank};

use crate::kv::KeyValue;

pub const TASKS_KEY: &str = "tasks";
pub const COMPLETED_KEY: &str = "completed_tasks";
pub const ARCHIVED_KEY: &str = "archived_tasks";
pub const HAS_VISITED_KEY: &str = "has_visited";
pub const LAST_ACTIVE_DAY_KEY: &str = "last_active_day";
pub const REVIEWED_PREFIX: &str = "reviewed_";

/// Review records older than this are pruned on load.
pub const REVIEW_RETENTION_DAYS: i64 = 30;

#[derive(Debug)]
pub struct TaskStore<K: KeyValue> {
    kv: K,
    active: Vec<Task>,
    /// Newest-first, like the dashboard shows them.
    completed: Vec<CompletedTask>,
    /// Newest-first.
    archived: Vec<ArchivedTask>,
    has_visited: bool,
    last_active_day: Option<NaiveDate>,
}

impl<K: KeyValue> TaskStore<K> {
    /// Load all collections and markers. Never fails: unreadable keys and
    /// malformed records degrade to absent, with a warning.
    pub fn load(kv: K) -> Self {
        let active = load_collection::<Task, _>(&kv, TASKS_KEY);
        let completed = load_collection::<CompletedTask, _>(&kv, COMPLETED_KEY);
        let archived = load_collection::<ArchivedTask, _>(&kv, ARCHIVED_KEY);
        let has_visited = read_blob(&kv, HAS_VISITED_KEY).is_some();
        let last_active_day = read_blob(&kv, LAST_ACTIVE_DAY_KEY).and_then(|s| {
            parse_day(s.trim())
                .map_err(|e| warn!(key = LAST_ACTIVE_DAY_KEY, error = %e, "dropping unreadable day marker"))
                .ok()
        });

        Self {
            kv,
            active,
            completed,
            archived,
            has_visited,
            last_active_day,
        }
    }

    pub fn active(&self) -> &[Task] {
        &self.active
    }

    pub fn completed(&self) -> &[CompletedTask] {
        &self.completed
    }

    pub fn archived(&self) -> &[ArchivedTask] {
        &self.archived
    }

    pub fn has_visited(&self) -> bool {
        self.has_visited
    }

    pub fn last_active_day(&self) -> Option<NaiveDate> {
        self.last_active_day
    }

    /// The active collection, scored and totally ordered.
    pub fn ranked(&self) -> Vec<RankedTask> {
        rank(&self.active)
    }

    // ---- active-task mutations ----

    /// Add a task, minting its id. Rejects empty names at the boundary.
    pub fn add_task(
        &mut self,
        name: &str,
        impact: Impact,
        effort: Effort,
        deadline: Deadline,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            bail!("task name must not be empty");
        }

        let id = Uuid::new_v4().to_string();
        self.active
            .push(Task::new(id.clone(), name, impact, effort, deadline, now));

        // First task added = the user is past the welcome screen.
        if !self.has_visited {
            self.mark_visited();
        }
        write_json(&mut self.kv, TASKS_KEY, &self.active);
        Ok(id)
    }

    pub fn update_task(
        &mut self,
        id: &str,
        name: Option<&str>,
        impact: Option<Impact>,
        effort: Option<Effort>,
        deadline: Option<Deadline>,
    ) -> Result<()> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                bail!("task name must not be empty");
            }
        }
        let Some(task) = self.active.iter_mut().find(|t| t.id == id) else {
            bail!("no active task with id {id}");
        };

        if let Some(name) = name {
            task.name = name.trim().to_string();
        }
        if let Some(impact) = impact {
            task.impact = impact;
        }
        if let Some(effort) = effort {
            task.effort = effort;
        }
        if let Some(deadline) = deadline {
            task.deadline = deadline;
        }

        write_json(&mut self.kv, TASKS_KEY, &self.active);
        Ok(())
    }

    /// Deadline-only update, as used by the daily review.
    pub fn reschedule(&mut self, id: &str, deadline: Deadline) -> Result<()> {
        self.update_task(id, None, None, None, Some(deadline))
    }

    pub fn delete_task(&mut self, id: &str) -> Result<()> {
        let before = self.active.len();
        self.active.retain(|t| t.id != id);
        if self.active.len() == before {
            bail!("no active task with id {id}");
        }
        write_json(&mut self.kv, TASKS_KEY, &self.active);
        Ok(())
    }

    /// Delete every active task. Confirmation is the caller's problem.
    pub fn clear_active(&mut self) -> usize {
        let cleared = self.active.len();
        self.active.clear();
        remove_key(&mut self.kv, TASKS_KEY);
        cleared
    }

    /// Complete a task: freeze its derived fields as of this ranking and
    /// move it to the front of the completed list.
    pub fn complete(&mut self, id: &str, now: DateTime<Utc>) -> Result<()> {
        let Some(ranked) = self.ranked().into_iter().find(|r| r.id() == id) else {
            bail!("no active task with id {id}");
        };
        self.active.retain(|t| t.id != id);
        self.completed.insert(0, ranked.complete(now));

        write_json(&mut self.kv, TASKS_KEY, &self.active);
        write_json(&mut self.kv, COMPLETED_KEY, &self.completed);
        Ok(())
    }

    /// Move a completed task back to the active list, dropping its frozen
    /// derived fields and completion timestamp.
    pub fn uncomplete(&mut self, id: &str) -> Result<()> {
        let Some(pos) = self.completed.iter().position(|c| c.task.id == id) else {
            bail!("no completed task with id {id}");
        };
        let done = self.completed.remove(pos);
        self.active.push(done.uncomplete());

        write_json(&mut self.kv, TASKS_KEY, &self.active);
        write_json(&mut self.kv, COMPLETED_KEY, &self.completed);
        Ok(())
    }

    // ---- archive ----

    /// Move every completed task to the archive, newest batch first.
    pub fn archive_completed(&mut self, now: DateTime<Utc>) -> usize {
        let moved = self.completed.len();
        if moved == 0 {
            return 0;
        }
        let mut batch: Vec<ArchivedTask> =
            self.completed.drain(..).map(|c| c.archive(now)).collect();
        batch.append(&mut self.archived);
        self.archived = batch;

        write_json(&mut self.kv, COMPLETED_KEY, &self.completed);
        write_json(&mut self.kv, ARCHIVED_KEY, &self.archived);
        moved
    }

    pub fn restore_archived(&mut self, id: &str) -> Result<()> {
        let Some(pos) = self.archived.iter().position(|a| a.completed.task.id == id) else {
            bail!("no archived task with id {id}");
        };
        let archived = self.archived.remove(pos);
        self.completed.insert(0, archived.restore());

        write_json(&mut self.kv, COMPLETED_KEY, &self.completed);
        write_json(&mut self.kv, ARCHIVED_KEY, &self.archived);
        Ok(())
    }

    pub fn delete_archived(&mut self, id: &str) -> Result<()> {
        let before = self.archived.len();
        self.archived.retain(|a| a.completed.task.id != id);
        if self.archived.len() == before {
            bail!("no archived task with id {id}");
        }
        write_json(&mut self.kv, ARCHIVED_KEY, &self.archived);
        Ok(())
    }

    pub fn clear_archived(&mut self) -> usize {
        let cleared = self.archived.len();
        self.archived.clear();
        remove_key(&mut self.kv, ARCHIVED_KEY);
        cleared
    }

    // ---- markers ----

    pub fn mark_visited(&mut self) {
        self.has_visited = true;
        write_blob(&mut self.kv, HAS_VISITED_KEY, "true");
    }

    pub fn advance_day(&mut self, today: NaiveDate) {
        self.last_active_day = Some(today);
        write_blob(&mut self.kv, LAST_ACTIVE_DAY_KEY, &format_day(today));
    }

    // ---- daily review ----

    /// Start the daily review if one is due.
    ///
    /// A session begins only when all of these hold: the day marker exists
    /// and differs from `today`, the user has visited before, the active
    /// list is non-empty, and at least one active task has not already been
    /// reviewed this cycle. On every no-session path the day marker is
    /// advanced immediately; when a session is returned the marker stays
    /// put until the session completes, so an interrupted review resumes
    /// on reload.
    pub fn begin_daily_review(&mut self, today: NaiveDate) -> Option<ReviewSession> {
        match self.last_active_day {
            None => {
                // First load ever: just start the clock.
                self.advance_day(today);
                return None;
            }
            Some(last) if last == today => return None,
            Some(_) => {}
        }

        if !self.has_visited || self.active.is_empty() {
            self.advance_day(today);
            return None;
        }

        let already = self.reviewed_on(today);
        let candidates = self.ranked().into_iter().map(|r| r.id().to_string());
        let session = ReviewSession::capture(today, candidates, &already);
        if session.is_none() {
            self.advance_day(today);
        }
        session
    }

    /// Resolve one session task. The resolution is recorded in the per-day
    /// reviewed set before the session is checked for completion, so a
    /// reload mid-review never re-prompts for this task.
    pub fn apply_review_action(
        &mut self,
        session: &mut ReviewSession,
        id: &str,
        action: ReviewAction,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !session.is_pending(id) {
            bail!("task {id} is not pending in this review session");
        }

        // The task may have left the active set through an unrelated
        // mutation since capture; the resolution still counts.
        if self.active.iter().any(|t| t.id == id) {
            match action {
                ReviewAction::Complete => self.complete(id, now)?,
                ReviewAction::Keep => {}
                ReviewAction::Reschedule(deadline) => self.reschedule(id, deadline)?,
                ReviewAction::Dismiss => self.delete_task(id)?,
            }
        }

        session.resolve(id);
        self.record_reviewed(session.day(), id);
        if session.is_complete() {
            self.advance_day(session.day());
        }
        Ok(())
    }

    /// Dismiss every task still pending in the session, without marking any
    /// as completed, and close the session.
    pub fn dismiss_all_remaining(&mut self, session: &mut ReviewSession) -> usize {
        let ids = session.resolve_all();
        for id in &ids {
            self.active.retain(|t| t.id != *id);
            self.record_reviewed(session.day(), id);
        }
        write_json(&mut self.kv, TASKS_KEY, &self.active);
        self.advance_day(session.day());
        ids.len()
    }

    /// Ids already reviewed on `day`.
    pub fn reviewed_on(&self, day: NaiveDate) -> BTreeSet<String> {
        let key = review_key(day);
        let Some(raw) = read_blob(&self.kv, &key) else {
            return BTreeSet::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(ids) => ids.into_iter().collect(),
            Err(e) => {
                warn!(key = %key, error = %e, "dropping unreadable review record");
                BTreeSet::new()
            }
        }
    }

    fn record_reviewed(&mut self, day: NaiveDate, id: &str) {
        let mut reviewed = self.reviewed_on(day);
        reviewed.insert(id.to_string());
        let ids: Vec<&String> = reviewed.iter().collect();
        write_json(&mut self.kv, &review_key(day), &ids);
    }

    /// Drop review records older than the retention window.
    pub fn prune_review_records(&mut self, today: NaiveDate) {
        let keys = match self.kv.list_keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(error = %e, "skipping review-record cleanup");
                return;
            }
        };

        let cutoff = today - Duration::days(REVIEW_RETENTION_DAYS);
        for key in keys {
            let Some(suffix) = key.strip_prefix(REVIEWED_PREFIX) else {
                continue;
            };
            let Ok(day) = parse_day(suffix) else {
                continue;
            };
            if day < cutoff {
                remove_key(&mut self.kv, &key);
            }
        }
    }

    /// The underlying store, for callers that need to inspect it.
    pub fn kv(&self) -> &K {
        &self.kv
    }
}

fn review_key(day: NaiveDate) -> String {
    format!("{REVIEWED_PREFIX}{}", format_day(day))
}

fn read_blob<K: KeyValue>(kv: &K, key: &str) -> Option<String> {
    match kv.get(key) {
        Ok(blob) => blob,
        Err(e) => {
            warn!(key, error = %e, "read failed; treating key as absent");
            None
        }
    }
}

/// Per-record fail-closed decode: a malformed element is dropped with a
/// warning, the rest of the collection survives.
fn load_collection<T: DeserializeOwned, K: KeyValue>(kv: &K, key: &str) -> Vec<T> {
    let Some(raw) = read_blob(kv, key) else {
        return Vec::new();
    };
    let elements: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(elements) => elements,
        Err(e) => {
            warn!(key, error = %e, "corrupted collection blob; starting empty");
            return Vec::new();
        }
    };

    let mut out = Vec::with_capacity(elements.len());
    for element in elements {
        match serde_json::from_value::<T>(element) {
            Ok(record) => out.push(record),
            Err(e) => warn!(key, error = %e, "dropping malformed record"),
        }
    }
    out
}

fn write_json<T: Serialize, K: KeyValue>(kv: &mut K, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => write_blob(kv, key, &json),
        Err(e) => warn!(key, error = %e, "serialize failed; change not durably saved"),
    }
}

fn write_blob<K: KeyValue>(kv: &mut K, key: &str, blob: &str) {
    if let Err(e) = kv.set(key, blob) {
        warn!(key, error = %e, "write failed; in-memory state remains authoritative");
    }
}

fn remove_key<K: KeyValue>(kv: &mut K, key: &str) {
    if let Err(e) = kv.remove(key) {
        warn!(key, error = %e, "remove failed; in-memory state remains authoritative");
    }
}
