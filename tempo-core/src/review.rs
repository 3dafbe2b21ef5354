//! Daily-review carry-over session.
//!
//! When a new calendar day starts with unresolved active tasks, a review
//! session captures them once and walks the user through a resolution per
//! task. The session must tolerate partial completion: resolve some tasks,
//! quit, reload the same day, and only the remainder is offered again.
//!
//! The session itself is pure bookkeeping over task ids. Applying the
//! resolutions to the collections (and persisting the per-day reviewed set)
//! is the store's job.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::task::Deadline;

/// One resolution for one task in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    /// Move to the completed list, stamped now.
    Complete,
    /// Leave active, unchanged.
    Keep,
    /// Leave active with a new deadline.
    Reschedule(Deadline),
    /// Remove from the active list without completing or archiving.
    Dismiss,
}

/// A single day's review session over a fixed, captured set of task ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSession {
    day: NaiveDate,
    /// Ids in ranked order, fixed at capture time.
    captured: Vec<String>,
    resolved: BTreeSet<String>,
}

impl ReviewSession {
    /// Capture a session for `day` from candidate ids in ranked order,
    /// skipping ids already reviewed this cycle. Returns `None` when
    /// nothing is left to review.
    pub fn capture<I, S>(day: NaiveDate, candidates: I, already_reviewed: &BTreeSet<String>) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let captured: Vec<String> = candidates
            .into_iter()
            .map(Into::into)
            .filter(|id| !already_reviewed.contains(id))
            .collect();

        if captured.is_empty() {
            return None;
        }

        Some(Self {
            day,
            captured,
            resolved: BTreeSet::new(),
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// Ids still awaiting a resolution, in capture order.
    pub fn pending(&self) -> Vec<&str> {
        self.captured
            .iter()
            .filter(|id| !self.resolved.contains(*id))
            .map(String::as_str)
            .collect()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.captured.iter().any(|c| c == id) && !self.resolved.contains(id)
    }

    /// Mark one id resolved. Returns false if the id was never captured or
    /// was already resolved, so a double resolution can't double-apply.
    pub fn resolve(&mut self, id: &str) -> bool {
        if !self.is_pending(id) {
            return false;
        }
        self.resolved.insert(id.to_string());
        true
    }

    /// Resolve everything still pending at once, returning the ids in
    /// capture order. Used by dismiss-all.
    pub fn resolve_all(&mut self) -> Vec<String> {
        let pending: Vec<String> = self.pending().iter().map(|s| s.to_string()).collect();
        for id in &pending {
            self.resolved.insert(id.clone());
        }
        pending
    }

    /// True once every captured task has a resolution.
    pub fn is_complete(&self) -> bool {
        self.captured.iter().all(|id| self.resolved.contains(id))
    }
}
