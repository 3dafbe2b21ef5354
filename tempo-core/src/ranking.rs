//! Ranking engine: decorate tasks with derived fields and totally order them.

use chrono::{DateTime, Utc};

use crate::scoring::{classify_quadrant, classify_tier, compute_score, reason};
use crate::task::{CompletedTask, Quadrant, Task, Tier};

/// A task decorated with its derived priority fields.
///
/// This is the presentation shape: derived fields are recomputed on every
/// ranking and never written back onto the stored `Task`.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTask {
    pub task: Task,
    pub quadrant: Quadrant,
    pub score: i32,
    pub tier: Tier,
    pub reason: String,
}

impl RankedTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn name(&self) -> &str {
        &self.task.name
    }

    /// Freeze the derived fields into a completed record.
    pub fn complete(self, completed_at: DateTime<Utc>) -> CompletedTask {
        CompletedTask {
            task: self.task,
            quadrant: self.quadrant,
            score: self.score,
            tier: self.tier,
            reason: self.reason,
            completed_at,
        }
    }
}

/// Pure projection: compute the derived fields for one task.
pub fn decorate(task: &Task) -> RankedTask {
    let quadrant = classify_quadrant(task.impact, task.effort);
    let score = compute_score(quadrant, task.deadline);
    let tier = classify_tier(score);
    let reason = reason(task.impact, task.effort, task.deadline);
    RankedTask {
        task: task.clone(),
        quadrant,
        score,
        tier,
        reason,
    }
}

/// Decorate and sort a collection of tasks. The input is not mutated.
///
/// Comparator, in order:
/// 1) score DESC
/// 2) deadline urgency ASC (more urgent first)
/// 3) created_at ASC (earlier-created first among equals)
/// 4) id ASC, the unconditional final key, so the order is total even when
///    two tasks share a creation instant.
pub fn rank(tasks: &[Task]) -> Vec<RankedTask> {
    let mut ranked: Vec<RankedTask> = tasks.iter().map(decorate).collect();
    ranked.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.task.deadline.urgency().cmp(&b.task.deadline.urgency()))
            .then_with(|| a.task.created_at.cmp(&b.task.created_at))
            .then_with(|| a.task.id.cmp(&b.task.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Deadline, Effort, Impact};
    use chrono::{Duration, Utc};

    fn task(id: &str, impact: Impact, effort: Effort, deadline: Deadline) -> Task {
        Task::new(id, format!("task {id}"), impact, effort, deadline, Utc::now())
    }

    #[test]
    fn quick_win_due_today_tops_the_list() {
        let t = task("a", Impact::High, Effort::Low, Deadline::Today);
        let ranked = rank(std::slice::from_ref(&t));
        assert_eq!(ranked[0].quadrant, Quadrant::QuickWin);
        assert_eq!(ranked[0].score, 130);
        assert_eq!(ranked[0].tier, Tier::DoToday);
    }

    #[test]
    fn time_sink_after_sprint_sinks_to_defer() {
        let t = task("b", Impact::Low, Effort::High, Deadline::AfterSprint);
        let ranked = rank(std::slice::from_ref(&t));
        assert_eq!(ranked[0].quadrant, Quadrant::TimeSink);
        assert_eq!(ranked[0].score, 10);
        assert_eq!(ranked[0].tier, Tier::Defer);
    }

    #[test]
    fn sorts_by_score_descending() {
        let tasks = vec![
            task("low", Impact::Low, Effort::High, Deadline::AfterSprint),
            task("high", Impact::High, Effort::Low, Deadline::Today),
            task("mid", Impact::High, Effort::High, Deadline::ThisSprint),
        ];
        let ranked = rank(&tasks);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn deadline_urgency_breaks_score_ties() {
        // BigBet+Today and QuickWin+AfterSprint-ish can't tie, so use two
        // equal-score pairs: FillIn+Today (70) vs BigBet+ThisSprint (70).
        let now = Utc::now();
        let a = Task::new("fill", "fill", Impact::Low, Effort::Low, Deadline::Today, now);
        let b = Task::new("bet", "bet", Impact::High, Effort::High, Deadline::ThisSprint, now);
        let ranked = rank(&[b.clone(), a.clone()]);
        assert_eq!(ranked[0].score, ranked[1].score);
        // Today is more urgent than ThisSprint.
        assert_eq!(ranked[0].id(), "fill");
    }

    #[test]
    fn created_at_breaks_remaining_ties() {
        let now = Utc::now();
        let older = Task::new("older", "x", Impact::High, Effort::Low, Deadline::Today, now);
        let newer = Task::new(
            "newer",
            "y",
            Impact::High,
            Effort::Low,
            Deadline::Today,
            now + Duration::seconds(5),
        );
        let ranked = rank(&[newer, older]);
        assert_eq!(ranked[0].id(), "older");
    }

    #[test]
    fn id_breaks_ties_at_identical_creation_instants() {
        let now = Utc::now();
        let a = Task::new("a", "x", Impact::High, Effort::Low, Deadline::Today, now);
        let b = Task::new("b", "y", Impact::High, Effort::Low, Deadline::Today, now);
        let ranked = rank(&[b, a]);
        assert_eq!(ranked[0].id(), "a");
        assert_eq!(ranked[1].id(), "b");
    }

    #[test]
    fn ranking_is_idempotent() {
        let tasks = vec![
            task("a", Impact::Low, Effort::Low, Deadline::ThisWeek),
            task("b", Impact::High, Effort::High, Deadline::Today),
            task("c", Impact::Low, Effort::High, Deadline::ThisSprint),
            task("d", Impact::High, Effort::Low, Deadline::AfterSprint),
        ];
        let once = rank(&tasks);
        let reordered: Vec<Task> = once.iter().map(|r| r.task.clone()).collect();
        let twice = rank(&reordered);
        assert_eq!(once, twice);
    }

    #[test]
    fn rank_does_not_mutate_input() {
        let tasks = vec![
            task("a", Impact::Low, Effort::High, Deadline::AfterSprint),
            task("b", Impact::High, Effort::Low, Deadline::Today),
        ];
        let before = tasks.clone();
        let _ = rank(&tasks);
        assert_eq!(tasks, before);
    }

    #[test]
    fn completion_freezes_derived_fields() {
        let t = task("a", Impact::High, Effort::Low, Deadline::Today);
        let created = t.created_at;
        let done = decorate(&t).complete(Utc::now());
        assert_eq!(done.score, 130);
        assert_eq!(done.tier, Tier::DoToday);
        assert!(done.completed_at >= created);
    }
}
