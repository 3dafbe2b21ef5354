//! Task model for the Tempo prioritization engine.
//!
//! Note: we keep these types small + serializable. Storage is a later layer
//! (`tempo-store`), and derived priority fields live on `RankedTask` so the
//! persisted shape never conflates with the presentation shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    High,
    Low,
}

impl Impact {
    pub fn label(self) -> &'static str {
        match self {
            Impact::High => "high impact",
            Impact::Low => "low impact",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Low,
    High,
}

impl Effort {
    pub fn label(self) -> &'static str {
        match self {
            Effort::Low => "low effort",
            Effort::High => "high effort",
        }
    }
}

/// Coarse deadline buckets. More urgent buckets sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    Today,
    ThisWeek,
    ThisSprint,
    AfterSprint,
}

impl Deadline {
    /// Urgency rank used as a ranking tie-break: 0 is most urgent.
    pub fn urgency(self) -> u8 {
        match self {
            Deadline::Today => 0,
            Deadline::ThisWeek => 1,
            Deadline::ThisSprint => 2,
            Deadline::AfterSprint => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Deadline::Today => "due today",
            Deadline::ThisWeek => "due this week",
            Deadline::ThisSprint => "due this sprint",
            Deadline::AfterSprint => "no rush",
        }
    }
}

/// Impact/effort quadrant, the base of the scoring formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    QuickWin,
    BigBet,
    FillIn,
    TimeSink,
}

impl Quadrant {
    pub fn label(self) -> &'static str {
        match self {
            Quadrant::QuickWin => "Quick win",
            Quadrant::BigBet => "Big bet",
            Quadrant::FillIn => "Fill-in",
            Quadrant::TimeSink => "Time sink",
        }
    }
}

/// Priority band derived from the score, used to group the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    DoToday,
    ShouldDo,
    CouldDo,
    Defer,
}

impl Tier {
    /// Dashboard order, highest band first.
    pub const ALL: [Tier; 4] = [Tier::DoToday, Tier::ShouldDo, Tier::CouldDo, Tier::Defer];

    pub fn heading(self) -> &'static str {
        match self {
            Tier::DoToday => "DO TODAY",
            Tier::ShouldDo => "SHOULD DO",
            Tier::CouldDo => "IF YOU HAVE TIME",
            Tier::Defer => "RECONSIDER",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Tier::DoToday => "Quick Wins",
            Tier::ShouldDo => "Big Bets & Promoted",
            Tier::CouldDo => "Fill-ins",
            Tier::Defer => "Time Sinks",
        }
    }
}

/// An active task. `created_at` is set once at creation and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub impact: Impact,
    pub effort: Effort,
    pub deadline: Deadline,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        impact: Impact,
        effort: Effort,
        deadline: Deadline,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            impact,
            effort,
            deadline,
            created_at,
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }
}

/// A completed task. Quadrant/score/tier/reason are frozen at the moment of
/// completion and carried as-is, never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub task: Task,
    pub quadrant: Quadrant,
    pub score: i32,
    pub tier: Tier,
    pub reason: String,
    pub completed_at: DateTime<Utc>,
}

impl CompletedTask {
    /// Move to the archive, stamping the archival time.
    pub fn archive(self, archived_at: DateTime<Utc>) -> ArchivedTask {
        ArchivedTask {
            completed: self,
            archived_at,
        }
    }

    /// Return to the active set: frozen derived fields and the completion
    /// timestamp are dropped, the original task fields survive.
    pub fn uncomplete(self) -> Task {
        self.task
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedTask {
    pub completed: CompletedTask,
    pub archived_at: DateTime<Utc>,
}

impl ArchivedTask {
    /// Restore from the archive back to the completed list.
    pub fn restore(self) -> CompletedTask {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn deadline_urgency_is_monotonic() {
        assert!(Deadline::Today.urgency() < Deadline::ThisWeek.urgency());
        assert!(Deadline::ThisWeek.urgency() < Deadline::ThisSprint.urgency());
        assert!(Deadline::ThisSprint.urgency() < Deadline::AfterSprint.urgency());
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(serde_json::to_string(&Impact::High).unwrap(), "\"high\"");
        assert_eq!(serde_json::to_string(&Deadline::ThisWeek).unwrap(), "\"this_week\"");
        assert_eq!(serde_json::to_string(&Quadrant::QuickWin).unwrap(), "\"quick_win\"");
        assert_eq!(serde_json::to_string(&Tier::DoToday).unwrap(), "\"do_today\"");
    }

    #[test]
    fn task_round_trips_through_json() {
        let t = Task::new(
            "t1",
            "Write report",
            Impact::High,
            Effort::Low,
            Deadline::Today,
            Utc::now(),
        );
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
        assert_eq!(back.created_at, t.created_at);
    }

    #[test]
    fn uncomplete_drops_frozen_fields() {
        let t = Task::new(
            "t1",
            "Write report",
            Impact::High,
            Effort::Low,
            Deadline::Today,
            Utc::now(),
        );
        let done = CompletedTask {
            task: t.clone(),
            quadrant: Quadrant::QuickWin,
            score: 130,
            tier: Tier::DoToday,
            reason: "Quick win · high impact · low effort · due today".to_string(),
            completed_at: Utc::now(),
        };
        assert_eq!(done.uncomplete(), t);
    }
}
