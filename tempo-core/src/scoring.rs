//! Scoring engine: quadrant classification, score table, tier thresholds.
//!
//! Everything here is a pure total function over closed enum domains, so
//! there is no error path anywhere in this module.

use crate::task::{Deadline, Effort, Impact, Quadrant, Tier};

/// Tier lower bounds, inclusive, evaluated highest first.
pub const DO_TODAY_MIN: i32 = 90;
pub const SHOULD_DO_MIN: i32 = 60;
pub const COULD_DO_MIN: i32 = 30;

/// Impact x effort -> quadrant. The low-impact/high-effort arm is the
/// deliberate catch-all for work that costs a lot and moves little.
pub fn classify_quadrant(impact: Impact, effort: Effort) -> Quadrant {
    match (impact, effort) {
        (Impact::High, Effort::Low) => Quadrant::QuickWin,
        (Impact::High, Effort::High) => Quadrant::BigBet,
        (Impact::Low, Effort::Low) => Quadrant::FillIn,
        (Impact::Low, Effort::High) => Quadrant::TimeSink,
    }
}

pub fn base_score(quadrant: Quadrant) -> i32 {
    match quadrant {
        Quadrant::QuickWin => 100,
        Quadrant::BigBet => 70,
        Quadrant::FillIn => 40,
        Quadrant::TimeSink => 20,
    }
}

pub fn deadline_modifier(deadline: Deadline) -> i32 {
    match deadline {
        Deadline::Today => 30,
        Deadline::ThisWeek => 15,
        Deadline::ThisSprint => 0,
        Deadline::AfterSprint => -10,
    }
}

/// Score = quadrant base + deadline modifier. Range [10, 130].
pub fn compute_score(quadrant: Quadrant, deadline: Deadline) -> i32 {
    base_score(quadrant) + deadline_modifier(deadline)
}

pub fn classify_tier(score: i32) -> Tier {
    if score >= DO_TODAY_MIN {
        Tier::DoToday
    } else if score >= SHOULD_DO_MIN {
        Tier::ShouldDo
    } else if score >= COULD_DO_MIN {
        Tier::CouldDo
    } else {
        Tier::Defer
    }
}

/// Human-readable justification: quadrant, impact, effort, deadline clause.
///
/// Only 16 distinct strings exist over the input domain.
pub fn reason(impact: Impact, effort: Effort, deadline: Deadline) -> String {
    let quadrant = classify_quadrant(impact, effort);
    format!(
        "{} · {} · {} · {}",
        quadrant.label(),
        impact.label(),
        effort.label(),
        deadline.label()
    )
}
