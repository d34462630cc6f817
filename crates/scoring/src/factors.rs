//! Normalized scoring factors.
//!
//! Each task is reduced to three numbers in [0, 1]:
//! - urgency: how close the due date is, relative to the spread of due
//!   dates in the same set (overdue is always 1)
//! - impact: importance / 10
//! - effort: inverse of estimated hours relative to the largest task

use taskrank_core::{Date, Task};

/// Guard added to the due-date spread so a set whose tasks share one due
/// date does not divide by zero.
pub const EPSILON: f64 = 1e-9;

/// The three factors of one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factors {
    /// Urgency in [0, 1]
    pub urgency: f64,
    /// Impact in [0, 1]
    pub impact: f64,
    /// Effort-inverse in [0, 1]
    pub effort: f64,
}

/// Set-wide statistics the factors are normalized against.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    today: Date,
    min_days: i64,
    max_days: i64,
    max_hours: f64,
}

impl Normalizer {
    /// Collect min/max days-until-due and max hours over `tasks`.
    ///
    /// Returns `None` for an empty set.
    pub fn new(tasks: &[Task], today: Date) -> Option<Self> {
        let first = tasks.first()?;
        let mut min_days = first.days_until_due(today);
        let mut max_days = min_days;
        let mut max_hours = first.estimated_hours;

        for task in &tasks[1..] {
            let days = task.days_until_due(today);
            min_days = min_days.min(days);
            max_days = max_days.max(days);
            max_hours = max_hours.max(task.estimated_hours);
        }

        Some(Self { today, min_days, max_days, max_hours })
    }

    /// Factors of a task belonging to the set this normalizer was built from.
    pub fn factors(&self, task: &Task) -> Factors {
        Factors {
            urgency: self.urgency(task),
            impact: f64::from(task.importance) / 10.0,
            effort: 1.0 - clamp_unit(task.estimated_hours / self.max_hours),
        }
    }

    fn urgency(&self, task: &Task) -> f64 {
        if task.is_overdue(self.today) {
            return 1.0;
        }
        let days = task.days_until_due(self.today);
        let spread = (self.max_days - self.min_days) as f64 + EPSILON;
        1.0 - clamp_unit((days - self.min_days) as f64 / spread)
    }
}

fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
