//! Explanation decision table.

use taskrank_core::{Date, Mode, Task, Weights};

use crate::factors::Factors;

/// A scoring factor, in tie-break order (urgency wins ties, then impact).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Factor {
    /// Due date proximity
    Urgency,
    /// Importance
    Impact,
    /// Low effort
    Effort,
}

/// The factor with the largest weighted contribution.
pub fn dominant(weights: Weights, factors: Factors) -> Factor {
    let contributions = [
        (Factor::Urgency, weights.urgency * factors.urgency),
        (Factor::Impact, weights.impact * factors.impact),
        (Factor::Effort, weights.effort * factors.effort),
    ];

    let mut best = contributions[0];
    for candidate in &contributions[1..] {
        if candidate.1 > best.1 {
            best = *candidate;
        }
    }
    best.0
}

/// Explanation for a task under `mode`.
///
/// The three single-focus modes always name their own factor; smart balance
/// names whichever factor contributed most.
pub fn explain(mode: Mode, task: &Task, factors: Factors, today: Date) -> String {
    let factor = match mode {
        Mode::FastestWins => Factor::Effort,
        Mode::HighImpact => Factor::Impact,
        Mode::DeadlineDriven => Factor::Urgency,
        Mode::SmartBalance => dominant(mode.weights(), factors),
    };
    describe(factor, task, today)
}

/// Fixed phrase for a factor.
pub fn describe(factor: Factor, task: &Task, today: Date) -> String {
    match factor {
        Factor::Urgency => deadline_phrase(task.days_until_due(today)),
        Factor::Impact => format!("High importance ({}/10)", task.importance),
        Factor::Effort => format!("Low effort ({}h), quick win", format_hours(task.estimated_hours)),
    }
}

fn deadline_phrase(days: i64) -> String {
    match days {
        d if d < 0 => "Overdue".to_string(),
        0 => "Due today".to_string(),
        1 => "Due in 1 day".to_string(),
        d => format!("Due in {d} days"),
    }
}

/// Hours with at most two decimals and no trailing zeros.
fn format_hours(hours: f64) -> String {
    let s = format!("{hours:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
