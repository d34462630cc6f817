//! Scoring engine.

use taskrank_core::{Date, Mode, Priority, ScoredTask, Task};
use tracing::debug;

use crate::explain::explain;
use crate::factors::{Factors, Normalizer};

/// Scores tasks under a mode, relative to a reference date.
///
/// Scores depend on the whole set only through the urgency and effort
/// normalization; otherwise each task is scored on its own.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    today: Date,
}

impl ScoringEngine {
    /// Create an engine for a reference date ("today").
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    /// Reference date in use.
    pub fn today(&self) -> Date {
        self.today
    }

    /// Score every task, preserving input order.
    pub fn score(&self, tasks: &[Task], mode: Mode) -> Vec<ScoredTask> {
        let Some(normalizer) = Normalizer::new(tasks, self.today) else {
            return Vec::new();
        };

        tasks
            .iter()
            .map(|task| {
                let factors = normalizer.factors(task);
                let score = combine(mode, factors);
                debug!(
                    task = %task.id,
                    %mode,
                    urgency = factors.urgency,
                    impact = factors.impact,
                    effort = factors.effort,
                    score,
                    "scored task"
                );
                ScoredTask {
                    task: task.clone(),
                    score,
                    explanation: explain(mode, task, factors, self.today),
                    priority: Priority::from_score(score),
                    blocks: 0,
                }
            })
            .collect()
    }
}

/// Weighted sum of the factors on a 0-100 scale.
pub fn combine(mode: Mode, factors: Factors) -> f64 {
    let w = mode.weights();
    let raw = w.urgency * factors.urgency + w.impact * factors.impact + w.effort * factors.effort;
    (100.0 * raw).clamp(0.0, 100.0)
}
