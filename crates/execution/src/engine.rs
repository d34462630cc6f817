//! The prioritization pipeline: validate, score, select.

use taskrank_core::{Date, Mode, Result, ScoredTask, Task};
use taskrank_scoring::ScoringEngine;
use tracing::{debug, info};

use crate::dependency::TaskGraph;
use crate::scheduler::Budget;
use crate::selector::Selector;

/// Configuration for the prioritizer.
#[derive(Debug, Clone, Default)]
pub struct PrioritizerConfig {
    /// Hour budget used by `suggest`
    pub budget: Budget,
}

/// Result of a `suggest` run.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// Selected tasks, in selection order
    pub tasks: Vec<ScoredTask>,
    /// Budget the selection was made against
    pub budget_hours: f64,
    /// Sum of the selected tasks' estimates
    pub total_hours: f64,
}

impl Suggestion {
    /// Budget left unused.
    pub fn remaining_hours(&self) -> f64 {
        (self.budget_hours - self.total_hours).max(0.0)
    }
}

/// Runs `analyze` and `suggest` for one reference date.
///
/// Every call is independent; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct Prioritizer {
    engine: ScoringEngine,
    config: PrioritizerConfig,
}

impl Prioritizer {
    /// Create a prioritizer for a reference date ("today").
    pub fn new(today: Date) -> Self {
        Self {
            engine: ScoringEngine::new(today),
            config: PrioritizerConfig::default(),
        }
    }

    /// Set the hour budget.
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.config.budget = budget;
        self
    }

    /// Reference date in use.
    pub fn today(&self) -> Date {
        self.engine.today()
    }

    /// Score every task, in input order.
    pub fn analyze(&self, tasks: &[Task], mode: Mode) -> Result<Vec<ScoredTask>> {
        let graph = TaskGraph::validate(tasks)?;
        let scored = self.score(tasks, &graph, mode);
        info!(tasks = scored.len(), %mode, today = %self.today(), "analyzed tasks");
        Ok(scored)
    }

    /// Score every task, highest score first. Equal scores keep input order.
    pub fn rank(&self, tasks: &[Task], mode: Mode) -> Result<Vec<ScoredTask>> {
        let mut scored = self.analyze(tasks, mode)?;
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(scored)
    }

    /// Pick today's tasks within the configured budget.
    pub fn suggest(&self, tasks: &[Task], mode: Mode) -> Result<Suggestion> {
        let graph = TaskGraph::validate(tasks)?;
        let scored = self.score(tasks, &graph, mode);

        let budget = self.config.budget;
        let chosen = Selector::new(budget).choose(&scored, &graph);
        let total_hours: f64 = chosen.iter().map(|t| t.task.estimated_hours).sum();

        info!(
            candidates = scored.len(),
            selected = chosen.len(),
            total_hours,
            budget_hours = budget.hours(),
            %mode,
            today = %self.today(),
            "suggested tasks for today"
        );

        Ok(Suggestion {
            tasks: chosen,
            budget_hours: budget.hours(),
            total_hours,
        })
    }

    fn score(&self, tasks: &[Task], graph: &TaskGraph, mode: Mode) -> Vec<ScoredTask> {
        let mut scored = self.engine.score(tasks, mode);
        for (i, task) in scored.iter_mut().enumerate() {
            task.blocks = graph.downstream_count(i);
        }

        let external: usize = (0..graph.len()).map(|i| graph.external_of(i).len()).sum();
        if external > 0 {
            debug!(external, "prerequisites outside the set treated as satisfied");
        }
        scored
    }
}
