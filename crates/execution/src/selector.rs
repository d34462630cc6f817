//! "Today" selection.
//!
//! Greedy by score among tasks whose in-set prerequisites have already been
//! picked, until the next pick would overflow the hour budget. This is an
//! approximation of a precedence-constrained knapsack; it is kept greedy so
//! the result can be explained task by task.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use taskrank_core::ScoredTask;
use tracing::debug;

use crate::dependency::TaskGraph;
use crate::scheduler::{Budget, HourLedger};

/// An eligible task waiting to be picked.
#[derive(Debug)]
struct Candidate {
    score: f64,
    /// Position in the topological order
    rank: usize,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    /// Max-heap order: higher score first, then earlier topological rank.
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.rank.cmp(&self.rank))
    }
}

/// Picks today's tasks under an hour budget.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    budget: Budget,
}

impl Selector {
    /// Create a selector for a budget.
    pub fn new(budget: Budget) -> Self {
        Self { budget }
    }

    /// Choose the subset, in selection order.
    ///
    /// `scored` must be the scored form of the task set `graph` was built
    /// from. Prerequisites outside the set count as satisfied.
    pub fn choose(&self, scored: &[ScoredTask], graph: &TaskGraph) -> Vec<ScoredTask> {
        let mut by_index: Vec<Option<&ScoredTask>> = vec![None; graph.len()];
        for task in scored {
            if let Some(i) = graph.index_of(task.id().as_str()) {
                by_index[i] = Some(task);
            }
        }

        let mut rank = vec![0; graph.len()];
        for (pos, &i) in graph.topological_order().iter().enumerate() {
            rank[i] = pos;
        }

        let mut waiting: Vec<usize> = (0..graph.len())
            .map(|i| graph.prerequisites_of(i).len())
            .collect();

        let candidate = |index: usize| {
            by_index[index].map(|t| Candidate {
                score: t.score,
                rank: rank[index],
                index,
            })
        };

        let mut eligible: BinaryHeap<Candidate> = (0..graph.len())
            .filter(|&i| waiting[i] == 0)
            .filter_map(candidate)
            .collect();

        let mut ledger = HourLedger::new(self.budget);
        let mut chosen = Vec::new();

        while let Some(next) = eligible.pop() {
            let Some(task) = by_index[next.index] else {
                continue;
            };
            let hours = task.task.estimated_hours;
            if !ledger.fits(hours) {
                debug!(
                    task = %task.id(),
                    hours,
                    remaining = ledger.remaining(),
                    "next task does not fit the budget; stopping"
                );
                break;
            }

            ledger.commit(hours);
            chosen.push(task.clone());
            debug!(task = %task.id(), hours, used = ledger.used(), "selected for today");

            for &child in graph.dependents_of(next.index) {
                waiting[child] -= 1;
                if waiting[child] == 0 {
                    if let Some(c) = candidate(child) {
                        eligible.push(c);
                    }
                }
            }
        }

        chosen
    }
}
