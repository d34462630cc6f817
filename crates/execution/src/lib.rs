//! Execution layer - dependency graph, "today" selection and the
//! analyze/suggest pipeline.

#![warn(missing_docs)]

pub mod dependency;
pub mod engine;
pub mod scheduler;
pub mod selector;

pub use dependency::TaskGraph;
pub use engine::{Prioritizer, PrioritizerConfig, Suggestion};
pub use scheduler::{Budget, HourLedger, DEFAULT_BUDGET_HOURS};
pub use selector::Selector;
