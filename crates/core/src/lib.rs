//! taskrank core data models.
//!
//! This crate defines the request-scoped value types that every other layer
//! works on: tasks as submitted and validated, prioritization modes, scored
//! output, and the error taxonomy returned to clients.

#![warn(missing_docs)]

mod id;
mod mode;
mod task;
mod error;

pub use id::TaskId;
pub use mode::{Mode, Weights};
pub use task::{
    Task, TaskInput, ScoredTask, Priority, DATE_FORMAT, tasks_from_json, ensure_unique_ids,
};
pub use error::{Result, TaskError, ValidationError};

/// Calendar date without a time component.
pub type Date = chrono::NaiveDate;
