//! Task model - the input record, its validation, and the scored output.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::id::TaskId;

/// Date format accepted for `due_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validated task. Immutable once built.
///
/// Deserializing goes through [`TaskInput`], so a decoded `Task` always
/// satisfies the same checks as a client payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Task {
    /// Unique identifier within the request
    pub id: TaskId,

    /// Display title
    pub title: String,

    /// Calendar due date
    pub due_date: NaiveDate,

    /// Effort in hours, always positive
    pub estimated_hours: f64,

    /// Stakeholder weight, 1 to 10
    pub importance: u8,

    /// Prerequisite ids; may name tasks outside the current set
    pub dependencies: Vec<TaskId>,
}

impl Task {
    /// Whole days from `today` until the due date; negative when overdue.
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Due strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }
}

impl TryFrom<Value> for Task {
    type Error = ValidationError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        TaskInput::from_value(0, &value)
            .and_then(|input| input.into_task(0))
            .map_err(|e| ValidationError { index: None, ..e })
    }
}

/// A task payload as submitted by a client, before validation.
///
/// Every field is optional here so that a missing field can be reported by
/// name instead of as a generic decode failure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskInput {
    /// Absent ids are generated.
    pub id: Option<TaskId>,
    /// Required.
    pub title: Option<String>,
    /// Required, `YYYY-MM-DD`.
    pub due_date: Option<String>,
    /// Required, positive.
    pub estimated_hours: Option<f64>,
    /// Required, 1 to 10.
    pub importance: Option<i64>,
    /// Absent means no prerequisites.
    pub dependencies: Option<Vec<TaskId>>,
}

impl TaskInput {
    /// Decode one array entry. Unknown keys (such as a previous `score`) are
    /// ignored; `null` counts as absent.
    pub fn from_value(index: usize, value: &Value) -> std::result::Result<Self, ValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::entry(index, "must be an object"))?;

        Ok(Self {
            id: field(obj, index, "id")?,
            title: field(obj, index, "title")?,
            due_date: field(obj, index, "due_date")?,
            estimated_hours: field(obj, index, "estimated_hours")?,
            importance: field(obj, index, "importance")?,
            dependencies: field(obj, index, "dependencies")?,
        })
    }

    /// Apply the defaulting rules and range checks.
    pub fn into_task(self, index: usize) -> std::result::Result<Task, ValidationError> {
        let title = self
            .title
            .ok_or_else(|| ValidationError::field(index, "title", "is required"))?;
        if title.trim().is_empty() {
            return Err(ValidationError::field(index, "title", "must not be blank"));
        }

        let raw_date = self
            .due_date
            .ok_or_else(|| ValidationError::field(index, "due_date", "is required"))?;
        let due_date = NaiveDate::parse_from_str(raw_date.trim(), DATE_FORMAT).map_err(|_| {
            ValidationError::field(index, "due_date", format!("'{raw_date}' is not a YYYY-MM-DD date"))
        })?;

        let estimated_hours = self
            .estimated_hours
            .ok_or_else(|| ValidationError::field(index, "estimated_hours", "is required"))?;
        if !estimated_hours.is_finite() || estimated_hours <= 0.0 {
            return Err(ValidationError::field(
                index,
                "estimated_hours",
                format!("must be a positive number (got {estimated_hours})"),
            ));
        }

        let importance = self
            .importance
            .ok_or_else(|| ValidationError::field(index, "importance", "is required"))?;
        if !(1..=10).contains(&importance) {
            return Err(ValidationError::field(
                index,
                "importance",
                format!("must be between 1 and 10 (got {importance})"),
            ));
        }

        let mut seen = HashSet::new();
        let dependencies = self
            .dependencies
            .unwrap_or_default()
            .into_iter()
            .filter(|dep| seen.insert(dep.clone()))
            .collect();

        Ok(Task {
            id: self.id.unwrap_or_else(TaskId::generate),
            title,
            due_date,
            estimated_hours,
            importance: importance as u8,
            dependencies,
        })
    }
}

fn field<T: DeserializeOwned>(
    obj: &Map<String, Value>,
    index: usize,
    name: &'static str,
) -> std::result::Result<Option<T>, ValidationError> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| ValidationError::field(index, name, e.to_string())),
    }
}

/// Validate a client payload: it must be a JSON array of task objects with
/// unique ids.
pub fn tasks_from_json(payload: &Value) -> Result<Vec<Task>> {
    let entries = payload
        .as_array()
        .ok_or_else(|| ValidationError::general("input must be a list of tasks"))?;

    let tasks = entries
        .iter()
        .enumerate()
        .map(|(i, v)| TaskInput::from_value(i, v)?.into_task(i))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    ensure_unique_ids(&tasks)?;
    Ok(tasks)
}

/// Reject a set in which two tasks share an id.
pub fn ensure_unique_ids(tasks: &[Task]) -> Result<()> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if !seen.insert(task.id.as_str()) {
            return Err(ValidationError::field(
                i,
                "id",
                format!("duplicate id '{}'", task.id),
            )
            .into());
        }
    }
    Ok(())
}

/// Colour band used by the client's priority badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Score of 80 or more
    High,
    /// Score of 50 or more
    Medium,
    /// Anything lower
    Low,
}

impl Priority {
    /// Band for a score.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Priority::High
        } else if score >= 50.0 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// A task together with its score under some mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    /// The scored task
    #[serde(flatten)]
    pub task: Task,

    /// Priority score in [0, 100]
    pub score: f64,

    /// Dominant reason behind the score
    pub explanation: String,

    /// Badge band derived from `score`
    pub priority: Priority,

    /// How many in-set tasks transitively wait on this one
    #[serde(default)]
    pub blocks: usize,
}

impl ScoredTask {
    /// Shorthand for the task id.
    pub fn id(&self) -> &TaskId {
        &self.task.id
    }
}
