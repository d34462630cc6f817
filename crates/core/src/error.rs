//! Error taxonomy shared by every layer.

use crate::id::TaskId;

/// Result alias for task operations.
pub type Result<T> = std::result::Result<T, TaskError>;

/// A rejected field in a task payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Position of the offending task in the submitted array, if known.
    pub index: Option<usize>,
    /// Name of the offending field, if the problem is field-specific.
    pub field: Option<&'static str>,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    /// Error on a specific field of the task at `index`.
    pub fn field(index: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            field: Some(field),
            message: message.into(),
        }
    }

    /// Error on a whole task entry.
    pub fn entry(index: usize, message: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            field: None,
            message: message.into(),
        }
    }

    /// Error not tied to a task entry (e.g. a query parameter).
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            index: None,
            field: None,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.index, self.field) {
            (Some(i), Some(field)) => write!(f, "tasks[{i}].{field}: {}", self.message),
            (Some(i), None) => write!(f, "tasks[{i}]: {}", self.message),
            (None, Some(field)) => write!(f, "{field}: {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors that reject an `analyze` or `suggest` request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskError {
    /// Missing or malformed input.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The in-set dependency relation loops back on itself.
    #[error("circular dependency: {}", format_cycle(.0))]
    CyclicDependency(Vec<TaskId>),

    /// Unrecognized mode token.
    #[error("invalid mode '{0}' (expected fastest_wins, high_impact, deadline_driven or smart_balance)")]
    InvalidMode(String),
}

impl TaskError {
    /// Stable machine-readable code for the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::CyclicDependency(_) => "cyclic_dependency",
            Self::InvalidMode(_) => "invalid_mode",
        }
    }
}

fn format_cycle(cycle: &[TaskId]) -> String {
    let mut out = cycle
        .iter()
        .map(TaskId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ");
    if let Some(first) = cycle.first() {
        out.push_str(" -> ");
        out.push_str(first.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = ValidationError::field(2, "importance", "must be between 1 and 10");
        assert_eq!(err.to_string(), "tasks[2].importance: must be between 1 and 10");
    }

    #[test]
    fn test_cycle_display_closes_loop() {
        let err = TaskError::CyclicDependency(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "circular dependency: a -> b -> a");
        assert_eq!(err.code(), "cyclic_dependency");
    }
}
