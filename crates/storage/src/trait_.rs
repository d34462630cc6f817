//! Storage trait abstraction.

use async_trait::async_trait;
use taskrank_core::Task;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Store holding the current task set.
///
/// Implementations are shared between request handlers, so both operations
/// take `&self`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All stored tasks, in stored order.
    async fn list_tasks(&self) -> Result<Vec<Task>>;

    /// Replace the whole stored set.
    async fn replace_tasks(&self, tasks: &[Task]) -> Result<()>;
}
