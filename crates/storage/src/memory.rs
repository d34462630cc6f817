//! In-memory task store.

use async_trait::async_trait;
use taskrank_core::Task;
use tokio::sync::RwLock;

use super::{Result, TaskStore};

/// Task store kept in process memory. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: RwLock<Vec<Task>>,
}

impl MemoryTaskStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `tasks`.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RwLock::new(tasks),
        }
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn replace_tasks(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.write().await = tasks.to_vec();
        Ok(())
    }
}
