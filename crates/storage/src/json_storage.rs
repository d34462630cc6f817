//! JSON file storage implementation.
//!
//! The whole task set lives in one JSON array file. Writes go to a sibling
//! temporary file first and are then renamed over the target.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use taskrank_core::{Task, TaskInput};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{Result, StorageError, TaskStore};

/// File-based JSON task store.
#[derive(Debug)]
pub struct JsonTaskStore {
    path: PathBuf,
    /// Serializes writers
    write_lock: Mutex<()>,
}

impl JsonTaskStore {
    /// Open a store at `path`, creating its parent directory. The file itself
    /// is created on first write; a missing file reads as an empty set.
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.file_name().is_none() {
            return Err(StorageError::Other(format!(
                "store path {} does not name a file",
                path.display()
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TaskStore for JsonTaskStore {
    async fn list_tasks(&self) -> Result<Vec<Task>> {
        let rows = read_json::<Vec<serde_json::Value>>(&self.path)
            .await?
            .unwrap_or_default();

        let mut tasks = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            match TaskInput::from_value(i, &row).and_then(|input| input.into_task(i)) {
                Ok(task) => tasks.push(task),
                Err(e) => warn!(path = %self.path.display(), row = i, error = %e, "skipping invalid task"),
            }
        }

        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    async fn replace_tasks(&self, tasks: &[Task]) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let json = serde_json::to_string_pretty(tasks)?;
        let temp = self.temp_path();
        fs::write(&temp, json.as_bytes()).await?;
        fs::rename(&temp, &self.path).await?;

        debug!(path = %self.path.display(), count = tasks.len(), "stored tasks");
        Ok(())
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) if json.trim().is_empty() => Ok(None),
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskrank_core::{Date, TaskId};

    fn task(id: &str, deps: &[&str]) -> Task {
        Task {
            id: TaskId::from(id),
            title: format!("Task {id}"),
            due_date: Date::from_ymd_opt(2025, 3, 14).unwrap(),
            estimated_hours: 2.5,
            importance: 7,
            dependencies: deps.iter().map(|d| TaskId::from(*d)).collect(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::new(dir.path().join("tasks.json")).await.unwrap();
        assert!(store.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");

        let store = JsonTaskStore::new(&path).await.unwrap();
        let tasks = vec![task("a", &[]), task("b", &["a"])];
        store.replace_tasks(&tasks).await.unwrap();

        let reopened = JsonTaskStore::new(&path).await.unwrap();
        assert_eq!(reopened.list_tasks().await.unwrap(), tasks);
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_format_uses_plain_dates() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonTaskStore::new(dir.path().join("tasks.json")).await.unwrap();
        store.replace_tasks(&[task("a", &[])]).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["due_date"], "2025-03-14");
        assert_eq!(value[0]["id"], "a");
    }

    #[tokio::test]
    async fn test_unreadable_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id": "ok", "title": "Ok", "due_date": "2025-03-14", "estimated_hours": 1.0, "importance": 3},
                {"id": "bad", "title": "Bad", "due_date": "someday"}]"#,
        )
        .unwrap();
        let store = JsonTaskStore::new(&path).await.unwrap();
        let tasks = store.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "ok");
    }

    #[tokio::test]
    async fn test_rows_failing_validation_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            r#"[{"id": "x", "title": "", "due_date": "2025-06-02", "estimated_hours": -3.0, "importance": 50},
                {"id": "neg", "title": "Negative", "due_date": "2025-06-02", "estimated_hours": -1.0, "importance": 5},
                {"id": "loud", "title": "Loud", "due_date": "2025-06-02", "estimated_hours": 1.0, "importance": 11},
                {"id": "y", "title": "Big", "due_date": "2025-06-05", "estimated_hours": 9.0, "importance": 5}]"#,
        )
        .unwrap();
        let store = JsonTaskStore::new(&path).await.unwrap();
        let tasks = store.list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id.as_str(), "y");
        assert_eq!(tasks[0].estimated_hours, 9.0);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{not json").unwrap();
        let store = JsonTaskStore::new(&path).await.unwrap();
        assert!(matches!(store.list_tasks().await, Err(StorageError::Json(_))));
    }
}
