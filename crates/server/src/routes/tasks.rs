//! Task prioritization endpoints.

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    response::Json as ResponseJson,
};
use serde::Deserialize;
use taskrank_core::{tasks_from_json, Date, Mode, ScoredTask, Task, ValidationError, DATE_FORMAT};
use taskrank_execution::{Budget, Prioritizer, TaskGraph};

use crate::{error::ApiError, AppState};

/// Query parameters shared by the prioritization endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PrioritizeQuery {
    /// Mode token; absent means smart balance
    pub mode: Option<String>,
    /// Hour budget override for suggest
    pub hours: Option<String>,
    /// Reference date override, `YYYY-MM-DD`
    pub today: Option<String>,
}

impl PrioritizeQuery {
    fn mode(&self) -> Result<Mode, ApiError> {
        Ok(Mode::from_query(self.mode.as_deref())?)
    }

    fn today(&self) -> Result<Date, ApiError> {
        match self.today.as_deref() {
            None => Ok(chrono::Local::now().date_naive()),
            Some(raw) => Date::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                query_error("today", format!("'{raw}' is not a date (expected YYYY-MM-DD)"))
            }),
        }
    }

    fn budget(&self, default: Budget) -> Result<Budget, ApiError> {
        let Some(raw) = self.hours.as_deref() else {
            return Ok(default);
        };
        let hours: f64 = raw
            .trim()
            .parse()
            .map_err(|_| query_error("hours", format!("'{raw}' is not a number")))?;
        Budget::new(hours).map_err(|e| query_error("hours", e.message))
    }

    fn prioritizer(&self, state: &AppState) -> Result<(Prioritizer, Mode), ApiError> {
        let mode = self.mode()?;
        let prioritizer = Prioritizer::new(self.today()?).with_budget(self.budget(state.budget())?);
        Ok((prioritizer, mode))
    }
}

fn query_error(field: &'static str, message: String) -> ApiError {
    ValidationError {
        index: None,
        field: Some(field),
        message,
    }
    .into()
}

fn parse_tasks(body: &[u8]) -> Result<Vec<Task>, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ValidationError::general(format!("request body is not valid JSON: {e}")))?;
    Ok(tasks_from_json(&value)?)
}

/// `POST /api/tasks/analyze`: score the posted tasks, in input order.
pub async fn analyze(
    State(state): State<AppState>,
    query: Result<Query<PrioritizeQuery>, QueryRejection>,
    body: Bytes,
) -> Result<ResponseJson<Vec<ScoredTask>>, ApiError> {
    let Query(query) = query?;
    let (prioritizer, mode) = query.prioritizer(&state)?;
    let tasks = parse_tasks(&body)?;
    Ok(ResponseJson(prioritizer.analyze(&tasks, mode)?))
}

/// `POST /api/tasks/suggest`: today's selection from the posted tasks.
pub async fn suggest_posted(
    State(state): State<AppState>,
    query: Result<Query<PrioritizeQuery>, QueryRejection>,
    body: Bytes,
) -> Result<ResponseJson<Vec<ScoredTask>>, ApiError> {
    let Query(query) = query?;
    let (prioritizer, mode) = query.prioritizer(&state)?;
    let tasks = parse_tasks(&body)?;
    Ok(ResponseJson(prioritizer.suggest(&tasks, mode)?.tasks))
}

/// `GET /api/tasks/suggest`: today's selection from the stored tasks.
pub async fn suggest_stored(
    State(state): State<AppState>,
    query: Result<Query<PrioritizeQuery>, QueryRejection>,
) -> Result<ResponseJson<Vec<ScoredTask>>, ApiError> {
    let Query(query) = query?;
    let (prioritizer, mode) = query.prioritizer(&state)?;
    let tasks = state.store().list_tasks().await?;
    Ok(ResponseJson(prioritizer.suggest(&tasks, mode)?.tasks))
}

/// `GET /api/tasks`: the stored task set.
pub async fn list_tasks(State(state): State<AppState>) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    Ok(ResponseJson(state.store().list_tasks().await?))
}

/// `POST /api/tasks`: validate and replace the stored task set.
pub async fn replace_tasks(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let tasks = parse_tasks(&body)?;
    TaskGraph::validate(&tasks)?;
    state.store().replace_tasks(&tasks).await?;
    tracing::info!(count = tasks.len(), "replaced stored tasks");
    Ok(ResponseJson(tasks))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use taskrank_storage::{MemoryTaskStore, TaskStore};
    use tower::ServiceExt;

    use super::*;
    use crate::router;

    fn app_with(store: Arc<MemoryTaskStore>) -> axum::Router {
        router(AppState::new(store, Budget::default()))
    }

    fn app() -> axum::Router {
        app_with(Arc::new(MemoryTaskStore::new()))
    }

    fn sample() -> Value {
        json!([
            {"id": "a", "title": "Write report", "due_date": "2025-06-02", "estimated_hours": 2, "importance": 9},
            {"id": "b", "title": "Review report", "due_date": "2025-06-11", "estimated_hours": 3, "importance": 3, "dependencies": ["a"]}
        ])
    }

    async fn call(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(v) => Body::from(v.to_string()),
                None => Body::empty(),
            })
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_analyze_scores_in_input_order() {
        let (status, body) = call(
            app(),
            "POST",
            "/api/tasks/analyze?mode=deadline_driven&today=2025-06-01",
            Some(sample()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let tasks = body.as_array().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0]["id"], "a");
        assert_eq!(tasks[1]["id"], "b");
        assert_eq!(tasks[0]["explanation"], "Due in 1 day");
        assert_eq!(tasks[0]["blocks"], 1);
        assert!(tasks[0]["score"].as_f64().unwrap() > tasks[1]["score"].as_f64().unwrap());
        assert_eq!(tasks[1]["dependencies"], json!(["a"]));
    }

    #[tokio::test]
    async fn test_analyze_trailing_slash_and_default_mode() {
        let (status, body) = call(app(), "POST", "/api/tasks/analyze/?today=2025-06-01", Some(sample())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_analyze_empty_list() {
        let (status, body) = call(app(), "POST", "/api/tasks/analyze?mode=high_impact", Some(json!([]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_unknown_mode_rejected() {
        let (status, body) = call(app(), "POST", "/api/tasks/analyze?mode=Fastest_Wins", Some(sample())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_mode");

        let (status, _) = call(app(), "GET", "/api/tasks/suggest?mode=urgent", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cycle_rejected_with_members() {
        let tasks = json!([
            {"id": "a", "title": "A", "due_date": "2025-06-02", "estimated_hours": 1, "importance": 5, "dependencies": ["b"]},
            {"id": "b", "title": "B", "due_date": "2025-06-02", "estimated_hours": 1, "importance": 5, "dependencies": ["a"]}
        ]);
        let (status, body) = call(app(), "POST", "/api/tasks/analyze", Some(tasks)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "cyclic_dependency");
        assert_eq!(body["cycle"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_task_locates_field() {
        let tasks = json!([
            {"id": "a", "title": "A", "due_date": "2025-06-02", "estimated_hours": 1, "importance": 5},
            {"id": "b", "title": "B", "due_date": "2025-06-02", "estimated_hours": 1, "importance": 11}
        ]);
        let (status, body) = call(app(), "POST", "/api/tasks/analyze", Some(tasks)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert_eq!(body["index"], 1);
        assert_eq!(body["field"], "importance");
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/tasks/analyze")
            .body(Body::from("[{"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_suggest_from_store_within_budget() {
        let store = Arc::new(MemoryTaskStore::new());
        let (status, _) = call(app_with(store.clone()), "POST", "/api/tasks", Some(sample())).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            app_with(store.clone()),
            "GET",
            "/api/tasks/suggest/?mode=deadline_driven&hours=4&today=2025-06-01",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|t| t["id"].clone()).collect();
        assert_eq!(ids, vec![json!("a")]);

        let (_, body) = call(
            app_with(store),
            "GET",
            "/api/tasks/suggest?mode=deadline_driven&today=2025-06-01",
            None,
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_suggest_posted_set() {
        let (status, body) = call(
            app(),
            "POST",
            "/api/tasks/suggest?mode=deadline_driven&hours=4&today=2025-06-01",
            Some(sample()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_hours_and_today_rejected() {
        let (status, body) = call(app(), "GET", "/api/tasks/suggest?hours=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "hours");

        let (status, body) = call(app(), "GET", "/api/tasks/suggest?today=tomorrow", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "today");
    }

    #[tokio::test]
    async fn test_repeated_query_field_gets_json_error() {
        let (status, body) = call(
            app(),
            "POST",
            "/api/tasks/analyze?mode=high_impact&mode=fastest_wins",
            Some(sample()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "validation_error");
        assert_eq!(body["field"], "query");
        assert!(body["error"].as_str().unwrap().contains("mode"));
    }

    #[tokio::test]
    async fn test_suggest_ignores_invalid_stored_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(
            &path,
            json!([
                {"id": "x", "title": "", "due_date": "2025-06-02", "estimated_hours": -3.0, "importance": 50},
                {"id": "y", "title": "Too big", "due_date": "2025-06-03", "estimated_hours": 9.0, "importance": 5},
                {"id": "z", "title": "Fits", "due_date": "2025-06-04", "estimated_hours": 2.0, "importance": 9}
            ])
            .to_string(),
        )
        .unwrap();
        let store = taskrank_storage::JsonTaskStore::new(&path).await.unwrap();
        let app = router(AppState::new(Arc::new(store), Budget::default()));

        let (status, body) = call(app, "GET", "/api/tasks/suggest?mode=high_impact&today=2025-06-01", None).await;
        assert_eq!(status, StatusCode::OK);
        let tasks = body.as_array().unwrap();
        let ids: Vec<_> = tasks.iter().map(|t| t["id"].clone()).collect();
        // z is picked; y is next but does not fit in 8 hours.
        assert_eq!(ids, vec![json!("z")]);
        assert!(tasks.iter().all(|t| t["score"].as_f64().unwrap() < 100.0));
    }

    #[tokio::test]
    async fn test_store_rejects_cycles_and_keeps_previous_set() {
        let store = Arc::new(MemoryTaskStore::new());
        let (status, body) = call(app_with(store.clone()), "POST", "/api/tasks/", Some(json!([
            {"title": "No id yet", "due_date": "2025-06-02", "estimated_hours": 1, "importance": 5}
        ])))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body[0]["id"].as_str().unwrap().is_empty());

        let cyclic = json!([
            {"id": 1, "title": "A", "due_date": "2025-06-02", "estimated_hours": 1, "importance": 5, "dependencies": [1]}
        ]);
        let (status, _) = call(app_with(store.clone()), "POST", "/api/tasks", Some(cyclic)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stored = store.list_tasks().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "No id yet");

        let (status, body) = call(app_with(store), "GET", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
