//! Route table.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub mod tasks;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::replace_tasks))
        .route("/api/tasks/", get(tasks::list_tasks).post(tasks::replace_tasks))
        .route("/api/tasks/analyze", post(tasks::analyze))
        .route("/api/tasks/analyze/", post(tasks::analyze))
        .route(
            "/api/tasks/suggest",
            get(tasks::suggest_stored).post(tasks::suggest_posted),
        )
        .route(
            "/api/tasks/suggest/",
            get(tasks::suggest_stored).post(tasks::suggest_posted),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
