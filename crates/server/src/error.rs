//! HTTP error mapping.

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use taskrank_core::{TaskError, ValidationError};
use taskrank_storage::StorageError;
use thiserror::Error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was rejected by validation or prioritization
    #[error(transparent)]
    Task(#[from] TaskError),

    /// The task store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Task(TaskError::Validation(err))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError {
            index: None,
            field: Some("query"),
            message: rejection.body_text(),
        }
        .into()
    }
}

impl ApiError {
    /// HTTP status for the error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Task(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ApiError::Task(err) => {
                let mut body = json!({ "error": err.to_string(), "kind": err.code() });
                match err {
                    TaskError::CyclicDependency(cycle) => {
                        body["cycle"] = json!(cycle);
                    }
                    TaskError::Validation(v) => {
                        if let Some(index) = v.index {
                            body["index"] = json!(index);
                        }
                        if let Some(field) = v.field {
                            body["field"] = json!(field);
                        }
                    }
                    TaskError::InvalidMode(_) => {}
                }
                body
            }
            ApiError::Storage(err) => json!({ "error": err.to_string(), "kind": "storage_error" }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
