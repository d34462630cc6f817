//! HTTP boundary for taskrank.
//!
//! Exposes `analyze` and `suggest` over JSON and keeps a task set in a
//! [`TaskStore`] for server-side `suggest`.

#![warn(missing_docs)]

use std::sync::Arc;

use taskrank_execution::Budget;
use taskrank_storage::TaskStore;
use tokio::net::TcpListener;
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use routes::router;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn TaskStore>,
    budget: Budget,
}

impl AppState {
    /// State over a store, with the default hour budget for `suggest`.
    pub fn new(store: Arc<dyn TaskStore>, budget: Budget) -> Self {
        Self { store, budget }
    }

    /// The task store.
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Default hour budget.
    pub fn budget(&self) -> Budget {
        self.budget
    }
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, budget_hours = state.budget.hours(), "taskrank server listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
