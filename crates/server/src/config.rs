//! Server configuration.

use std::path::PathBuf;

use taskrank_execution::{Budget, DEFAULT_BUDGET_HOURS};

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Why it was rejected
        reason: String,
    },
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// JSON task store file
    pub store_path: PathBuf,
    /// Hour budget for `suggest` when the request names none
    pub default_budget_hours: f64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            store_path: PathBuf::from(".taskrank/tasks.json"),
            default_budget_hours: DEFAULT_BUDGET_HOURS,
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `TASKRANK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|var| std::env::var(var).ok())
    }

    /// Overlay values from `lookup` (an environment-like source).
    pub fn overlay(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("TASKRANK_HOST") {
            self.host = host;
        }
        if let Some(raw) = lookup("TASKRANK_PORT") {
            self.port = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: "TASKRANK_PORT",
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(path) = lookup("TASKRANK_STORE") {
            self.store_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("TASKRANK_BUDGET_HOURS") {
            let invalid = |reason: String| ConfigError::Invalid {
                var: "TASKRANK_BUDGET_HOURS",
                value: raw.clone(),
                reason,
            };
            let hours: f64 = raw.trim().parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
            Budget::new(hours).map_err(|e| invalid(e.message))?;
            self.default_budget_hours = hours;
        }
        Ok(self)
    }

    /// `host:port` to bind.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Default budget as a [`Budget`].
    pub fn budget(&self) -> Budget {
        Budget::new(self.default_budget_hours).unwrap_or_default()
    }
}
