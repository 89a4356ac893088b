//! Error types for the Databricks command executor.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while running a script through the Databricks API.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DatabricksExecutorError {
    /// Raised when the executor configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the HTTP request could not be sent or completed.
    #[error("request to {endpoint} failed: {message}")]
    Http {
        /// API path that was being called.
        endpoint: String,
        /// Transport error text.
        message: String,
    },
    /// Raised when the API answers with a non-success status.
    #[error("{endpoint} returned status {status}: {message}")]
    Api {
        /// API path that was being called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Error message reported by the workspace.
        message: String,
    },
    /// Raised when a response body cannot be decoded.
    #[error("unexpected response from {endpoint}: {message}")]
    Decode {
        /// API path that was being called.
        endpoint: String,
        /// Decoder error text.
        message: String,
    },
    /// Raised when a context or command does not settle before the
    /// configured timeout.
    #[error("timeout waiting for {action} {id} on cluster {cluster_id}")]
    Timeout {
        /// What was being waited for, `context` or `command`.
        action: String,
        /// Context or command identifier.
        id: String,
        /// Cluster identifier.
        cluster_id: String,
    },
    /// Raised when an execution context fails to start.
    #[error("execution context {context_id} on cluster {cluster_id} failed to start")]
    ContextFailed {
        /// Context identifier.
        context_id: String,
        /// Cluster identifier.
        cluster_id: String,
    },
}

impl From<ConfigError> for DatabricksExecutorError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
