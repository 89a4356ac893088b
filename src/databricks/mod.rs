//! Databricks command execution backed by the workspace REST API 1.2.
//!
//! Each call opens an execution context on the target cluster, waits for it
//! to start, submits the script, polls until the command settles and
//! destroys the context again.

mod error;
mod types;

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::command::{Command, CommandExecutor, ExecutorFuture, Language};
use crate::config::DatabricksConfig;

pub use error::DatabricksExecutorError;
use types::{
    ApiErrorBody, ContextStatus, ContextStatusResponse, CreateContextRequest,
    DestroyContextRequest, ExecuteCommandRequest, IdResponse,
};

const CONTEXTS_CREATE: &str = "/api/1.2/contexts/create";
const CONTEXTS_DESTROY: &str = "/api/1.2/contexts/destroy";
const CONTEXTS_STATUS: &str = "/api/1.2/contexts/status";
const COMMANDS_EXECUTE: &str = "/api/1.2/commands/execute";
const COMMANDS_STATUS: &str = "/api/1.2/commands/status";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// [`CommandExecutor`] that runs scripts on a Databricks cluster.
#[derive(Clone)]
pub struct DatabricksExecutor {
    client: Client,
    base_url: String,
    token: String,
    poll_interval: Duration,
    command_timeout: Duration,
}

impl fmt::Debug for DatabricksExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabricksExecutor")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("poll_interval", &self.poll_interval)
            .field("command_timeout", &self.command_timeout)
            .finish_non_exhaustive()
    }
}

impl DatabricksExecutor {
    /// Builds an executor from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DatabricksExecutorError::Config`] when validation fails or
    /// the HTTP client cannot be constructed.
    pub fn new(config: &DatabricksConfig) -> Result<Self, DatabricksExecutorError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| DatabricksExecutorError::Config(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            token: config.token.clone(),
            poll_interval: config.poll_interval(),
            command_timeout: config.command_timeout(),
        })
    }

    /// Overrides the interval between status polls.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Overrides how long a command may run before the executor gives up.
    #[must_use]
    pub const fn with_command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn post<B, T>(&self, endpoint: &str, body: &B) -> Result<T, DatabricksExecutorError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(&self.token)
            .json(body);
        self.send(endpoint, request).await
    }

    async fn send<T>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<T, DatabricksExecutorError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|err| DatabricksExecutorError::Http {
                endpoint: endpoint.to_owned(),
                message: err.to_string(),
            })?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| DatabricksExecutorError::Http {
                endpoint: endpoint.to_owned(),
                message: err.to_string(),
            })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(ApiErrorBody::describe)
                .unwrap_or(text);
            return Err(DatabricksExecutorError::Api {
                endpoint: endpoint.to_owned(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|err| DatabricksExecutorError::Decode {
            endpoint: endpoint.to_owned(),
            message: err.to_string(),
        })
    }

    async fn create_context(
        &self,
        cluster_id: &str,
        language: Language,
    ) -> Result<String, DatabricksExecutorError> {
        let response: IdResponse = self
            .post(
                CONTEXTS_CREATE,
                &CreateContextRequest {
                    language,
                    cluster_id,
                },
            )
            .await?;
        Ok(response.id)
    }

    async fn destroy_context(
        &self,
        cluster_id: &str,
        context_id: &str,
    ) -> Result<(), DatabricksExecutorError> {
        let _: serde_json::Value = self
            .post(
                CONTEXTS_DESTROY,
                &DestroyContextRequest {
                    cluster_id,
                    context_id,
                },
            )
            .await?;
        Ok(())
    }

    /// Deadline for the current wait; `None` when the timeout is too large
    /// to represent, in which case the wait is unbounded.
    fn deadline(&self) -> Option<Instant> {
        Instant::now().checked_add(self.command_timeout)
    }

    async fn context_status(
        &self,
        cluster_id: &str,
        context_id: &str,
    ) -> Result<ContextStatus, DatabricksExecutorError> {
        let request = self
            .client
            .get(self.url(CONTEXTS_STATUS))
            .bearer_auth(&self.token)
            .query(&[("clusterId", cluster_id), ("contextId", context_id)]);
        let response: ContextStatusResponse = self.send(CONTEXTS_STATUS, request).await?;
        Ok(response.status)
    }

    async fn wait_for_context(
        &self,
        cluster_id: &str,
        context_id: &str,
    ) -> Result<(), DatabricksExecutorError> {
        let deadline = self.deadline();
        while before(deadline) {
            match self.context_status(cluster_id, context_id).await? {
                ContextStatus::Running => return Ok(()),
                ContextStatus::Error => {
                    return Err(DatabricksExecutorError::ContextFailed {
                        context_id: context_id.to_owned(),
                        cluster_id: cluster_id.to_owned(),
                    });
                }
                status => debug!(context_id, ?status, "context not ready"),
            }
            sleep(self.poll_interval).await;
        }

        Err(DatabricksExecutorError::Timeout {
            action: String::from("context"),
            id: context_id.to_owned(),
            cluster_id: cluster_id.to_owned(),
        })
    }

    async fn command_status(
        &self,
        cluster_id: &str,
        context_id: &str,
        command_id: &str,
    ) -> Result<Command, DatabricksExecutorError> {
        let request = self
            .client
            .get(self.url(COMMANDS_STATUS))
            .bearer_auth(&self.token)
            .query(&[
                ("clusterId", cluster_id),
                ("contextId", context_id),
                ("commandId", command_id),
            ]);
        self.send(COMMANDS_STATUS, request).await
    }

    async fn wait_for_command(
        &self,
        cluster_id: &str,
        context_id: &str,
        command_id: &str,
    ) -> Result<Command, DatabricksExecutorError> {
        let deadline = self.deadline();
        while before(deadline) {
            let command = self
                .command_status(cluster_id, context_id, command_id)
                .await?;
            if command.status.is_terminal() {
                return Ok(command);
            }
            debug!(command_id, status = ?command.status, "command still running");
            sleep(self.poll_interval).await;
        }

        Err(DatabricksExecutorError::Timeout {
            action: String::from("command"),
            id: command_id.to_owned(),
            cluster_id: cluster_id.to_owned(),
        })
    }

    async fn run_in_context(
        &self,
        cluster_id: &str,
        context_id: &str,
        language: Language,
        script: &str,
    ) -> Result<Command, DatabricksExecutorError> {
        self.wait_for_context(cluster_id, context_id).await?;
        let submitted: IdResponse = self
            .post(
                COMMANDS_EXECUTE,
                &ExecuteCommandRequest {
                    language,
                    cluster_id,
                    context_id,
                    command: script,
                },
            )
            .await?;
        debug!(command_id = %submitted.id, "command submitted");
        self.wait_for_command(cluster_id, context_id, &submitted.id)
            .await
    }

    async fn run(
        &self,
        cluster_id: &str,
        language: Language,
        script: &str,
    ) -> Result<Command, DatabricksExecutorError> {
        let context_id = self.create_context(cluster_id, language).await?;
        debug!(cluster_id, %context_id, "execution context created");

        let outcome = self
            .run_in_context(cluster_id, &context_id, language, script)
            .await;

        if let Err(err) = self.destroy_context(cluster_id, &context_id).await {
            warn!(cluster_id, %context_id, error = %err, "failed to destroy execution context");
        }

        outcome
    }
}

fn before(deadline: Option<Instant>) -> bool {
    deadline.is_none_or(|limit| Instant::now() <= limit)
}

impl CommandExecutor for DatabricksExecutor {
    type Error = DatabricksExecutorError;

    fn execute<'a>(
        &'a self,
        cluster_id: &'a str,
        language: Language,
        script: &'a str,
    ) -> ExecutorFuture<'a, Command, Self::Error> {
        Box::pin(self.run(cluster_id, language, script))
    }
}
