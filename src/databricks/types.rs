//! Request and response bodies for the command execution API 1.2.

use serde::{Deserialize, Serialize};

use crate::command::Language;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateContextRequest<'a> {
    pub(super) language: Language,
    pub(super) cluster_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ExecuteCommandRequest<'a> {
    pub(super) language: Language,
    pub(super) cluster_id: &'a str,
    pub(super) context_id: &'a str,
    pub(super) command: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DestroyContextRequest<'a> {
    pub(super) cluster_id: &'a str,
    pub(super) context_id: &'a str,
}

/// Body returned by both `contexts/create` and `commands/execute`.
#[derive(Debug, Deserialize)]
pub(super) struct IdResponse {
    pub(super) id: String,
}

/// State of an execution context.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub(super) enum ContextStatus {
    Pending,
    Running,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Body returned by `contexts/status`.
#[derive(Debug, Deserialize)]
pub(super) struct ContextStatusResponse {
    #[serde(default)]
    pub(super) status: ContextStatus,
}

/// Error body returned by the workspace on non-success statuses.
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    #[serde(default)]
    pub(super) error_code: Option<String>,
    #[serde(default)]
    pub(super) message: Option<String>,
    #[serde(default)]
    pub(super) error: Option<String>,
}

impl ApiErrorBody {
    pub(super) fn describe(self) -> Option<String> {
        let message = self.message.or(self.error)?;
        Some(match self.error_code {
            Some(code) => format!("{code}: {message}"),
            None => message,
        })
    }
}
