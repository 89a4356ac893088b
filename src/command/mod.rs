//! Remote command execution capability consumed by mount verification.
//!
//! Verification never talks to a cluster directly. It hands a script to a
//! [`CommandExecutor`] and interprets the [`Command`] envelope that comes
//! back. The Databricks implementation lives in [`crate::databricks`]; tests
//! use the scripted executor from [`crate::test_support`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Scripting languages accepted by the remote execution channel.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Python, used for all `dbutils` mount scripts.
    Python,
    /// Scala.
    Scala,
    /// Spark SQL.
    Sql,
    /// R.
    R,
}

impl Language {
    /// Returns the wire name of the language.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Scala => "scala",
            Self::Sql => "sql",
            Self::R => "r",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A script ready to be submitted to a cluster.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteScript {
    /// Language the body is written in.
    pub language: Language,
    /// Script source.
    pub body: String,
}

impl RemoteScript {
    /// Creates a Python script.
    #[must_use]
    pub fn python(body: impl Into<String>) -> Self {
        Self {
            language: Language::Python,
            body: body.into(),
        }
    }
}

/// Result payload attached to a finished command, tagged by `resultType`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(tag = "resultType", rename_all = "lowercase")]
pub enum CommandResult {
    /// Plain text output, such as the value passed to `dbutils.notebook.exit`.
    Text {
        /// Text printed or returned by the script.
        #[serde(default)]
        data: String,
    },
    /// The script raised an error on the cluster.
    Error {
        /// Human readable error summary reported by the cluster.
        #[serde(default)]
        summary: String,
        /// Optional stack trace or cause text.
        #[serde(default)]
        cause: Option<String>,
    },
    /// Tabular output.
    Table {
        /// Raw table rows.
        #[serde(default)]
        data: serde_json::Value,
    },
    /// Image output.
    Image {
        /// Name of the rendered image file.
        #[serde(default, rename = "fileName")]
        file_name: Option<String>,
    },
    /// Any result type this crate does not model.
    #[serde(other)]
    Unknown,
}

impl CommandResult {
    /// Builds a text result.
    #[must_use]
    pub fn text(data: impl Into<String>) -> Self {
        Self::Text { data: data.into() }
    }

    /// Builds an error result with the given summary.
    #[must_use]
    pub fn error(summary: impl Into<String>) -> Self {
        Self::Error {
            summary: summary.into(),
            cause: None,
        }
    }

    /// Returns the `resultType` tag for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Error { .. } => "error",
            Self::Table { .. } => "table",
            Self::Image { .. } => "image",
            Self::Unknown => "unknown",
        }
    }
}

/// Lifecycle state of a submitted command.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
pub enum CommandStatus {
    /// Waiting for an execution slot.
    Queued,
    /// Currently executing.
    Running,
    /// Cancellation requested.
    Cancelling,
    /// Completed; results are available.
    Finished,
    /// Cancelled before completion.
    Cancelled,
    /// The execution channel failed.
    Error,
    /// Status not reported or not recognised.
    #[default]
    #[serde(other)]
    Unknown,
}

impl CommandStatus {
    /// Returns `true` once the command will not change state again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled | Self::Error)
    }
}

/// Envelope describing a command submitted to a cluster.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Command {
    /// Identifier assigned by the execution channel.
    #[serde(default)]
    pub id: String,
    /// Final or current status.
    #[serde(default)]
    pub status: CommandStatus,
    /// Results, present once the command has finished.
    #[serde(default)]
    pub results: Option<CommandResult>,
}

impl Command {
    /// Builds a finished command carrying `result`.
    #[must_use]
    pub fn finished(result: CommandResult) -> Self {
        Self {
            id: String::new(),
            status: CommandStatus::Finished,
            results: Some(result),
        }
    }
}

/// Future returned by executor operations.
pub type ExecutorFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Capability that runs a script on a cluster and reports its outcome.
///
/// Implementations must tolerate concurrent calls; each call is independent
/// and must not observe the state of another.
pub trait CommandExecutor {
    /// Transport level error, returned when the script could not be run at
    /// all (unreachable cluster, rejected credentials and the like).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Submits `script` in `language` to `cluster_id` and waits for it to
    /// finish.
    fn execute<'a>(
        &'a self,
        cluster_id: &'a str,
        language: Language,
        script: &'a str,
    ) -> ExecutorFuture<'a, Command, Self::Error>;
}

impl<T> CommandExecutor for &T
where
    T: CommandExecutor + Sync,
{
    type Error = T::Error;

    fn execute<'a>(
        &'a self,
        cluster_id: &'a str,
        language: Language,
        script: &'a str,
    ) -> ExecutorFuture<'a, Command, Self::Error> {
        (**self).execute(cluster_id, language, script)
    }
}
