//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use crate::command::{Command, CommandExecutor, CommandResult, ExecutorFuture, Language};

/// Transport failure produced by [`ScriptedExecutor`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("{0}")]
pub struct ScriptedTransportError(pub String);

/// Records a single call made through [`ScriptedExecutor`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutorInvocation {
    /// Cluster the script was submitted to.
    pub cluster_id: String,
    /// Script language.
    pub language: Language,
    /// Script body.
    pub script: String,
}

#[derive(Debug, Default)]
struct ScriptState {
    responses: VecDeque<Result<Command, ScriptedTransportError>>,
    invocations: Vec<ExecutorInvocation>,
}

/// Executor that returns pre-seeded outcomes in FIFO order.
///
/// Clones share their queue and invocation log, so a test can keep a handle
/// after moving the executor into a verifier.
#[derive(Clone, Debug, Default)]
pub struct ScriptedExecutor {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedExecutor {
    /// Creates an executor with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a finished command with a text result.
    pub fn push_text(&self, data: impl Into<String>) {
        self.push_result(CommandResult::text(data));
    }

    /// Queues a finished command with an error result.
    pub fn push_error(&self, summary: impl Into<String>) {
        self.push_result(CommandResult::error(summary));
    }

    /// Queues a finished command carrying `result`.
    pub fn push_result(&self, result: CommandResult) {
        self.push_command(Command::finished(result));
    }

    /// Queues an arbitrary command envelope.
    pub fn push_command(&self, command: Command) {
        self.state().responses.push_back(Ok(command));
    }

    /// Queues a transport failure.
    pub fn push_transport_failure(&self, message: impl Into<String>) {
        self.state()
            .responses
            .push_back(Err(ScriptedTransportError(message.into())));
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<ExecutorInvocation> {
        self.state().invocations.clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    type Error = ScriptedTransportError;

    fn execute<'a>(
        &'a self,
        cluster_id: &'a str,
        language: Language,
        script: &'a str,
    ) -> ExecutorFuture<'a, Command, Self::Error> {
        let outcome = {
            let mut state = self.state();
            state.invocations.push(ExecutorInvocation {
                cluster_id: cluster_id.to_owned(),
                language,
                script: script.to_owned(),
            });
            state.responses.pop_front().unwrap_or_else(|| {
                Err(ScriptedTransportError(String::from(
                    "no scripted response queued",
                )))
            })
        };
        Box::pin(async move { outcome })
    }
}
