//! Reads live mounts and checks them against their declared specification.
//!
//! [`MountVerifier`] owns the injected [`CommandExecutor`] and holds no other
//! state, so one verifier can serve any number of concurrent calls.

use tracing::{debug, info, instrument};

use crate::command::{Command, CommandExecutor, CommandResult, RemoteScript};
use crate::mount::{MountError, MountSpecification};

/// Interprets the envelope returned for an inspection or mount script.
///
/// Error results surface their summary verbatim, empty text means the mount
/// does not exist, and any other text is returned unchanged.
///
/// # Errors
///
/// Returns [`MountError::RemoteExecution`], [`MountError::MountNotFound`] or
/// [`MountError::UnexpectedResult`] as described above.
pub fn parse_inspection_result<E>(command: &Command) -> Result<String, MountError<E>>
where
    E: std::error::Error + 'static,
{
    match &command.results {
        Some(CommandResult::Text { data }) if data.is_empty() => Err(MountError::MountNotFound),
        Some(CommandResult::Text { data }) => Ok(data.clone()),
        Some(CommandResult::Error { summary, .. }) => {
            Err(MountError::RemoteExecution(summary.clone()))
        }
        Some(other) => Err(MountError::UnexpectedResult(format!(
            "result type {}",
            other.kind()
        ))),
        None => Err(MountError::UnexpectedResult(format!(
            "command {} finished without results",
            command.id
        ))),
    }
}

/// Runs mount scripts through an executor and validates what comes back.
#[derive(Clone, Debug)]
pub struct MountVerifier<E> {
    executor: E,
}

impl<E> MountVerifier<E>
where
    E: CommandExecutor,
{
    /// Creates a verifier around `executor`.
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns the wrapped executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Reads the mount named by `spec` and confirms it targets the declared
    /// storage. Returns the URI exactly as the cluster reported it.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::Transport`] when the executor fails,
    /// [`MountError::RemoteExecution`] when the script raises,
    /// [`MountError::MountNotFound`] when nothing is mounted,
    /// [`MountError::MalformedUri`] when the source cannot be decomposed and a
    /// mismatch variant when the identity differs.
    #[instrument(
        skip(self, spec),
        fields(
            cluster_id = spec.cluster_id(),
            mount_name = spec.mount_name(),
            storage = spec.storage().kind()
        )
    )]
    pub async fn read(&self, spec: &MountSpecification) -> Result<String, MountError<E::Error>> {
        let command = self.submit(spec, &spec.inspection_script()).await?;
        let source = parse_inspection_result::<E::Error>(&command)?;
        spec.storage().verify_source::<E::Error>(&source)?;
        info!(%source, "mount matches declaration");
        Ok(source)
    }

    /// Creates the mount named by `spec`, or keeps an existing one, and
    /// returns the source the cluster reports after checking its identity.
    ///
    /// # Errors
    ///
    /// Same as [`MountVerifier::read`]; an existing mount pointing elsewhere
    /// yields a mismatch error.
    #[instrument(
        skip(self, spec),
        fields(
            cluster_id = spec.cluster_id(),
            mount_name = spec.mount_name(),
            storage = spec.storage().kind()
        )
    )]
    pub async fn create(&self, spec: &MountSpecification) -> Result<String, MountError<E::Error>> {
        let command = self.submit(spec, &spec.mount_script()).await?;
        let source = parse_inspection_result::<E::Error>(&command)?;
        spec.storage().verify_source::<E::Error>(&source)?;
        info!(%source, "mount created");
        Ok(source)
    }

    /// Removes the mount named by `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::Transport`] when the executor fails and
    /// [`MountError::RemoteExecution`] when the unmount call raises.
    #[instrument(
        skip(self, spec),
        fields(cluster_id = spec.cluster_id(), mount_name = spec.mount_name())
    )]
    pub async fn delete(&self, spec: &MountSpecification) -> Result<(), MountError<E::Error>> {
        let command = self.submit(spec, &spec.unmount_script()).await?;
        if let Some(CommandResult::Error { summary, .. }) = command.results {
            return Err(MountError::RemoteExecution(summary));
        }
        info!("mount removed");
        Ok(())
    }

    async fn submit(
        &self,
        spec: &MountSpecification,
        script: &RemoteScript,
    ) -> Result<Command, MountError<E::Error>> {
        debug!(language = %script.language, "submitting script");
        self.executor
            .execute(spec.cluster_id(), script.language, &script.body)
            .await
            .map_err(MountError::Transport)
    }
}
