//! Error types for mount verification.

use thiserror::Error;

use crate::uri::UriError;

/// Errors surfaced while reading, creating or removing a mount.
///
/// Every message is safe to show to an operator: it only contains
/// identifiers the caller already declared or text reported by the cluster.
#[derive(Debug, Error)]
pub enum MountError<TransportError>
where
    TransportError: std::error::Error + 'static,
{
    /// The executor could not run the script at all.
    #[error(transparent)]
    Transport(TransportError),
    /// The script ran but raised an error; carries the remote summary.
    #[error("{0}")]
    RemoteExecution(String),
    /// No mount exists under the requested name.
    #[error("unable to find mount point")]
    MountNotFound,
    /// The mount exists but points at a different account or container.
    #[error(
        "does not match uri with storage account and container values {declared} != {actual}!"
    )]
    IdentityMismatch {
        /// Declared identity, rendered as `{principal}@{qualifier}`.
        declared: String,
        /// URI reported by the cluster.
        actual: String,
    },
    /// The S3 mount exists but points at a different bucket.
    #[error("does not match bucket value {declared} != {actual}!")]
    BucketMismatch {
        /// Declared bucket name.
        declared: String,
        /// URI reported by the cluster.
        actual: String,
    },
    /// The reported URI could not be decomposed.
    #[error(transparent)]
    MalformedUri(#[from] UriError),
    /// The command finished without a text or error result.
    #[error("unexpected command result: {0}")]
    UnexpectedResult(String),
}

impl<TransportError> MountError<TransportError>
where
    TransportError: std::error::Error + 'static,
{
    /// Returns `true` when the failure means the mount does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::MountNotFound)
    }
}
