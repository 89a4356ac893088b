//! Core library for verifying Databricks cloud storage mounts.
//!
//! A [`MountSpecification`] declares which storage a mount under `/mnt`
//! should point at. [`MountVerifier`] runs inspection, mount and unmount
//! scripts through a [`CommandExecutor`] and checks the source URI the
//! cluster reports against that declaration. [`DatabricksExecutor`] is the
//! production executor, speaking the workspace command execution API.

pub mod command;
pub mod config;
pub mod databricks;
pub mod mount;
pub mod test_support;
pub mod uri;
pub mod verify;

pub use command::{
    Command, CommandExecutor, CommandResult, CommandStatus, ExecutorFuture, Language, RemoteScript,
};
pub use config::{ConfigError, DatabricksConfig};
pub use databricks::{DatabricksExecutor, DatabricksExecutorError};
pub use mount::{
    AwsS3Mount, AzureAdlsGen1Mount, AzureAdlsGen2Mount, AzureBlobMount, BlobAuthType,
    ClientCredentials, MountError, MountSpecification, SecretRef, StorageMount,
};
pub use uri::{DecomposedUri, UriError, UriScheme, compose, decompose};
pub use verify::{MountVerifier, parse_inspection_result};
