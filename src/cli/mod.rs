//! Command-line interface definitions for the `dbmount` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI for the `dbmount` binary.
#[derive(Debug, Parser)]
#[command(
    name = "dbmount",
    about = "Create, inspect and remove Databricks cloud storage mounts",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Verify an existing mount and print its source URI.
    #[command(name = "read", about = "Verify an existing mount and print its source URI")]
    Read(MountArgs),
    /// Create the mount if absent and print its source URI.
    #[command(name = "mount", about = "Create the mount if absent and print its source URI")]
    Mount(MountArgs),
    /// Remove the mount.
    #[command(name = "unmount", about = "Remove the mount")]
    Unmount(MountArgs),
}

/// Arguments shared by every subcommand.
#[derive(Debug, Args)]
pub(crate) struct MountArgs {
    /// Cluster that executes the mount scripts.
    #[arg(long, env = "DBMOUNT_CLUSTER_ID", value_name = "ID")]
    pub(crate) cluster_id: String,
    /// Mount name; the mount lives at `/mnt/<NAME>`.
    #[arg(long, value_name = "NAME")]
    pub(crate) mount_name: String,
    /// Storage backend and its identity.
    #[command(subcommand)]
    pub(crate) storage: StorageArgs,
}

/// Credential kind for Blob Storage mounts.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum BlobAuthArg {
    /// Storage account access key.
    #[default]
    AccessKey,
    /// Shared access signature.
    Sas,
}

/// Secret scope entry holding a credential.
#[derive(Debug, Args)]
pub(crate) struct SecretArgs {
    /// Secret scope holding the credential.
    #[arg(long, value_name = "SCOPE", default_value = "")]
    pub(crate) secret_scope: String,
    /// Key of the credential within the secret scope.
    #[arg(long, value_name = "KEY", default_value = "")]
    pub(crate) secret_key: String,
}

/// Service principal used by the Data Lake backends.
#[derive(Debug, Args)]
pub(crate) struct PrincipalArgs {
    /// Application (client) id of the service principal.
    #[arg(long, value_name = "ID", default_value = "")]
    pub(crate) client_id: String,
    /// Azure AD tenant id.
    #[arg(long, value_name = "ID", default_value = "")]
    pub(crate) tenant_id: String,
    #[command(flatten)]
    pub(crate) secret: SecretArgs,
}

/// Storage backends a mount can target.
#[derive(Debug, Subcommand)]
pub(crate) enum StorageArgs {
    /// Azure Blob Storage container.
    #[command(name = "azure-blob")]
    AzureBlob {
        /// Container name.
        #[arg(long)]
        container: String,
        /// Storage account name.
        #[arg(long)]
        storage_account: String,
        /// Directory inside the container.
        #[arg(long, default_value = "")]
        directory: String,
        /// Credential kind stored in the secret scope.
        #[arg(long, value_enum, default_value_t = BlobAuthArg::AccessKey)]
        auth_type: BlobAuthArg,
        #[command(flatten)]
        secret: SecretArgs,
    },
    /// Azure Data Lake Storage Gen1 account.
    #[command(name = "adls-gen1")]
    AdlsGen1 {
        /// Data Lake Store resource name.
        #[arg(long)]
        storage_resource: String,
        /// Directory inside the store.
        #[arg(long, default_value = "")]
        directory: String,
        /// Spark configuration prefix, `fs.adl` when omitted.
        #[arg(long)]
        spark_conf_prefix: Option<String>,
        #[command(flatten)]
        principal: PrincipalArgs,
    },
    /// Azure Data Lake Storage Gen2 filesystem.
    #[command(name = "adls-gen2")]
    AdlsGen2 {
        /// Filesystem (container) name.
        #[arg(long)]
        container: String,
        /// Storage account name.
        #[arg(long)]
        storage_account: String,
        /// Directory inside the filesystem.
        #[arg(long, default_value = "")]
        directory: String,
        /// Create the filesystem when it does not exist.
        #[arg(long)]
        initialize_file_system: bool,
        #[command(flatten)]
        principal: PrincipalArgs,
    },
    /// AWS S3 bucket.
    #[command(name = "s3")]
    S3 {
        /// Bucket name.
        #[arg(long)]
        bucket: String,
    },
}
