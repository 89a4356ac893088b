//! Binary entry point for the `dbmount` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use dbmount::{
    AwsS3Mount, AzureAdlsGen1Mount, AzureAdlsGen2Mount, AzureBlobMount, BlobAuthType,
    ClientCredentials, ConfigError, DatabricksConfig, DatabricksExecutor, DatabricksExecutorError,
    MountError, MountSpecification, MountVerifier, SecretRef, StorageMount,
};

mod cli;

use cli::{BlobAuthArg, Cli, MountArgs, PrincipalArgs, SecretArgs, StorageArgs};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Executor(#[from] DatabricksExecutorError),
    #[error(transparent)]
    Mount(#[from] MountError<DatabricksExecutorError>),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            write_line(io::stderr(), &err.to_string());
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let verifier = MountVerifier::new(executor_from_env()?);
    match cli {
        Cli::Read(args) => {
            let uri = verifier.read(&specification(args)).await?;
            write_line(io::stdout(), &uri);
        }
        Cli::Mount(args) => {
            let uri = verifier.create(&specification(args)).await?;
            write_line(io::stdout(), &uri);
        }
        Cli::Unmount(args) => verifier.delete(&specification(args)).await?,
    }
    Ok(())
}

fn executor_from_env() -> Result<DatabricksExecutor, CliError> {
    let config = DatabricksConfig::load_without_cli_args()?;
    Ok(DatabricksExecutor::new(&config)?)
}

fn specification(args: MountArgs) -> MountSpecification {
    MountSpecification::new(args.mount_name, args.cluster_id, storage(args.storage))
}

fn storage(args: StorageArgs) -> StorageMount {
    match args {
        StorageArgs::AzureBlob {
            container,
            storage_account,
            directory,
            auth_type,
            secret,
        } => AzureBlobMount::new(container, storage_account, directory)
            .with_auth(blob_auth(auth_type), secret_ref(secret))
            .into(),
        StorageArgs::AdlsGen1 {
            storage_resource,
            directory,
            spark_conf_prefix,
            principal,
        } => AzureAdlsGen1Mount::new(storage_resource, directory)
            .with_credentials(credentials(principal))
            .with_spark_conf_prefix(spark_conf_prefix.unwrap_or_default())
            .into(),
        StorageArgs::AdlsGen2 {
            container,
            storage_account,
            directory,
            initialize_file_system,
            principal,
        } => AzureAdlsGen2Mount::new(container, storage_account, directory)
            .with_credentials(credentials(principal))
            .with_initialize_file_system(initialize_file_system)
            .into(),
        StorageArgs::S3 { bucket } => AwsS3Mount::new(bucket).into(),
    }
}

const fn blob_auth(arg: BlobAuthArg) -> BlobAuthType {
    match arg {
        BlobAuthArg::AccessKey => BlobAuthType::AccessKey,
        BlobAuthArg::Sas => BlobAuthType::Sas,
    }
}

fn secret_ref(args: SecretArgs) -> SecretRef {
    SecretRef::new(args.secret_scope, args.secret_key)
}

fn credentials(args: PrincipalArgs) -> ClientCredentials {
    ClientCredentials::new(args.client_id, args.tenant_id, secret_ref(args.secret))
}

fn write_line(mut target: impl Write, text: &str) {
    writeln!(target, "{text}").ok();
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
