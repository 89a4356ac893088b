//! Unit tests for the `dbmount` CLI binary implementation.

use super::*;
use rstest::rstest;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("dbmount").chain(args.iter().copied()))
        .expect("arguments should parse")
}

fn mount_args(cli: Cli) -> MountArgs {
    match cli {
        Cli::Read(args) | Cli::Mount(args) | Cli::Unmount(args) => args,
    }
}

#[test]
fn blob_arguments_build_blob_specification() {
    let cli = parse(&[
        "read",
        "--cluster-id",
        "wibble",
        "--mount-name",
        "mount",
        "azure-blob",
        "--container",
        "mycontainer",
        "--storage-account",
        "mystorage",
        "--directory",
        "mydirectory",
        "--auth-type",
        "sas",
        "--secret-scope",
        "scope",
        "--secret-key",
        "key",
    ]);
    assert!(matches!(cli, Cli::Read(_)));

    let spec = specification(mount_args(cli));

    assert_eq!(spec.cluster_id(), "wibble");
    assert_eq!(spec.mount_point(), "/mnt/mount");
    let StorageMount::AzureBlob(blob) = spec.storage() else {
        panic!("expected a blob mount, got {:?}", spec.storage());
    };
    assert_eq!(blob.auth_type(), BlobAuthType::Sas);
    assert_eq!(
        spec.expected_uri(),
        "abfss://mycontainer@mystorage.dfs.core.windows.net/mydirectory"
    );
}

#[test]
fn gen1_arguments_default_spark_prefix() {
    let cli = parse(&[
        "mount",
        "--cluster-id",
        "c",
        "--mount-name",
        "lake",
        "adls-gen1",
        "--storage-resource",
        "mystorage",
        "--client-id",
        "app",
        "--tenant-id",
        "tenant",
    ]);

    let spec = specification(mount_args(cli));

    let StorageMount::AdlsGen1(gen1) = spec.storage() else {
        panic!("expected a Gen1 mount, got {:?}", spec.storage());
    };
    assert_eq!(gen1.spark_conf_prefix(), "fs.adl");
}

#[rstest]
#[case(&["--initialize-file-system"], true)]
#[case(&[], false)]
fn gen2_arguments_carry_initialise_flag(#[case] extra: &[&str], #[case] expected: bool) {
    let mut args = vec![
        "unmount",
        "--cluster-id",
        "c",
        "--mount-name",
        "lake",
        "adls-gen2",
        "--container",
        "fs",
        "--storage-account",
        "acct",
    ];
    args.extend_from_slice(extra);

    let spec = specification(mount_args(parse(&args)));

    let StorageMount::AdlsGen2(gen2) = spec.storage() else {
        panic!("expected a Gen2 mount, got {:?}", spec.storage());
    };
    assert_eq!(gen2.initialize_file_system(), expected);
}

#[test]
fn s3_arguments_build_bucket_specification() {
    let cli = parse(&[
        "read",
        "--cluster-id",
        "c",
        "--mount-name",
        "logs",
        "s3",
        "--bucket",
        "my-bucket",
    ]);

    let spec = specification(mount_args(cli));

    assert_eq!(spec.expected_uri(), "s3a://my-bucket");
}

#[test]
fn storage_backend_is_required() {
    let result = Cli::try_parse_from(["dbmount", "read", "--cluster-id", "c", "--mount-name", "m"]);
    assert!(result.is_err());
}

#[test]
fn write_line_appends_newline() {
    let mut buffer = Vec::new();
    write_line(&mut buffer, "abfss://c@a.dfs.core.windows.net");
    assert_eq!(buffer, b"abfss://c@a.dfs.core.windows.net\n");
}

#[test]
fn config_errors_are_labelled() {
    let err = CliError::from(ConfigError::MissingField(String::from("host")));
    assert_eq!(
        err.to_string(),
        "configuration error: missing configuration field: host"
    );
}

#[test]
fn executor_config_errors_are_labelled_once() {
    let err = CliError::from(DatabricksExecutorError::from(ConfigError::MissingField(
        String::from("host"),
    )));
    assert_eq!(
        err.to_string(),
        "configuration error: missing configuration field: host"
    );
}
