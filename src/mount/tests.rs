//! Unit tests for mount specifications and generated scripts.

use std::io;

use super::*;
use rstest::{fixture, rstest};

type TestError = MountError<io::Error>;

#[fixture]
fn blob() -> AzureBlobMount {
    AzureBlobMount::new("mycontainer", "mystorage", "mydirectory")
        .with_auth(BlobAuthType::AccessKey, SecretRef::new("scope", "key"))
}

#[fixture]
fn credentials() -> ClientCredentials {
    ClientCredentials::new("client-id", "tenant-id", SecretRef::new("scope", "client-secret"))
}

#[rstest]
fn blob_expected_uri_uses_dfs_endpoint(blob: AzureBlobMount) {
    assert_eq!(
        blob.expected_uri(),
        "abfss://mycontainer@mystorage.dfs.core.windows.net/mydirectory"
    );
    assert_eq!(
        blob.source_uri(),
        "wasbs://mycontainer@mystorage.blob.core.windows.net/mydirectory"
    );
}

#[rstest]
#[case(BlobAuthType::AccessKey, "fs.azure.account.key.mystorage.blob.core.windows.net")]
#[case(BlobAuthType::Sas, "fs.azure.sas.mycontainer.mystorage.blob.core.windows.net")]
fn blob_extra_configs_follow_auth_type(
    blob: AzureBlobMount,
    #[case] auth: BlobAuthType,
    #[case] expected_key: &str,
) {
    let mount = blob.with_auth(auth, SecretRef::new("scope", "key"));
    let configs = mount.extra_configs();

    assert_eq!(
        configs,
        vec![(
            expected_key.to_owned(),
            ConfigValue::Secret(SecretRef::new("scope", "key"))
        )]
    );
}

#[rstest]
#[case("abfss://mycontainer@mystorage.dfs.core.windows.net/mydirectory")]
#[case("abfss://mycontainer@mystorage.dfs.core.windows.net/elsewhere")]
#[case("abfss://mycontainer@mystorage.dfs.core.windows.net")]
#[case("wasbs://mycontainer@mystorage.blob.core.windows.net/mydirectory")]
fn blob_verify_ignores_directory(blob: AzureBlobMount, #[case] uri: &str) {
    assert!(blob.verify_source::<io::Error>(uri).is_ok());
}

#[rstest]
fn blob_verify_reports_both_sides(blob: AzureBlobMount) {
    let err: TestError = blob
        .verify_source("abfss://x@y.dfs.core.windows.net/z")
        .expect_err("identity should differ");

    assert_eq!(
        err.to_string(),
        "does not match uri with storage account and container values \
         mycontainer@mystorage != abfss://x@y.dfs.core.windows.net/z!"
    );
}

#[rstest]
#[case("abfss://MyContainer@mystorage.dfs.core.windows.net/mydirectory")]
#[case("abfss://mycontainer@MyStorage.dfs.core.windows.net/mydirectory")]
fn blob_verify_is_case_sensitive(blob: AzureBlobMount, #[case] uri: &str) {
    let err: TestError = blob.verify_source(uri).expect_err("case should matter");
    assert!(matches!(err, MountError::IdentityMismatch { .. }), "{err}");
}

#[rstest]
fn blob_verify_rejects_foreign_scheme(blob: AzureBlobMount) {
    let err: TestError = blob
        .verify_source("adl://mystorage.azuredatalakestore.net/mydirectory")
        .expect_err("scheme should be rejected");
    assert!(matches!(err, MountError::MalformedUri(_)), "{err}");
}

#[rstest]
fn gen1_mismatch_message_renders_account_and_directory(credentials: ClientCredentials) {
    // Gen1 renders `{account}@{directory}` rather than `{container}@{account}`.
    let mount = AzureAdlsGen1Mount::new("mystorage", "mydirectory").with_credentials(credentials);
    let err: TestError = mount
        .verify_source("adl://x.azuredatalakestore.net/z")
        .expect_err("account should differ");

    assert_eq!(
        err.to_string(),
        "does not match uri with storage account and container values \
         mystorage@mydirectory != adl://x.azuredatalakestore.net/z!"
    );
}

#[rstest]
fn gen1_extra_configs_use_prefix(credentials: ClientCredentials) {
    let mount = AzureAdlsGen1Mount::new("lake", "dir")
        .with_credentials(credentials)
        .with_spark_conf_prefix("dfs.adls");
    let keys: Vec<String> = mount.extra_configs().into_iter().map(|(key, _)| key).collect();

    assert_eq!(
        keys,
        vec![
            "dfs.adls.oauth2.access.token.provider.type",
            "dfs.adls.oauth2.client.id",
            "dfs.adls.oauth2.credential",
            "dfs.adls.oauth2.refresh.url",
        ]
    );
}

#[test]
fn gen1_blank_prefix_keeps_default() {
    let mount = AzureAdlsGen1Mount::new("lake", "dir").with_spark_conf_prefix("  ");
    assert_eq!(mount.spark_conf_prefix(), DEFAULT_SPARK_CONF_PREFIX);
}

#[rstest]
fn gen2_extra_configs_carry_credentials(credentials: ClientCredentials) {
    let mount = AzureAdlsGen2Mount::new("fs", "acct", "dir")
        .with_credentials(credentials)
        .with_initialize_file_system(true);
    let configs = mount.extra_configs();

    assert!(configs.contains(&(
        String::from("fs.azure.account.oauth2.client.secret"),
        ConfigValue::Secret(SecretRef::new("scope", "client-secret"))
    )));
    assert!(configs.contains(&(
        String::from("fs.azure.account.oauth2.client.endpoint"),
        ConfigValue::Literal(String::from(
            "https://login.microsoftonline.com/tenant-id/oauth2/token"
        ))
    )));
    assert!(configs.contains(&(
        String::from("fs.azure.createRemoteFileSystemDuringInitialization"),
        ConfigValue::Literal(String::from("true"))
    )));
}

#[test]
fn s3_mismatch_names_bucket() {
    let err: TestError = AwsS3Mount::new("declared")
        .verify_source("s3a://other/key")
        .expect_err("bucket should differ");

    assert_eq!(
        err.to_string(),
        "does not match bucket value declared != s3a://other/key!"
    );
}

#[rstest]
fn specification_trims_identifiers(blob: AzureBlobMount) {
    let spec = MountSpecification::new("  data ", " 0101-abc ", blob);

    assert_eq!(spec.mount_name(), "data");
    assert_eq!(spec.cluster_id(), "0101-abc");
    assert_eq!(spec.mount_point(), "/mnt/data");
    assert_eq!(spec.storage().kind(), "azure-blob");
}

#[rstest]
fn inspection_script_targets_mount_point(blob: AzureBlobMount) {
    let script = MountSpecification::new("mount", "cluster", blob).inspection_script();

    assert_eq!(script.language, crate::command::Language::Python);
    assert!(script.body.contains("if mount.mountPoint == \"/mnt/mount\":"), "{}", script.body);
    assert!(script.body.contains("dbutils.notebook.exit(mount.source)"));
    assert!(script.body.ends_with("dbutils.notebook.exit(\"\")\n"));
}

#[test]
fn scripts_escape_mount_name() {
    let spec = MountSpecification::new("a\"b\\c", "cluster", AwsS3Mount::new("bucket"));

    let inspection = spec.inspection_script().body;
    let unmount = spec.unmount_script().body;

    assert!(inspection.contains(r#""/mnt/a\"b\\c""#), "{inspection}");
    assert!(unmount.starts_with(r#"dbutils.fs.unmount("/mnt/a\"b\\c")"#), "{unmount}");
}

#[rstest]
fn mount_script_references_secret_scope(blob: AzureBlobMount) {
    let body = MountSpecification::new("mount", "cluster", blob).mount_script().body;

    assert!(body.contains(
        "source = \"wasbs://mycontainer@mystorage.blob.core.windows.net/mydirectory\""
    ));
    assert!(body.contains(
        "\"fs.azure.account.key.mystorage.blob.core.windows.net\": \
         dbutils.secrets.get(scope = \"scope\", key = \"key\")"
    ));
    assert!(body.contains("dbutils.fs.mount(source = source, mount_point = mount_point"));
}

#[test]
fn s3_mount_script_has_empty_configs() {
    let body = MountSpecification::new("logs", "cluster", AwsS3Mount::new("bucket"))
        .mount_script()
        .body;

    assert!(body.contains("extra_configs = {}\n"), "{body}");
    assert!(body.contains("source = \"s3a://bucket\""), "{body}");
}
