//! Unit tests for storage URI decomposition.

use super::*;
use rstest::rstest;

#[rstest]
#[case(
    "abfss://wibble@mystorage.dfs.core.windows.net/wobble",
    "wibble",
    "mystorage",
    "/wobble"
)]
#[case("abfss://wibble@mystorage.dfs.core.windows.net", "wibble", "mystorage", "")]
#[case(
    "wasbs://logs@archive.blob.core.windows.net/2024/01",
    "logs",
    "archive",
    "/2024/01"
)]
#[case("abfs://c@a.dfs.core.windows.net/", "c", "a", "/")]
fn decompose_wasb_abfss_splits_identity(
    #[case] uri: &str,
    #[case] container: &str,
    #[case] account: &str,
    #[case] directory: &str,
) {
    let parts = decompose_wasb_abfss(uri).expect("uri should decompose");

    assert_eq!(parts.container.as_deref(), Some(container));
    assert_eq!(parts.account, account);
    assert_eq!(parts.directory, directory);
}

#[rstest]
#[case("mystorage.dfs.core.windows.net/x", "missing scheme")]
#[case("gs://bucket/x", "unsupported scheme")]
#[case("abfss://mystorage.dfs.core.windows.net/x", "missing container@account principal")]
#[case("abfss://@mystorage.dfs.core.windows.net/x", "missing container@account principal")]
#[case("abfss://c@mystorage.example.com/x", "missing storage account domain suffix")]
#[case("abfss://c@.dfs.core.windows.net/x", "missing storage account domain suffix")]
#[case("adl://lake.azuredatalakestore.net/x", "expected a wasb, wasbs, abfs or abfss scheme")]
fn decompose_wasb_abfss_rejects_malformed_uris(#[case] uri: &str, #[case] reason: &'static str) {
    let err = decompose_wasb_abfss(uri).expect_err("uri should be rejected");

    assert_eq!(
        err,
        UriError::Malformed {
            uri: uri.to_owned(),
            reason,
        }
    );
}

#[rstest]
#[case("adl://mystorage.azuredatalakestore.net/mydirectory", "mystorage", "/mydirectory")]
#[case("adl://mystorage.azuredatalakestore.net", "mystorage", "")]
fn decompose_adls_gen1_splits_account(
    #[case] uri: &str,
    #[case] account: &str,
    #[case] directory: &str,
) {
    let parts = decompose_adls_gen1(uri).expect("uri should decompose");

    assert_eq!(parts.scheme, UriScheme::Adl);
    assert_eq!(parts.account, account);
    assert_eq!(parts.container, None);
    assert_eq!(parts.directory, directory);
}

#[test]
fn decompose_adls_gen1_requires_domain_suffix() {
    let err = decompose_adls_gen1("adl://mystorage.example.net/dir").expect_err("should fail");
    assert!(err.to_string().contains("data lake store domain"), "{err}");
}

#[rstest]
#[case("s3a://my-bucket", "my-bucket", "")]
#[case("s3://my-bucket/prefix/key", "my-bucket", "/prefix/key")]
fn decompose_s3_splits_bucket(#[case] uri: &str, #[case] bucket: &str, #[case] directory: &str) {
    let parts = decompose_s3(uri).expect("uri should decompose");

    assert_eq!(parts.account, bucket);
    assert_eq!(parts.directory, directory);
}

#[test]
fn decompose_s3_rejects_empty_bucket() {
    assert!(decompose_s3("s3a:///key").is_err());
}

#[rstest]
#[case("abfss://c@a.dfs.core.windows.net/d", UriScheme::Abfss)]
#[case("adl://a.azuredatalakestore.net/d", UriScheme::Adl)]
#[case("s3a://b/d", UriScheme::S3a)]
fn decompose_dispatches_on_scheme(#[case] uri: &str, #[case] scheme: UriScheme) {
    let parts = decompose(uri).expect("uri should decompose");
    assert_eq!(parts.scheme, scheme);
    assert_eq!(parts.directory, "/d");
}

#[rstest]
#[case("mydirectory", "abfss://c@a.dfs.core.windows.net/mydirectory")]
#[case("/mydirectory", "abfss://c@a.dfs.core.windows.net/mydirectory")]
#[case("", "abfss://c@a.dfs.core.windows.net")]
fn compose_normalises_directory_separator(#[case] directory: &str, #[case] expected: &str) {
    assert_eq!(compose(UriScheme::Abfss, "a", Some("c"), directory), expected);
}

#[test]
fn compose_uses_blob_domain_for_wasbs() {
    assert_eq!(
        compose(UriScheme::Wasbs, "acct", Some("data"), "/x"),
        "wasbs://data@acct.blob.core.windows.net/x"
    );
}

#[test]
fn compose_ignores_container_for_account_only_schemes() {
    assert_eq!(
        compose(UriScheme::S3a, "bucket", Some("ignored"), ""),
        "s3a://bucket"
    );
}

#[rstest]
#[case(UriScheme::Abfss)]
#[case(UriScheme::Wasbs)]
fn compose_without_container_does_not_decompose(#[case] scheme: UriScheme) {
    let uri = compose(scheme, "mystorage", None, "wobble");
    let err = decompose(&uri).expect_err("uri without container should be rejected");

    assert!(!uri.contains('@'), "{uri}");
    assert!(
        matches!(err, UriError::Malformed { reason, .. } if reason == "missing container@account principal"),
        "unexpected error: {err}"
    );
}

#[rstest]
#[case("abfss://wibble@mystorage.dfs.core.windows.net/wobble")]
#[case("wasbs://wibble@mystorage.blob.core.windows.net/a/b")]
#[case("abfss://wibble@mystorage.dfs.core.windows.net")]
#[case("adl://mystorage.azuredatalakestore.net/wobble")]
#[case("s3a://bucket/wobble")]
fn decompose_compose_preserves_identity_fields(#[case] uri: &str) {
    let first = decompose(uri).expect("uri should decompose");
    let second = decompose(&first.compose()).expect("composed uri should decompose");

    assert_eq!(second, first);
}
