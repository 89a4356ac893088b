//! Tests for Databricks configuration validation.

use super::*;
use rstest::rstest;

#[test]
fn validate_accepts_complete_config() {
    let config = DatabricksConfig::new("https://adb-1.azuredatabricks.net", "dapi-token");
    assert_eq!(config.validate(), Ok(()));
}

#[rstest]
#[case("  ", "dapi-token", "DATABRICKS_HOST")]
#[case("https://adb-1.azuredatabricks.net", "", "DATABRICKS_TOKEN")]
fn validate_names_env_var_for_missing_fields(
    #[case] host: &str,
    #[case] token: &str,
    #[case] env_var: &str,
) {
    let err = DatabricksConfig::new(host, token)
        .validate()
        .expect_err("config should be rejected");

    assert!(
        matches!(err, ConfigError::MissingField(ref message) if message.contains(env_var)),
        "unexpected error: {err}"
    );
}

#[test]
fn validate_rejects_zero_durations() {
    let config = DatabricksConfig {
        poll_interval_secs: 0,
        ..DatabricksConfig::new("host", "token")
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(_))));

    let timeout = DatabricksConfig {
        command_timeout_secs: 0,
        ..DatabricksConfig::new("host", "token")
    };
    assert!(matches!(timeout.validate(), Err(ConfigError::InvalidValue(_))));
}

#[rstest]
#[case("adb-1.azuredatabricks.net", "https://adb-1.azuredatabricks.net")]
#[case("https://adb-1.azuredatabricks.net/", "https://adb-1.azuredatabricks.net")]
#[case("http://127.0.0.1:8080", "http://127.0.0.1:8080")]
fn base_url_normalises_host(#[case] host: &str, #[case] expected: &str) {
    assert_eq!(DatabricksConfig::new(host, "token").base_url(), expected);
}

#[test]
fn debug_output_redacts_token() {
    let rendered = format!("{:?}", DatabricksConfig::new("host", "dapi-secret"));
    assert!(!rendered.contains("dapi-secret"), "{rendered}");
    assert!(rendered.contains("<redacted>"));
}
