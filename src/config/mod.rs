//! Configuration loading via `ortho-config`.

use std::fmt;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Default interval between command status polls, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;

/// Default time allowed for a remote command to finish, in seconds.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

/// Databricks workspace settings derived from environment variables,
/// configuration files, and CLI flags.
#[derive(Clone, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "DATABRICKS",
    discovery(
        app_name = "dbmount",
        env_var = "DBMOUNT_CONFIG_PATH",
        config_file_name = "dbmount.toml",
        dotfile_name = ".dbmount.toml",
        project_file_name = "dbmount.toml"
    )
)]
pub struct DatabricksConfig {
    /// Workspace URL, for example `https://adb-123.4.azuredatabricks.net`.
    pub host: String,
    /// Personal access token used as a bearer credential.
    pub token: String,
    /// Seconds between command status polls.
    #[ortho_config(default = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,
    /// Seconds a command may run before the executor gives up.
    #[ortho_config(default = DEFAULT_COMMAND_TIMEOUT_SECS)]
    pub command_timeout_secs: u64,
}

impl fmt::Debug for DatabricksConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabricksConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("poll_interval_secs", &self.poll_interval_secs)
            .field("command_timeout_secs", &self.command_timeout_secs)
            .finish()
    }
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }

    fn missing(&self) -> ConfigError {
        ConfigError::MissingField(format!(
            "missing {}: set {} or add {} to dbmount.toml",
            self.description, self.env_var, self.toml_key
        ))
    }
}

impl DatabricksConfig {
    /// Creates a configuration with default polling settings.
    #[must_use]
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            token: token.into(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("dbmount")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation. Error messages name the environment
    /// variable and configuration key that supply each value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the host or token is blank
    /// and [`ConfigError::InvalidValue`] when a duration is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(FieldMetadata::new("Databricks workspace host", "DATABRICKS_HOST", "host").missing());
        }
        if self.token.trim().is_empty() {
            return Err(FieldMetadata::new("Databricks access token", "DATABRICKS_TOKEN", "token").missing());
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(String::from(
                "poll_interval_secs must be greater than zero",
            )));
        }
        if self.command_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(String::from(
                "command_timeout_secs must be greater than zero",
            )));
        }
        Ok(())
    }

    /// Workspace base URL without a trailing slash, defaulting to `https`
    /// when no scheme is given.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_owned()
        } else {
            format!("https://{host}")
        }
    }

    /// Interval between command status polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Time allowed for a command to finish.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configuration value is present but unusable.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}

#[cfg(test)]
mod tests;
