//! Azure Data Lake Storage Gen1 mounts using service principal credentials.

use crate::uri::{UriScheme, compose, decompose_adls_gen1};

use super::script::ConfigValue;
use super::{ClientCredentials, MountError};

/// Spark configuration prefix used when none is supplied.
pub const DEFAULT_SPARK_CONF_PREFIX: &str = "fs.adl";

/// Data Lake Gen1 account mounted through the `adl` driver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AzureAdlsGen1Mount {
    storage_resource_name: String,
    directory: String,
    spark_conf_prefix: String,
    credentials: ClientCredentials,
}

impl AzureAdlsGen1Mount {
    /// Creates a mount for the Data Lake account `storage_resource_name`.
    #[must_use]
    pub fn new(storage_resource_name: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            storage_resource_name: storage_resource_name.into().trim().to_owned(),
            directory: directory.into().trim().to_owned(),
            spark_conf_prefix: DEFAULT_SPARK_CONF_PREFIX.to_owned(),
            credentials: ClientCredentials::default(),
        }
    }

    /// Sets the service principal used by the cluster.
    #[must_use]
    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Overrides the Spark configuration prefix (`fs.adl` or
    /// `dfs.adls`). Blank values keep the default.
    #[must_use]
    pub fn with_spark_conf_prefix(mut self, prefix: impl Into<String>) -> Self {
        let value = prefix.into();
        if !value.trim().is_empty() {
            self.spark_conf_prefix = value.trim().to_owned();
        }
        self
    }

    /// Data Lake account name.
    #[must_use]
    pub const fn storage_resource_name(&self) -> &str {
        self.storage_resource_name.as_str()
    }

    /// Directory inside the account.
    #[must_use]
    pub const fn directory(&self) -> &str {
        self.directory.as_str()
    }

    /// Spark configuration prefix.
    #[must_use]
    pub const fn spark_conf_prefix(&self) -> &str {
        self.spark_conf_prefix.as_str()
    }

    /// Canonical identity URI the live mount must match.
    #[must_use]
    pub fn expected_uri(&self) -> String {
        compose(UriScheme::Adl, &self.storage_resource_name, None, &self.directory)
    }

    /// Source handed to `dbutils.fs.mount`.
    #[must_use]
    pub fn source_uri(&self) -> String {
        self.expected_uri()
    }

    pub(crate) fn extra_configs(&self) -> Vec<(String, ConfigValue)> {
        let prefix = &self.spark_conf_prefix;
        vec![
            (
                format!("{prefix}.oauth2.access.token.provider.type"),
                ConfigValue::Literal(String::from("ClientCredential")),
            ),
            (
                format!("{prefix}.oauth2.client.id"),
                ConfigValue::Literal(self.credentials.client_id.clone()),
            ),
            (
                format!("{prefix}.oauth2.credential"),
                ConfigValue::Secret(self.credentials.secret.clone()),
            ),
            (
                format!("{prefix}.oauth2.refresh.url"),
                ConfigValue::Literal(self.credentials.token_endpoint()),
            ),
        ]
    }

    /// Checks that `uri` points at the declared Data Lake account.
    ///
    /// The mismatch message renders the declared side as
    /// `{account}@{directory}`, unlike the container-bearing variants.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::MalformedUri`] when `uri` cannot be decomposed
    /// and [`MountError::IdentityMismatch`] when the account differs.
    pub fn verify_source<E>(&self, uri: &str) -> Result<(), MountError<E>>
    where
        E: std::error::Error + 'static,
    {
        let parts = decompose_adls_gen1(uri)?;
        if parts.account == self.storage_resource_name {
            return Ok(());
        }
        Err(MountError::IdentityMismatch {
            declared: format!("{}@{}", self.storage_resource_name, self.directory),
            actual: uri.to_owned(),
        })
    }
}
