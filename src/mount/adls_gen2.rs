//! Azure Data Lake Storage Gen2 mounts using OAuth client credentials.

use crate::uri::{UriScheme, compose, decompose_wasb_abfss};

use super::script::ConfigValue;
use super::{ClientCredentials, MountError};

const CLIENT_CREDS_PROVIDER: &str = "org.apache.hadoop.fs.azurebfs.oauth2.ClientCredsTokenProvider";

/// Data Lake Gen2 file system mounted through the `abfss` driver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AzureAdlsGen2Mount {
    container_name: String,
    storage_account_name: String,
    directory: String,
    credentials: ClientCredentials,
    initialize_file_system: bool,
}

impl AzureAdlsGen2Mount {
    /// Creates a mount for file system `container_name` in
    /// `storage_account_name`.
    #[must_use]
    pub fn new(
        container_name: impl Into<String>,
        storage_account_name: impl Into<String>,
        directory: impl Into<String>,
    ) -> Self {
        Self {
            container_name: container_name.into().trim().to_owned(),
            storage_account_name: storage_account_name.into().trim().to_owned(),
            directory: directory.into().trim().to_owned(),
            credentials: ClientCredentials::default(),
            initialize_file_system: false,
        }
    }

    /// Sets the service principal used by the cluster.
    #[must_use]
    pub fn with_credentials(mut self, credentials: ClientCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Whether the file system should be created when it does not exist.
    #[must_use]
    pub const fn with_initialize_file_system(mut self, value: bool) -> Self {
        self.initialize_file_system = value;
        self
    }

    /// File system (container) name.
    #[must_use]
    pub const fn container_name(&self) -> &str {
        self.container_name.as_str()
    }

    /// Storage account name.
    #[must_use]
    pub const fn storage_account_name(&self) -> &str {
        self.storage_account_name.as_str()
    }

    /// Directory inside the file system.
    #[must_use]
    pub const fn directory(&self) -> &str {
        self.directory.as_str()
    }

    /// Whether the file system is created on first mount.
    #[must_use]
    pub const fn initialize_file_system(&self) -> bool {
        self.initialize_file_system
    }

    /// Canonical identity URI the live mount must match.
    #[must_use]
    pub fn expected_uri(&self) -> String {
        compose(
            UriScheme::Abfss,
            &self.storage_account_name,
            Some(self.container_name.as_str()),
            &self.directory,
        )
    }

    /// Source handed to `dbutils.fs.mount`.
    #[must_use]
    pub fn source_uri(&self) -> String {
        self.expected_uri()
    }

    pub(crate) fn extra_configs(&self) -> Vec<(String, ConfigValue)> {
        let literal = |value: &str| ConfigValue::Literal(value.to_owned());
        vec![
            (String::from("fs.azure.account.auth.type"), literal("OAuth")),
            (
                String::from("fs.azure.account.oauth.provider.type"),
                literal(CLIENT_CREDS_PROVIDER),
            ),
            (
                String::from("fs.azure.account.oauth2.client.id"),
                literal(self.credentials.client_id.as_str()),
            ),
            (
                String::from("fs.azure.account.oauth2.client.secret"),
                ConfigValue::Secret(self.credentials.secret.clone()),
            ),
            (
                String::from("fs.azure.account.oauth2.client.endpoint"),
                ConfigValue::Literal(self.credentials.token_endpoint()),
            ),
            (
                String::from("fs.azure.createRemoteFileSystemDuringInitialization"),
                literal(if self.initialize_file_system {
                    "true"
                } else {
                    "false"
                }),
            ),
        ]
    }

    /// Checks that `uri` points at the declared file system and account.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::MalformedUri`] when `uri` cannot be decomposed
    /// and [`MountError::IdentityMismatch`] when either field differs.
    pub fn verify_source<E>(&self, uri: &str) -> Result<(), MountError<E>>
    where
        E: std::error::Error + 'static,
    {
        let parts = decompose_wasb_abfss(uri)?;
        if parts.container.as_deref() == Some(self.container_name.as_str())
            && parts.account == self.storage_account_name
        {
            return Ok(());
        }
        Err(MountError::IdentityMismatch {
            declared: format!("{}@{}", self.container_name, self.storage_account_name),
            actual: uri.to_owned(),
        })
    }
}
