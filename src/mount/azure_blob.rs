//! Azure Blob Storage mounts authenticated with an account key or SAS token.

use crate::uri::{UriScheme, compose, decompose_wasb_abfss};

use super::MountError;
use super::SecretRef;
use super::script::ConfigValue;

/// Credential kind stored in the secret scope for a Blob Storage mount.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum BlobAuthType {
    /// Storage account access key.
    #[default]
    AccessKey,
    /// Shared access signature scoped to the container.
    Sas,
}

/// Blob Storage container mounted through the `wasbs` driver.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AzureBlobMount {
    container_name: String,
    storage_account_name: String,
    directory: String,
    auth_type: BlobAuthType,
    secret: SecretRef,
}

impl AzureBlobMount {
    /// Creates a mount for `container_name` in `storage_account_name`,
    /// trimming string fields.
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
            auth_type: BlobAuthType::default(),
            secret: SecretRef::default(),
        }
    }

    /// Sets how the cluster authenticates and where the credential lives.
    #[must_use]
    pub fn with_auth(mut self, auth_type: BlobAuthType, secret: SecretRef) -> Self {
        self.auth_type = auth_type;
        self.secret = secret;
        self
    }

    /// Container name.
    #[must_use]
    pub const fn container_name(&self) -> &str {
        self.container_name.as_str()
    }

    /// Storage account name.
    #[must_use]
    pub const fn storage_account_name(&self) -> &str {
        self.storage_account_name.as_str()
    }

    /// Directory inside the container.
    #[must_use]
    pub const fn directory(&self) -> &str {
        self.directory.as_str()
    }

    /// Credential kind.
    #[must_use]
    pub const fn auth_type(&self) -> BlobAuthType {
        self.auth_type
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
        compose(
            UriScheme::Wasbs,
            &self.storage_account_name,
            Some(self.container_name.as_str()),
            &self.directory,
        )
    }

    pub(crate) fn extra_configs(&self) -> Vec<(String, ConfigValue)> {
        let key = match self.auth_type {
            BlobAuthType::AccessKey => format!(
                "fs.azure.account.key.{}.blob.core.windows.net",
                self.storage_account_name
            ),
            BlobAuthType::Sas => format!(
                "fs.azure.sas.{}.{}.blob.core.windows.net",
                self.container_name, self.storage_account_name
            ),
        };
        vec![(key, ConfigValue::Secret(self.secret.clone()))]
    }

    /// Checks that `uri` points at the declared container and account.
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
