//! Declared mount specifications and the scripts derived from them.
//!
//! A [`MountSpecification`] pairs a mount name and target cluster with one
//! [`StorageMount`] variant. Variants are flat records; everything that
//! differs per backend (identity check, mount source, Spark configuration) is
//! dispatched through the enum rather than a trait hierarchy.

mod adls_gen1;
mod adls_gen2;
mod azure_blob;
mod error;
mod s3;
pub(crate) mod script;

pub use adls_gen1::{AzureAdlsGen1Mount, DEFAULT_SPARK_CONF_PREFIX};
pub use adls_gen2::AzureAdlsGen2Mount;
pub use azure_blob::{AzureBlobMount, BlobAuthType};
pub use error::MountError;
pub use s3::AwsS3Mount;
pub use script::{ConfigValue, MOUNT_ROOT};

use crate::command::RemoteScript;

/// Reference to a secret held in a cluster secret scope.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SecretRef {
    /// Secret scope name.
    pub scope: String,
    /// Key within the scope.
    pub key: String,
}

impl SecretRef {
    /// Creates a secret reference, trimming both parts.
    #[must_use]
    pub fn new(scope: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            scope: scope.into().trim().to_owned(),
            key: key.into().trim().to_owned(),
        }
    }
}

/// Azure AD service principal used by Data Lake mounts.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClientCredentials {
    /// Application (client) identifier.
    pub client_id: String,
    /// Directory (tenant) identifier.
    pub tenant_id: String,
    /// Secret scope entry holding the client secret.
    pub secret: SecretRef,
}

impl ClientCredentials {
    /// Creates client credentials, trimming identifiers.
    #[must_use]
    pub fn new(client_id: impl Into<String>, tenant_id: impl Into<String>, secret: SecretRef) -> Self {
        Self {
            client_id: client_id.into().trim().to_owned(),
            tenant_id: tenant_id.into().trim().to_owned(),
            secret,
        }
    }

    /// OAuth token endpoint for the tenant.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!(
            "https://login.microsoftonline.com/{}/oauth2/token",
            self.tenant_id
        )
    }
}

/// Storage backend behind a mount.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StorageMount {
    /// Blob Storage container.
    AzureBlob(AzureBlobMount),
    /// Data Lake Gen1 account.
    AdlsGen1(AzureAdlsGen1Mount),
    /// Data Lake Gen2 file system.
    AdlsGen2(AzureAdlsGen2Mount),
    /// S3 bucket.
    AwsS3(AwsS3Mount),
}

impl StorageMount {
    /// Short backend label used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AzureBlob(_) => "azure-blob",
            Self::AdlsGen1(_) => "adls-gen1",
            Self::AdlsGen2(_) => "adls-gen2",
            Self::AwsS3(_) => "s3",
        }
    }

    /// Canonical identity URI the live mount must match.
    #[must_use]
    pub fn expected_uri(&self) -> String {
        match self {
            Self::AzureBlob(mount) => mount.expected_uri(),
            Self::AdlsGen1(mount) => mount.expected_uri(),
            Self::AdlsGen2(mount) => mount.expected_uri(),
            Self::AwsS3(mount) => mount.expected_uri(),
        }
    }

    /// Source handed to `dbutils.fs.mount` when creating the mount.
    #[must_use]
    pub fn source_uri(&self) -> String {
        match self {
            Self::AzureBlob(mount) => mount.source_uri(),
            Self::AdlsGen1(mount) => mount.source_uri(),
            Self::AdlsGen2(mount) => mount.source_uri(),
            Self::AwsS3(mount) => mount.expected_uri(),
        }
    }

    /// Spark configuration passed as `extra_configs` to the mount call.
    #[must_use]
    pub fn extra_configs(&self) -> Vec<(String, ConfigValue)> {
        match self {
            Self::AzureBlob(mount) => mount.extra_configs(),
            Self::AdlsGen1(mount) => mount.extra_configs(),
            Self::AdlsGen2(mount) => mount.extra_configs(),
            Self::AwsS3(_) => Vec::new(),
        }
    }

    /// Checks that a URI reported by the cluster resolves to the declared
    /// storage identity. Directories are not compared.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::MalformedUri`] when the URI cannot be
    /// decomposed, or a mismatch variant when the identity differs.
    pub fn verify_source<E>(&self, uri: &str) -> Result<(), MountError<E>>
    where
        E: std::error::Error + 'static,
    {
        match self {
            Self::AzureBlob(mount) => mount.verify_source(uri),
            Self::AdlsGen1(mount) => mount.verify_source(uri),
            Self::AdlsGen2(mount) => mount.verify_source(uri),
            Self::AwsS3(mount) => mount.verify_source(uri),
        }
    }
}

impl From<AzureBlobMount> for StorageMount {
    fn from(value: AzureBlobMount) -> Self {
        Self::AzureBlob(value)
    }
}

impl From<AzureAdlsGen1Mount> for StorageMount {
    fn from(value: AzureAdlsGen1Mount) -> Self {
        Self::AdlsGen1(value)
    }
}

impl From<AzureAdlsGen2Mount> for StorageMount {
    fn from(value: AzureAdlsGen2Mount) -> Self {
        Self::AdlsGen2(value)
    }
}

impl From<AwsS3Mount> for StorageMount {
    fn from(value: AwsS3Mount) -> Self {
        Self::AwsS3(value)
    }
}

/// A declared mount: name, target cluster and storage backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MountSpecification {
    mount_name: String,
    cluster_id: String,
    storage: StorageMount,
}

impl MountSpecification {
    /// Creates a specification, trimming the mount name and cluster id.
    #[must_use]
    pub fn new(
        mount_name: impl Into<String>,
        cluster_id: impl Into<String>,
        storage: impl Into<StorageMount>,
    ) -> Self {
        Self {
            mount_name: mount_name.into().trim().to_owned(),
            cluster_id: cluster_id.into().trim().to_owned(),
            storage: storage.into(),
        }
    }

    /// Logical mount name, mounted at `/mnt/{mount_name}`.
    #[must_use]
    pub const fn mount_name(&self) -> &str {
        self.mount_name.as_str()
    }

    /// Cluster the scripts run on.
    #[must_use]
    pub const fn cluster_id(&self) -> &str {
        self.cluster_id.as_str()
    }

    /// Declared storage backend.
    #[must_use]
    pub const fn storage(&self) -> &StorageMount {
        &self.storage
    }

    /// Absolute mount point on the cluster.
    #[must_use]
    pub fn mount_point(&self) -> String {
        script::mount_point(&self.mount_name)
    }

    /// Canonical identity URI the live mount must match.
    #[must_use]
    pub fn expected_uri(&self) -> String {
        self.storage.expected_uri()
    }

    /// Script that prints the source of the mount, or nothing if absent.
    #[must_use]
    pub fn inspection_script(&self) -> RemoteScript {
        RemoteScript::python(script::inspection(&self.mount_name))
    }

    /// Script that creates the mount and prints its source.
    #[must_use]
    pub fn mount_script(&self) -> RemoteScript {
        RemoteScript::python(script::mount(
            &self.mount_name,
            &self.storage.source_uri(),
            &self.storage.extra_configs(),
        ))
    }

    /// Script that removes the mount.
    #[must_use]
    pub fn unmount_script(&self) -> RemoteScript {
        RemoteScript::python(script::unmount(&self.mount_name))
    }
}

#[cfg(test)]
mod tests;
