//! Amazon S3 mounts relying on the cluster's instance profile.

use crate::uri::{UriScheme, compose, decompose_s3};

use super::MountError;

/// S3 bucket mounted through the `s3a` driver. Credentials come from the
/// instance profile attached to the cluster, so no extra configuration is
/// passed to the mount call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AwsS3Mount {
    bucket_name: String,
}

impl AwsS3Mount {
    /// Creates a mount for `bucket_name`.
    #[must_use]
    pub fn new(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into().trim().to_owned(),
        }
    }

    /// Bucket name.
    #[must_use]
    pub const fn bucket_name(&self) -> &str {
        self.bucket_name.as_str()
    }

    /// Canonical identity URI the live mount must match.
    #[must_use]
    pub fn expected_uri(&self) -> String {
        compose(UriScheme::S3a, &self.bucket_name, None, "")
    }

    /// Checks that `uri` points at the declared bucket.
    ///
    /// # Errors
    ///
    /// Returns [`MountError::MalformedUri`] when `uri` cannot be decomposed
    /// and [`MountError::BucketMismatch`] when the bucket differs.
    pub fn verify_source<E>(&self, uri: &str) -> Result<(), MountError<E>>
    where
        E: std::error::Error + 'static,
    {
        let parts = decompose_s3(uri)?;
        if parts.account == self.bucket_name {
            return Ok(());
        }
        Err(MountError::BucketMismatch {
            declared: self.bucket_name.clone(),
            actual: uri.to_owned(),
        })
    }
}
