//! Storage URI decomposition and composition.
//!
//! Mount sources reported by a cluster are plain strings such as
//! `abfss://container@account.dfs.core.windows.net/dir`. Verification never
//! compares those strings directly; it splits them into identity fields with
//! the decomposers below and compares the fields instead. The inverse,
//! [`compose`], yields exactly one canonical string per field set.

use std::fmt;

use thiserror::Error;

/// Domain suffix used by `wasb`/`wasbs` Blob Storage endpoints.
pub const BLOB_DOMAIN: &str = "blob.core.windows.net";

/// Domain suffix used by `abfs`/`abfss` Data Lake Gen2 endpoints.
pub const DFS_DOMAIN: &str = "dfs.core.windows.net";

/// Domain suffix used by Data Lake Gen1 (`adl`) endpoints.
pub const ADLS_GEN1_DOMAIN: &str = "azuredatalakestore.net";

/// URI schemes understood by the decomposers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum UriScheme {
    /// Blob Storage over plain HTTP.
    Wasb,
    /// Blob Storage over TLS.
    Wasbs,
    /// Data Lake Gen2 over plain HTTP.
    Abfs,
    /// Data Lake Gen2 over TLS.
    Abfss,
    /// Data Lake Gen1.
    Adl,
    /// Amazon S3 (legacy scheme).
    S3,
    /// Amazon S3 through the Hadoop S3A connector.
    S3a,
}

impl UriScheme {
    /// Returns the scheme as it appears before `://`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wasb => "wasb",
            Self::Wasbs => "wasbs",
            Self::Abfs => "abfs",
            Self::Abfss => "abfss",
            Self::Adl => "adl",
            Self::S3 => "s3",
            Self::S3a => "s3a",
        }
    }

    /// Parses a scheme name, returning `None` for unsupported schemes.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "wasb" => Some(Self::Wasb),
            "wasbs" => Some(Self::Wasbs),
            "abfs" => Some(Self::Abfs),
            "abfss" => Some(Self::Abfss),
            "adl" => Some(Self::Adl),
            "s3" => Some(Self::S3),
            "s3a" => Some(Self::S3a),
            _ => None,
        }
    }

    /// Returns `true` for the container-bearing Azure schemes shared by Blob
    /// Storage and Data Lake Gen2 mounts.
    #[must_use]
    pub const fn is_wasb_abfss(self) -> bool {
        matches!(self, Self::Wasb | Self::Wasbs | Self::Abfs | Self::Abfss)
    }

    /// Returns `true` for the S3 schemes.
    #[must_use]
    pub const fn is_s3(self) -> bool {
        matches!(self, Self::S3 | Self::S3a)
    }

    const fn domain(self) -> Option<&'static str> {
        match self {
            Self::Wasb | Self::Wasbs => Some(BLOB_DOMAIN),
            Self::Abfs | Self::Abfss => Some(DFS_DOMAIN),
            Self::Adl => Some(ADLS_GEN1_DOMAIN),
            Self::S3 | Self::S3a => None,
        }
    }
}

impl fmt::Display for UriScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural identity fields extracted from a storage URI.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecomposedUri {
    /// Scheme the URI was written with.
    pub scheme: UriScheme,
    /// Storage account, or bucket name for S3.
    pub account: String,
    /// Container (file system) name for the container-bearing schemes.
    pub container: Option<String>,
    /// Path below the principal, with a leading `/`, or empty when absent.
    pub directory: String,
}

impl DecomposedUri {
    /// Recomposes the canonical URI string for these fields.
    #[must_use]
    pub fn compose(&self) -> String {
        compose(
            self.scheme,
            &self.account,
            self.container.as_deref(),
            &self.directory,
        )
    }
}

/// Errors raised while decomposing a storage URI.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum UriError {
    /// The URI does not have the structure expected for its scheme family.
    #[error("malformed storage uri {uri}: {reason}")]
    Malformed {
        /// The offending URI.
        uri: String,
        /// Which part of the URI could not be located.
        reason: &'static str,
    },
}

fn malformed(uri: &str, reason: &'static str) -> UriError {
    UriError::Malformed {
        uri: uri.to_owned(),
        reason,
    }
}

/// Composes the canonical URI for the given fields.
///
/// The directory is joined with exactly one `/` whether or not it already
/// starts with one, and an empty directory yields no trailing slash. The
/// container is ignored for schemes that do not carry one.
///
/// `compose` inverts [`decompose`] only when the fields came from a
/// decomposed URI. The `wasb`, `wasbs`, `abfs` and `abfss` schemes need a
/// container; without one the result has no `container@` principal and
/// [`decompose_wasb_abfss`] rejects it.
///
/// ```
/// use dbmount::uri::{UriScheme, compose};
///
/// assert_eq!(
///     compose(UriScheme::Abfss, "acct", Some("data"), "raw"),
///     "abfss://data@acct.dfs.core.windows.net/raw"
/// );
/// assert_eq!(
///     compose(UriScheme::Adl, "lake", None, ""),
///     "adl://lake.azuredatalakestore.net"
/// );
/// ```
#[must_use]
pub fn compose(scheme: UriScheme, account: &str, container: Option<&str>, directory: &str) -> String {
    let mut uri = String::from(scheme.as_str());
    uri.push_str("://");
    if scheme.is_wasb_abfss()
        && let Some(name) = container
    {
        uri.push_str(name);
        uri.push('@');
    }
    uri.push_str(account);
    if let Some(domain) = scheme.domain() {
        uri.push('.');
        uri.push_str(domain);
    }
    let path = directory.trim_start_matches('/');
    if !path.is_empty() {
        uri.push('/');
        uri.push_str(path);
    }
    uri
}

/// Decomposes any supported storage URI, dispatching on its scheme.
///
/// # Errors
///
/// Returns [`UriError::Malformed`] when the scheme is unsupported or the URI
/// does not match the layout of its scheme family.
pub fn decompose(uri: &str) -> Result<DecomposedUri, UriError> {
    let (scheme, _) = split_scheme(uri)?;
    if scheme.is_wasb_abfss() {
        decompose_wasb_abfss(uri)
    } else if scheme.is_s3() {
        decompose_s3(uri)
    } else {
        decompose_adls_gen1(uri)
    }
}

/// Splits a `wasb`, `wasbs`, `abfs` or `abfss` URI of the form
/// `{scheme}://{container}@{account}.{domain}/{path}`.
///
/// # Errors
///
/// Returns [`UriError::Malformed`] when the scheme, the `@`-delimited
/// principal, or the Blob/DFS domain suffix cannot be located.
pub fn decompose_wasb_abfss(uri: &str) -> Result<DecomposedUri, UriError> {
    let (scheme, rest) = split_scheme(uri)?;
    if !scheme.is_wasb_abfss() {
        return Err(malformed(uri, "expected a wasb, wasbs, abfs or abfss scheme"));
    }
    let (authority, directory) = split_authority(rest);
    let (container, host) = authority
        .split_once('@')
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| malformed(uri, "missing container@account principal"))?;
    let account = account_from_host(host, &[DFS_DOMAIN, BLOB_DOMAIN])
        .ok_or_else(|| malformed(uri, "missing storage account domain suffix"))?;

    Ok(DecomposedUri {
        scheme,
        account: account.to_owned(),
        container: Some(container.to_owned()),
        directory,
    })
}

/// Splits an `adl://{account}.azuredatalakestore.net/{path}` URI.
///
/// # Errors
///
/// Returns [`UriError::Malformed`] when the scheme is not `adl` or the Data
/// Lake domain suffix cannot be located.
pub fn decompose_adls_gen1(uri: &str) -> Result<DecomposedUri, UriError> {
    let (scheme, rest) = split_scheme(uri)?;
    if scheme != UriScheme::Adl {
        return Err(malformed(uri, "expected an adl scheme"));
    }
    let (host, directory) = split_authority(rest);
    let account = account_from_host(host, &[ADLS_GEN1_DOMAIN])
        .ok_or_else(|| malformed(uri, "missing data lake store domain suffix"))?;

    Ok(DecomposedUri {
        scheme,
        account: account.to_owned(),
        container: None,
        directory,
    })
}

/// Splits an `s3a://{bucket}/{path}` (or `s3://`) URI.
///
/// # Errors
///
/// Returns [`UriError::Malformed`] when the scheme is not an S3 scheme or the
/// bucket name is empty.
pub fn decompose_s3(uri: &str) -> Result<DecomposedUri, UriError> {
    let (scheme, rest) = split_scheme(uri)?;
    if !scheme.is_s3() {
        return Err(malformed(uri, "expected an s3 or s3a scheme"));
    }
    let (bucket, directory) = split_authority(rest);
    if bucket.is_empty() {
        return Err(malformed(uri, "missing bucket name"));
    }

    Ok(DecomposedUri {
        scheme,
        account: bucket.to_owned(),
        container: None,
        directory,
    })
}

fn split_scheme(uri: &str) -> Result<(UriScheme, &str), UriError> {
    let (name, rest) = uri
        .split_once("://")
        .ok_or_else(|| malformed(uri, "missing scheme"))?;
    let scheme = UriScheme::parse(name).ok_or_else(|| malformed(uri, "unsupported scheme"))?;
    Ok((scheme, rest))
}

fn split_authority(rest: &str) -> (&str, String) {
    match rest.split_once('/') {
        Some((authority, path)) => (authority, format!("/{path}")),
        None => (rest, String::new()),
    }
}

fn account_from_host<'a>(host: &'a str, domains: &[&str]) -> Option<&'a str> {
    domains
        .iter()
        .find_map(|domain| host.strip_suffix(domain)?.strip_suffix('.'))
        .filter(|account| !account.is_empty())
}

#[cfg(test)]
mod tests;
