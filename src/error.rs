//! Error types shared by the calculation engine.

use thiserror::Error;

/// Errors raised while parsing user supplied addresses and networks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// Malformed octets/hextets, wrong separator or stray characters.
    #[error("invalid address format: '{0}'")]
    InvalidAddressFormat(String),
    /// Non-numeric prefix, or a prefix wider than the address family.
    #[error("invalid prefix length: '{0}'")]
    InvalidPrefixLength(String),
}

/// A mode string that is not one of the supported cloud modes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid mode '{0}'. Must be one of: Azure, AWS, OCI, Standard")]
pub struct ParseModeError(pub String);

/// Errors raised by the subnet accountant when given text input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubnetError {
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error(transparent)]
    InvalidMode(#[from] ParseModeError),
}

/// Errors raised while refreshing or caching a range table.
#[derive(Debug, Error)]
pub enum RangeError {
    #[error("HTTP error fetching ranges: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no usable ranges in response from {0}")]
    EmptyResponse(String),
    #[error("cache file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error parsing cache file {path}: {message}")]
    Cache { path: String, message: String },
}
