//! Subnet and address calculator.
//!
//! IPv4/IPv6 validation, RFC1918/RFC6598 and Cloudflare range checks, and
//! subnet accounting for Azure, AWS, OCI and plain (RFC 950) networks.
//!
//! ```
//! use subnet_calculator::{compute_subnet_info, CloudMode};
//!
//! let info = compute_subnet_info("192.168.1.0/24", CloudMode::Azure).unwrap();
//! assert_eq!(info.usable_addresses.to_string(), "251");
//! ```

pub mod cmd;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod processing;
pub mod ranges;

pub use error::{AddressError, ParseModeError, RangeError, SubnetError};
pub use models::{parse_address, parse_network, AddressCount, CloudMode, IpAddress, IpNetwork};
pub use processing::{
    classify_cloudflare, classify_private, compute_subnet_info, validate, CloudflareResult,
    PrivacyResult, SubnetInfo, ValidationResult,
};
