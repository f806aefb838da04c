//! Address and subnet calculations.
//!
//! This module contains the four calculator operations:
//! - [`validator`] - Address / network validation
//! - [`privacy`] - RFC1918 / RFC6598 classification
//! - [`cloudflare`] - Cloudflare range membership
//! - [`subnet`] - Subnet accounting per cloud mode

mod cloudflare;
mod privacy;
mod subnet;
mod validator;

// Re-export public types and functions
pub use cloudflare::{classify_cloudflare, classify_cloudflare_network, CloudflareResult};
pub use privacy::{classify_private, classify_private_network, PrivacyResult};
pub use subnet::{
    compute_subnet_info, subnet_info, SubnetInfo, NOTE_IPV6, NOTE_POINT_TO_POINT,
    NOTE_SINGLE_HOST,
};
pub use validator::{validate, InputKind, ValidationResult};
