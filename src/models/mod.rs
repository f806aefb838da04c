//! Domain models for the subnet calculator.
//!
//! This module contains the value types used throughout the engine:
//! - [`IpAddress`] and [`IpNetwork`] - IPv4/IPv6 addresses and CIDR networks
//! - [`AddressCount`] - exact address counts up to 2^128
//! - [`CloudMode`] - cloud provider address reservation conventions

mod address;
mod count;
mod mode;

// Re-export public types
pub use address::{
    format, hostmask_bits, mask, parse_address, parse_network, prefix_mask_bits, IpAddress,
    IpFamily, IpNetwork, IPV4_WIDTH, IPV6_WIDTH,
};
pub use count::AddressCount;
pub use mode::CloudMode;
