//! Address / network validation.
//!
//! Classifies user input as a bare address or a CIDR network. Malformed input
//! is never an error here: it yields a result with `valid == false`.

use crate::models::{parse_address, parse_network, AddressCount, IpAddress};
use serde::Serialize;

/// What kind of input was validated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Address,
    Network,
}

/// Outcome of [`validate`]. Only `valid` is set for malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<InputKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_address: Option<IpAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netmask: Option<IpAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_length: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_addresses: Option<AddressCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ipv4: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_ipv6: Option<bool>,
}

impl ValidationResult {
    pub fn invalid() -> ValidationResult {
        ValidationResult::default()
    }
}

/// Validate `text` as an IPv4/IPv6 address or CIDR network.
///
/// Text with a `/` is a network and echoes the input as given; text without
/// one is an address and echoes its canonical form.
pub fn validate(text: &str) -> ValidationResult {
    let text = text.trim();

    if text.contains('/') {
        match parse_network(text) {
            Ok(network) => ValidationResult {
                valid: true,
                kind: Some(InputKind::Network),
                address: Some(text.to_string()),
                network_address: Some(network.network_address()),
                netmask: Some(network.netmask()),
                prefix_length: Some(network.prefix_length()),
                num_addresses: Some(network.num_addresses()),
                is_ipv4: Some(network.base().is_ipv4()),
                is_ipv6: Some(network.base().is_ipv6()),
            },
            Err(e) => {
                log::debug!("validate({text}) rejected: {e}");
                ValidationResult::invalid()
            }
        }
    } else {
        match parse_address(text) {
            Ok(addr) => ValidationResult {
                valid: true,
                kind: Some(InputKind::Address),
                address: Some(addr.to_string()),
                is_ipv4: Some(addr.is_ipv4()),
                is_ipv6: Some(addr.is_ipv6()),
                ..ValidationResult::default()
            },
            Err(e) => {
                log::debug!("validate({text}) rejected: {e}");
                ValidationResult::invalid()
            }
        }
    }
}
