//! RFC1918 / RFC6598 classification.
//!
//! Both are IPv4-only concepts, IPv6 input always classifies as neither.

use crate::models::{IpAddress, IpFamily, IpNetwork};
use crate::ranges::{rfc1918, rfc6598};
use serde::Serialize;

/// Private/shared address space membership.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PrivacyResult {
    pub is_rfc1918: bool,
    pub is_rfc6598: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rfc1918_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_rfc6598_range: Option<String>,
}

/// Classify a single address.
pub fn classify_private(addr: &IpAddress) -> PrivacyResult {
    classify_private_network(&IpNetwork::host(*addr))
}

/// Classify a network: it matches a range it is a subnet or supernet of.
///
/// The RFC1918 and RFC6598 tables are disjoint, but a wide enough supernet
/// (e.g. 0.0.0.0/0) covers both; RFC1918 then wins and RFC6598 is not reported.
pub fn classify_private_network(network: &IpNetwork) -> PrivacyResult {
    if network.family() == IpFamily::V6 {
        log::debug!("classify_private({network}) skipped, IPv6 has no private ranges");
        return PrivacyResult::default();
    }

    if let Some(range) = rfc1918().first_match(network) {
        return PrivacyResult {
            is_rfc1918: true,
            matched_rfc1918_range: Some(range.label.clone()),
            ..PrivacyResult::default()
        };
    }

    match rfc6598().first_match(network) {
        Some(range) => PrivacyResult {
            is_rfc6598: true,
            matched_rfc6598_range: Some(range.label.clone()),
            ..PrivacyResult::default()
        },
        None => PrivacyResult::default(),
    }
}
