//! Cloudflare range membership.

use crate::models::{IpAddress, IpNetwork};
use crate::ranges::RangeTable;
use serde::Serialize;

/// Cloudflare membership of an address or network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloudflareResult {
    pub is_cloudflare: bool,
    pub ip_version: u8,
    /// Every matching range, in table order.
    pub matched_ranges: Vec<String>,
}

/// Check a single address against `table`.
pub fn classify_cloudflare(addr: &IpAddress, table: &RangeTable) -> CloudflareResult {
    classify_cloudflare_network(&IpNetwork::host(*addr), table)
}

/// Check a network against `table`; subnets and supernets of a range match.
///
/// The full table is scanned so overlapping ranges are all reported.
pub fn classify_cloudflare_network(network: &IpNetwork, table: &RangeTable) -> CloudflareResult {
    let matched_ranges: Vec<String> = table
        .all_matches(network)
        .map(|range| range.label.clone())
        .collect();

    log::debug!(
        "classify_cloudflare({network}) matched {} of {} ranges",
        matched_ranges.len(),
        table.len()
    );

    CloudflareResult {
        is_cloudflare: !matched_ranges.is_empty(),
        ip_version: network.family().version(),
        matched_ranges,
    }
}
