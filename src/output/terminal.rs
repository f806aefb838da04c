//! Terminal output for the CLI.
//!
//! Each `render_*` function returns the coloured, aligned text for one
//! result; the caller decides where to print it.

use crate::output::contract::{CloudflareResponse, PrivacyResponse};
use crate::processing::{SubnetInfo, ValidationResult};
use crate::ranges::RangeTableInfo;
use colored::Colorize;
use itertools::Itertools;
use std::fmt::Write;

const LABEL_WIDTH: usize = 20;

/// Format a label right-aligned to `width`, followed by `: `.
///
/// # Arguments
/// * `label` - The label to format
/// * `width` - The minimum width of the label column
///
/// # Returns
/// The padded label. Labels longer than `width` are not truncated.
pub fn format_field(label: &str, width: usize) -> String {
    format!("{label:>width$}: ")
}

fn line(out: &mut String, label: &str, value: impl std::fmt::Display) {
    // writing to a String cannot fail
    let _ = writeln!(out, "{}{value}", format_field(label, LABEL_WIDTH).bold());
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

pub fn render_validation(result: &ValidationResult) -> String {
    let mut out = String::new();
    if !result.valid {
        line(&mut out, "valid", "no".red());
        return out;
    }

    line(&mut out, "valid", "yes".green());
    if let Some(kind) = result.kind {
        line(&mut out, "type", format!("{kind:?}").to_lowercase());
    }
    if let Some(address) = &result.address {
        line(&mut out, "address", address.cyan());
    }
    if let Some(network_address) = &result.network_address {
        line(&mut out, "network address", network_address);
    }
    if let Some(netmask) = &result.netmask {
        line(&mut out, "netmask", netmask);
    }
    if let Some(prefix_length) = result.prefix_length {
        line(&mut out, "prefix length", format!("/{prefix_length}"));
    }
    if let Some(num_addresses) = &result.num_addresses {
        line(&mut out, "addresses", num_addresses);
    }
    let version = match (result.is_ipv4, result.is_ipv6) {
        (Some(true), _) => "IPv4",
        (_, Some(true)) => "IPv6",
        _ => "unknown",
    };
    line(&mut out, "version", version);
    out
}

pub fn render_privacy(response: &PrivacyResponse) -> String {
    let mut out = String::new();
    let result = &response.result;
    line(&mut out, "address", response.address.cyan());
    line(&mut out, "RFC1918 private", yes_no(result.is_rfc1918));
    if let Some(range) = &result.matched_rfc1918_range {
        line(&mut out, "matched range", range);
    }
    line(&mut out, "RFC6598 shared", yes_no(result.is_rfc6598));
    if let Some(range) = &result.matched_rfc6598_range {
        line(&mut out, "matched range", range);
    }
    out
}

pub fn render_cloudflare(response: &CloudflareResponse) -> String {
    let mut out = String::new();
    let result = &response.result;
    line(&mut out, "address", response.address.cyan());
    line(&mut out, "IP version", result.ip_version);
    line(&mut out, "Cloudflare", yes_no(result.is_cloudflare));
    if !result.matched_ranges.is_empty() {
        line(&mut out, "matched ranges", result.matched_ranges.iter().join(", "));
    }
    out
}

pub fn render_subnet_info(info: &SubnetInfo) -> String {
    let mut out = String::new();
    line(&mut out, "network", info.network.cyan());
    line(&mut out, "mode", info.mode.to_string().yellow());
    line(&mut out, "network address", info.network_address);
    match &info.broadcast_address {
        Some(broadcast) => line(&mut out, "broadcast address", broadcast),
        None => line(&mut out, "broadcast address", "none".dimmed()),
    }
    line(&mut out, "netmask", info.netmask);
    line(&mut out, "wildcard mask", info.wildcard_mask);
    line(&mut out, "prefix length", format!("/{}", info.prefix_length));
    line(&mut out, "total addresses", &info.total_addresses);
    line(&mut out, "usable addresses", info.usable_addresses.to_string().green());
    line(&mut out, "first usable", info.first_usable_ip);
    line(&mut out, "last usable", info.last_usable_ip);
    if let Some(note) = &info.note {
        line(&mut out, "note", note.yellow());
    }
    out
}

pub fn render_range_table(info: &RangeTableInfo) -> String {
    let mut out = String::new();
    line(&mut out, "table", info.name.cyan());
    line(&mut out, "version", &info.version);
    line(&mut out, "source", format!("{:?}", info.source).to_lowercase());
    line(&mut out, "IPv4 ranges", info.ipv4.count);
    for range in &info.ipv4.ranges {
        line(&mut out, "", range);
    }
    line(&mut out, "IPv6 ranges", info.ipv6.count);
    for range in &info.ipv6.ranges {
        line(&mut out, "", range);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CloudMode;
    use crate::processing::{compute_subnet_info, validate};
    use crate::ranges::cloudflare_builtin;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_field_short() {
        assert_eq!(format_field("mode", 8), "    mode: ");
    }

    #[test]
    fn test_format_field_long() {
        assert_eq!(format_field("usable addresses", 5), "usable addresses: ");
    }

    #[test]
    fn test_render_subnet_info() {
        plain();
        let info = compute_subnet_info("192.168.1.0/24", CloudMode::Azure).unwrap();
        let text = render_subnet_info(&info);
        assert!(text.contains("    usable addresses: 251\n"), "{text}");
        assert!(text.contains("   broadcast address: 192.168.1.255\n"), "{text}");
        assert!(!text.contains("note"));
    }

    #[test]
    fn test_render_subnet_info_ipv6() {
        plain();
        let info = compute_subnet_info("2001:db8::/112", CloudMode::Standard).unwrap();
        let text = render_subnet_info(&info);
        assert!(text.contains("broadcast address: none"), "{text}");
        assert!(text.contains("note: IPv6 subnets"), "{text}");
    }

    #[test]
    fn test_render_invalid() {
        plain();
        assert_eq!(render_validation(&validate("nope")), format!("{}no\n", format_field("valid", 20)));
    }

    #[test]
    fn test_render_validation_network() {
        plain();
        let text = render_validation(&validate("10.0.0.0/8"));
        assert!(text.contains("type: network"), "{text}");
        assert!(text.contains("version: IPv4"), "{text}");
    }

    #[test]
    fn test_render_range_table() {
        plain();
        let text = render_range_table(&cloudflare_builtin().info());
        assert!(text.contains("IPv4 ranges: 15"), "{text}");
        assert!(text.contains("IPv6 ranges: 7"), "{text}");
        assert!(text.contains("source: builtin"), "{text}");
    }
}
