//! Fetching of the published Cloudflare range lists.
//!
//! Cloudflare publishes one CIDR per line at `ips-v4/` and `ips-v6/`. Both
//! lists are fetched concurrently and parsed into a fresh [`RangeTable`].

use super::table::{CidrRange, RangeSource, RangeTable};
use crate::config::Config;
use crate::error::RangeError;
use crate::models::IpFamily;

/// Fetch a plain text range list, one entry per non-blank line.
pub async fn fetch_range_list(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<String>, RangeError> {
    log::debug!("GET {url}");
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let lines = split_range_lines(&body);
    if lines.is_empty() {
        log::warn!("Empty response from {url}");
        return Err(RangeError::EmptyResponse(url.to_string()));
    }
    log::info!("Fetched {} ranges from {url}", lines.len());
    Ok(lines)
}

fn split_range_lines(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse CIDR lines of one family, skipping bad or wrong-family entries.
pub fn parse_range_lines(family: IpFamily, lines: &[String]) -> Vec<CidrRange> {
    lines
        .iter()
        .filter_map(|line| match CidrRange::parse(line) {
            Ok(range) if range.network.family() == family => Some(range),
            Ok(_) => {
                log::warn!("Expected IPv{} range but got {line}", family.version());
                None
            }
            Err(e) => {
                log::warn!("Skipping invalid CIDR {line}: {e}");
                None
            }
        })
        .collect()
}

/// Fetch both Cloudflare lists and build a new table from them.
///
/// Fails when either list cannot be fetched or yields no usable range.
pub async fn fetch_cloudflare_table(config: &Config) -> Result<RangeTable, RangeError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let (ipv4_lines, ipv6_lines) = futures::future::join(
        fetch_range_list(&client, &config.cloudflare_ipv4_url),
        fetch_range_list(&client, &config.cloudflare_ipv6_url),
    )
    .await;

    let mut ranges = parse_range_lines(IpFamily::V4, &ipv4_lines?);
    if ranges.is_empty() {
        return Err(RangeError::EmptyResponse(config.cloudflare_ipv4_url.clone()));
    }
    let ipv6_ranges = parse_range_lines(IpFamily::V6, &ipv6_lines?);
    if ipv6_ranges.is_empty() {
        return Err(RangeError::EmptyResponse(config.cloudflare_ipv6_url.clone()));
    }
    ranges.extend(ipv6_ranges);

    log::info!("Using {} Cloudflare ranges fetched live", ranges.len());
    Ok(RangeTable {
        name: "cloudflare".to_string(),
        version: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        source: RangeSource::Cloudflare,
        ranges,
    })
}
