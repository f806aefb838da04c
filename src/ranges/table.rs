//! Static CIDR range tables.
//!
//! RFC1918, RFC6598 and the published Cloudflare ranges are compiled in and
//! parsed once on first use. A [`RangeTable`] is never mutated after it has
//! been built; a refreshed Cloudflare table is a new value.

use crate::error::AddressError;
use crate::models::{parse_network, IpFamily, IpNetwork};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// RFC1918 private address ranges.
pub const RFC1918_RANGES: [&str; 3] = ["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16"];

/// RFC6598 shared address space.
pub const RFC6598_RANGES: [&str; 1] = ["100.64.0.0/10"];

/// Version tag of the compiled-in Cloudflare ranges.
pub const CLOUDFLARE_TABLE_VERSION: &str = "2025-01";

/// Cloudflare IPv4 ranges, from https://www.cloudflare.com/ips-v4/
pub const CLOUDFLARE_IPV4_RANGES: [&str; 15] = [
    "173.245.48.0/20",
    "103.21.244.0/22",
    "103.22.200.0/22",
    "103.31.4.0/22",
    "141.101.64.0/18",
    "108.162.192.0/18",
    "190.93.240.0/20",
    "188.114.96.0/20",
    "197.234.240.0/22",
    "198.41.128.0/17",
    "162.158.0.0/15",
    "104.16.0.0/13",
    "104.24.0.0/14",
    "172.64.0.0/13",
    "131.0.72.0/22",
];

/// Cloudflare IPv6 ranges, from https://www.cloudflare.com/ips-v6/
pub const CLOUDFLARE_IPV6_RANGES: [&str; 7] = [
    "2400:cb00::/32",
    "2606:4700::/32",
    "2803:f800::/32",
    "2405:b500::/32",
    "2405:8100::/32",
    "2a06:98c0::/29",
    "2c0f:f248::/32",
];

/// A named CIDR range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidrRange {
    pub network: IpNetwork,
    /// Canonical CIDR text, e.g. "104.16.0.0/13".
    pub label: String,
}

impl CidrRange {
    pub fn new(network: IpNetwork) -> CidrRange {
        CidrRange {
            label: network.to_string(),
            network,
        }
    }

    /// Parse a CIDR string; host bits are cleared in the label.
    pub fn parse(text: &str) -> Result<CidrRange, AddressError> {
        parse_network(text).map(CidrRange::new)
    }

    /// A network matches when it is a subnet or a supernet of this range.
    pub fn matches(&self, network: &IpNetwork) -> bool {
        network.subnet_of(&self.network) || network.supernet_of(&self.network)
    }
}

/// Where the ranges of a table came from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeSource {
    /// Compiled into the binary.
    Builtin,
    /// Fetched from the provider's published lists.
    Cloudflare,
    /// Read back from a cache file.
    Cache,
}

/// An immutable, versioned list of CIDR ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeTable {
    pub name: String,
    pub version: String,
    pub source: RangeSource,
    pub ranges: Vec<CidrRange>,
}

/// Ranges of one address family, as reported by [`RangeTable::info`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyRanges {
    pub count: usize,
    pub ranges: Vec<String>,
}

/// Summary of a table: source and per family ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeTableInfo {
    pub name: String,
    pub version: String,
    pub source: RangeSource,
    pub ipv4: FamilyRanges,
    pub ipv6: FamilyRanges,
}

impl RangeTable {
    /// Build a table from CIDR strings.
    pub fn from_cidrs<'a, I>(
        name: &str,
        version: &str,
        source: RangeSource,
        cidrs: I,
    ) -> Result<RangeTable, AddressError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ranges = cidrs
            .into_iter()
            .map(CidrRange::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RangeTable {
            name: name.to_string(),
            version: version.to_string(),
            source,
            ranges,
        })
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Ranges of a single address family, in table order.
    pub fn family(&self, family: IpFamily) -> impl Iterator<Item = &CidrRange> + '_ {
        self.ranges
            .iter()
            .filter(move |range| range.network.family() == family)
    }

    /// First range matching `network`, in table order.
    pub fn first_match(&self, network: &IpNetwork) -> Option<&CidrRange> {
        self.ranges.iter().find(|range| range.matches(network))
    }

    /// Every range matching `network`; the whole table is scanned.
    pub fn all_matches<'a>(&'a self, network: &'a IpNetwork) -> impl Iterator<Item = &'a CidrRange> {
        self.ranges.iter().filter(move |range| range.matches(network))
    }

    pub fn info(&self) -> RangeTableInfo {
        let family_ranges = |family: IpFamily| {
            let ranges: Vec<String> = self.family(family).map(|r| r.label.clone()).collect();
            FamilyRanges {
                count: ranges.len(),
                ranges,
            }
        };
        RangeTableInfo {
            name: self.name.clone(),
            version: self.version.clone(),
            source: self.source,
            ipv4: family_ranges(IpFamily::V4),
            ipv6: family_ranges(IpFamily::V6),
        }
    }
}

static RFC1918_TABLE: OnceLock<RangeTable> = OnceLock::new();
static RFC6598_TABLE: OnceLock<RangeTable> = OnceLock::new();
static CLOUDFLARE_TABLE: OnceLock<RangeTable> = OnceLock::new();

fn builtin(name: &str, version: &str, cidrs: &[&'static str]) -> RangeTable {
    RangeTable::from_cidrs(name, version, RangeSource::Builtin, cidrs.iter().copied())
        .expect("Invalid compiled-in CIDR range")
}

/// RFC1918 private ranges.
pub fn rfc1918() -> &'static RangeTable {
    RFC1918_TABLE.get_or_init(|| builtin("rfc1918", "1996-02", &RFC1918_RANGES))
}

/// RFC6598 shared address space.
pub fn rfc6598() -> &'static RangeTable {
    RFC6598_TABLE.get_or_init(|| builtin("rfc6598", "2012-04", &RFC6598_RANGES))
}

/// Compiled-in Cloudflare ranges, IPv4 first then IPv6.
pub fn cloudflare_builtin() -> &'static RangeTable {
    CLOUDFLARE_TABLE.get_or_init(|| {
        let cidrs: Vec<&str> = CLOUDFLARE_IPV4_RANGES
            .iter()
            .chain(CLOUDFLARE_IPV6_RANGES.iter())
            .copied()
            .collect();
        builtin("cloudflare", CLOUDFLARE_TABLE_VERSION, &cidrs)
    })
}
