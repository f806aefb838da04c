//! IPv4/IPv6 address and CIDR network model.
//!
//! Provides [`IpAddress`] and [`IpNetwork`] value types, along with the
//! parsing, formatting and masking rules the rest of the engine relies on.
//! Addresses are kept as plain integers (`u32` for IPv4, `u128` for IPv6) so
//! every mask and offset is computed at the full width of the family.

use super::AddressCount;
use crate::error::AddressError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Bit width of an IPv4 address.
pub const IPV4_WIDTH: u8 = 32;
/// Bit width of an IPv6 address.
pub const IPV6_WIDTH: u8 = 128;

/// Address family of an [`IpAddress`] or [`IpNetwork`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Number of bits in an address of this family.
    pub fn bit_width(self) -> u8 {
        match self {
            IpFamily::V4 => IPV4_WIDTH,
            IpFamily::V6 => IPV6_WIDTH,
        }
    }

    /// IP version number (4 or 6).
    pub fn version(self) -> u8 {
        match self {
            IpFamily::V4 => 4,
            IpFamily::V6 => 6,
        }
    }

    fn all_ones(self) -> u128 {
        match self {
            IpFamily::V4 => u32::MAX as u128,
            IpFamily::V6 => u128::MAX,
        }
    }
}

/// Network mask for `prefix` in `family`, widened to `u128`.
///
/// # Examples
/// ```
/// use subnet_calculator::models::{prefix_mask_bits, IpFamily};
/// assert_eq!(prefix_mask_bits(IpFamily::V4, 24), 0xFFFF_FF00);
/// assert_eq!(prefix_mask_bits(IpFamily::V6, 0), 0);
/// ```
pub fn prefix_mask_bits(family: IpFamily, prefix: u8) -> u128 {
    let host_bits = family.bit_width().saturating_sub(prefix);
    if host_bits >= IPV6_WIDTH {
        // shifting a u128 by 128 overflows
        0
    } else {
        (family.all_ones() >> host_bits) << host_bits
    }
}

/// Host (wildcard) mask for `prefix` in `family`, widened to `u128`.
pub fn hostmask_bits(family: IpFamily, prefix: u8) -> u128 {
    family.all_ones() & !prefix_mask_bits(family, prefix)
}

/// An IPv4 or IPv6 address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IpAddress {
    V4(u32),
    V6(u128),
}

impl IpAddress {
    pub fn family(&self) -> IpFamily {
        match self {
            IpAddress::V4(_) => IpFamily::V4,
            IpAddress::V6(_) => IpFamily::V6,
        }
    }

    pub fn is_ipv4(&self) -> bool {
        self.family() == IpFamily::V4
    }

    pub fn is_ipv6(&self) -> bool {
        self.family() == IpFamily::V6
    }

    /// The address value widened to `u128`.
    pub fn bits(&self) -> u128 {
        match self {
            IpAddress::V4(v) => *v as u128,
            IpAddress::V6(v) => *v,
        }
    }

    /// Build an address of `family` from the low bits of `bits`.
    pub fn from_bits(family: IpFamily, bits: u128) -> IpAddress {
        match family {
            IpFamily::V4 => IpAddress::V4((bits & IpFamily::V4.all_ones()) as u32),
            IpFamily::V6 => IpAddress::V6(bits),
        }
    }

    /// Address `n` positions after this one, or `None` past the end of the family.
    pub fn checked_add(&self, n: u128) -> Option<IpAddress> {
        match self {
            IpAddress::V4(v) => u32::try_from(n)
                .ok()
                .and_then(|n| v.checked_add(n))
                .map(IpAddress::V4),
            IpAddress::V6(v) => v.checked_add(n).map(IpAddress::V6),
        }
    }

    /// Address `n` positions before this one, or `None` below zero.
    pub fn checked_sub(&self, n: u128) -> Option<IpAddress> {
        match self {
            IpAddress::V4(v) => u32::try_from(n)
                .ok()
                .and_then(|n| v.checked_sub(n))
                .map(IpAddress::V4),
            IpAddress::V6(v) => v.checked_sub(n).map(IpAddress::V6),
        }
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(addr: Ipv4Addr) -> Self {
        IpAddress::V4(u32::from(addr))
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(addr: Ipv6Addr) -> Self {
        IpAddress::V6(u128::from(addr))
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl From<IpAddress> for IpAddr {
    fn from(addr: IpAddress) -> Self {
        match addr {
            IpAddress::V4(v) => IpAddr::V4(Ipv4Addr::from(v)),
            IpAddress::V6(v) => IpAddr::V6(Ipv6Addr::from(v)),
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpAddress::V4(v) => fmt::Display::fmt(&Ipv4Addr::from(*v), f),
            IpAddress::V6(v) => fmt::Display::fmt(&Ipv6Addr::from(*v), f),
        }
    }
}

impl FromStr for IpAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

impl Serialize for IpAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D>(deserializer: D) -> Result<IpAddress, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_address(&s).map_err(de::Error::custom)
    }
}

/// Parse a dotted-quad IPv4 or colon-hextet IPv6 address.
///
/// Text containing `:` is parsed as IPv6, anything else as IPv4. Embedded
/// IPv4 forms like `::ffff:1.2.3.4` are rejected.
pub fn parse_address(text: &str) -> Result<IpAddress, AddressError> {
    let text = text.trim();
    let invalid = || AddressError::InvalidAddressFormat(text.to_string());

    if text.contains(':') {
        if text.contains('.') {
            return Err(invalid());
        }
        text.parse::<Ipv6Addr>()
            .map(IpAddress::from)
            .map_err(|_| invalid())
    } else {
        text.parse::<Ipv4Addr>()
            .map(IpAddress::from)
            .map_err(|_| invalid())
    }
}

/// Canonical text form of an address.
pub fn format(addr: &IpAddress) -> String {
    addr.to_string()
}

/// Network address of `network`: the base with all host bits cleared.
pub fn mask(network: &IpNetwork) -> IpAddress {
    let family = network.family();
    let bits = network.base.bits() & prefix_mask_bits(family, network.prefix_length);
    IpAddress::from_bits(family, bits)
}

/// A CIDR network: a base address and a prefix length.
///
/// The base is kept as given; host bits in it are allowed and the network
/// address is always re-derived with [`mask`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    base: IpAddress,
    prefix_length: u8,
}

impl IpNetwork {
    /// Create a network, checking the prefix against the family width.
    pub fn new(base: IpAddress, prefix_length: u8) -> Result<IpNetwork, AddressError> {
        if prefix_length > base.family().bit_width() {
            return Err(AddressError::InvalidPrefixLength(prefix_length.to_string()));
        }
        Ok(IpNetwork {
            base,
            prefix_length,
        })
    }

    /// Single host network (/32 or /128) for `addr`.
    pub fn host(addr: IpAddress) -> IpNetwork {
        IpNetwork {
            base: addr,
            prefix_length: addr.family().bit_width(),
        }
    }

    pub fn base(&self) -> IpAddress {
        self.base
    }

    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    pub fn family(&self) -> IpFamily {
        self.base.family()
    }

    /// Number of host bits (width - prefix).
    pub fn host_bits(&self) -> u8 {
        self.family().bit_width() - self.prefix_length
    }

    pub fn network_address(&self) -> IpAddress {
        mask(self)
    }

    pub fn netmask(&self) -> IpAddress {
        IpAddress::from_bits(
            self.family(),
            prefix_mask_bits(self.family(), self.prefix_length),
        )
    }

    /// Wildcard mask, the one's complement of the netmask.
    pub fn hostmask(&self) -> IpAddress {
        IpAddress::from_bits(
            self.family(),
            hostmask_bits(self.family(), self.prefix_length),
        )
    }

    /// Highest address in the network.
    pub fn last_address(&self) -> IpAddress {
        let family = self.family();
        let bits = self.network_address().bits() | hostmask_bits(family, self.prefix_length);
        IpAddress::from_bits(family, bits)
    }

    /// Broadcast address; IPv6 has no broadcast so this is `None` there.
    pub fn broadcast(&self) -> Option<IpAddress> {
        match self.family() {
            IpFamily::V4 => Some(self.last_address()),
            IpFamily::V6 => None,
        }
    }

    pub fn num_addresses(&self) -> AddressCount {
        AddressCount::from_host_bits(self.host_bits())
    }

    pub fn contains(&self, addr: &IpAddress) -> bool {
        addr.family() == self.family()
            && addr.bits() & prefix_mask_bits(self.family(), self.prefix_length)
                == self.network_address().bits()
    }

    /// True when every address of `self` lies inside `other`.
    pub fn subnet_of(&self, other: &IpNetwork) -> bool {
        self.family() == other.family()
            && self.prefix_length >= other.prefix_length
            && other.contains(&self.network_address())
    }

    /// True when every address of `other` lies inside `self`.
    pub fn supernet_of(&self, other: &IpNetwork) -> bool {
        other.subnet_of(self)
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network_address(), self.prefix_length)
    }
}

impl FromStr for IpNetwork {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_network(s)
    }
}

impl Serialize for IpNetwork {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpNetwork {
    fn deserialize<D>(deserializer: D) -> Result<IpNetwork, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_network(&s).map_err(de::Error::custom)
    }
}

/// Parse `address/prefix` into an [`IpNetwork`].
///
/// Without a `/` the text is parsed as a bare address with a host prefix.
/// IPv4 networks also accept a dotted netmask (`10.0.0.0/255.0.0.0`).
pub fn parse_network(text: &str) -> Result<IpNetwork, AddressError> {
    let text = text.trim();
    let Some((addr, prefix)) = text.split_once('/') else {
        return parse_address(text).map(IpNetwork::host);
    };

    let base = parse_address(addr)?;
    let invalid_prefix = || AddressError::InvalidPrefixLength(prefix.to_string());

    let prefix_length = if base.is_ipv4() && prefix.contains('.') {
        netmask_to_prefix(prefix).ok_or_else(invalid_prefix)?
    } else {
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_prefix());
        }
        prefix.parse::<u8>().map_err(|_| invalid_prefix())?
    };

    IpNetwork::new(base, prefix_length).map_err(|_| invalid_prefix())
}

/// Prefix length of a contiguous dotted IPv4 netmask.
fn netmask_to_prefix(netmask: &str) -> Option<u8> {
    let bits = u32::from(netmask.parse::<Ipv4Addr>().ok()?);
    let ones = bits.leading_ones();
    if ones + bits.trailing_zeros() == u32::from(IPV4_WIDTH) {
        Some(ones as u8)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(text: &str) -> IpNetwork {
        parse_network(text).unwrap()
    }

    #[test]
    fn test_prefix_mask_bits() {
        assert_eq!(prefix_mask_bits(IpFamily::V4, 0), 0x0000_0000);
        assert_eq!(prefix_mask_bits(IpFamily::V4, 8), 0xFF00_0000);
        assert_eq!(prefix_mask_bits(IpFamily::V4, 32), 0xFFFF_FFFF);
        assert_eq!(prefix_mask_bits(IpFamily::V6, 0), 0);
        assert_eq!(prefix_mask_bits(IpFamily::V6, 64), u128::from(u64::MAX) << 64);
        assert_eq!(prefix_mask_bits(IpFamily::V6, 128), u128::MAX);
        assert_eq!(hostmask_bits(IpFamily::V4, 24), 0xFF);
        assert_eq!(hostmask_bits(IpFamily::V6, 0), u128::MAX);
    }

    #[test]
    fn test_parse_address_ipv4_round_trip() {
        for text in ["0.0.0.0", "10.0.0.1", "192.168.1.255", "255.255.255.255"] {
            let addr = parse_address(text).unwrap();
            assert!(addr.is_ipv4());
            assert_eq!(format(&addr), text);
            assert_eq!(parse_address(&format(&addr)).unwrap(), addr);
        }
    }

    #[test]
    fn test_parse_address_ipv6_canonical() {
        let addr = parse_address("2001:0DB8:0000:0000::0001").unwrap();
        assert!(addr.is_ipv6());
        assert_eq!(addr.to_string(), "2001:db8::1");
        assert_eq!(parse_address("::").unwrap(), IpAddress::V6(0));
        assert_eq!(parse_address(" 2606:4700::1 ").unwrap().to_string(), "2606:4700::1");
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for text in [
            "",
            "abc",
            "256.1.1.1",
            "1.2.3",
            "1.2.3.4.5",
            "1.2.3.4x",
            "1,2,3,4",
            "2001:db8::g",
            "2001:db8:::1",
            "::ffff:1.2.3.4",
        ] {
            assert_eq!(
                parse_address(text),
                Err(AddressError::InvalidAddressFormat(text.to_string())),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_network_masks_base() {
        let network = net("10.1.2.3/8");
        assert_eq!(network.base().to_string(), "10.1.2.3");
        assert_eq!(network.network_address().to_string(), "10.0.0.0");
        assert_eq!(network.to_string(), "10.0.0.0/8");

        let network = net("2001:db8:1:2::5/32");
        assert_eq!(mask(&network).to_string(), "2001:db8::");
    }

    #[test]
    fn test_parse_network_prefix_zero() {
        let v4 = net("192.168.1.1/0");
        assert_eq!(v4.network_address(), IpAddress::V4(0));
        assert_eq!(v4.netmask().to_string(), "0.0.0.0");
        assert_eq!(v4.hostmask().to_string(), "255.255.255.255");

        let v6 = net("2001:db8::1/0");
        assert_eq!(v6.network_address(), IpAddress::V6(0));
        assert_eq!(v6.last_address(), IpAddress::V6(u128::MAX));
    }

    #[test]
    fn test_parse_network_without_prefix_is_host() {
        let v4 = net("10.0.0.5");
        assert_eq!(v4.prefix_length(), 32);
        let v6 = net("2606:4700::1");
        assert_eq!(v6.prefix_length(), 128);
    }

    #[test]
    fn test_parse_network_dotted_netmask() {
        assert_eq!(net("10.0.0.0/255.255.255.0").prefix_length(), 24);
        assert_eq!(net("10.0.0.0/255.255.255.255").prefix_length(), 32);
        assert_eq!(net("10.0.0.0/0.0.0.0").prefix_length(), 0);
        assert!(parse_network("10.0.0.0/255.0.255.0").is_err());
    }

    #[test]
    fn test_parse_network_invalid_prefix() {
        for (text, prefix) in [
            ("10.0.0.0/33", "33"),
            ("10.0.0.0/", ""),
            ("10.0.0.0/abc", "abc"),
            ("10.0.0.0/-1", "-1"),
            ("10.0.0.0/24/8", "24/8"),
            ("2001:db8::/129", "129"),
            ("2001:db8::/999", "999"),
        ] {
            assert_eq!(
                parse_network(text),
                Err(AddressError::InvalidPrefixLength(prefix.to_string())),
                "{text}"
            );
        }
        assert_eq!(
            parse_network("10.0.0/24"),
            Err(AddressError::InvalidAddressFormat("10.0.0".to_string()))
        );
    }

    #[test]
    fn test_broadcast_only_for_ipv4() {
        assert_eq!(
            net("192.168.1.0/24").broadcast().unwrap().to_string(),
            "192.168.1.255"
        );
        assert_eq!(net("2001:db8::/64").broadcast(), None);
        assert_eq!(
            net("2001:db8::/64").last_address().to_string(),
            "2001:db8::ffff:ffff:ffff:ffff"
        );
    }

    #[test]
    fn test_contains_and_subnet_of() {
        let ten = net("10.0.0.0/8");
        assert!(ten.contains(&parse_address("10.255.0.1").unwrap()));
        assert!(!ten.contains(&parse_address("11.0.0.1").unwrap()));
        assert!(!ten.contains(&parse_address("::a00:1").unwrap()));

        let small = net("10.1.0.0/16");
        assert!(small.subnet_of(&ten));
        assert!(ten.supernet_of(&small));
        assert!(!ten.subnet_of(&small));
        assert!(ten.subnet_of(&ten));
        assert!(!net("2001:db8::/32").subnet_of(&ten));
    }

    #[test]
    fn test_checked_offsets() {
        let addr = parse_address("255.255.255.254").unwrap();
        assert_eq!(addr.checked_add(1).unwrap().to_string(), "255.255.255.255");
        assert_eq!(addr.checked_add(2), None);
        assert_eq!(IpAddress::V4(0).checked_sub(1), None);
        assert_eq!(IpAddress::V6(u128::MAX).checked_add(1), None);
    }

    #[test]
    fn test_serde_as_strings() {
        let network = net("10.1.2.3/24");
        assert_eq!(serde_json::to_string(&network).unwrap(), "\"10.1.2.0/24\"");
        let back: IpNetwork = serde_json::from_str("\"10.1.2.0/24\"").unwrap();
        assert_eq!(back.network_address(), network.network_address());
        let addr: IpAddress = serde_json::from_str("\"2001:db8::1\"").unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"2001:db8::1\"");
        assert!(serde_json::from_str::<IpAddress>("\"nope\"").is_err());
    }
}
