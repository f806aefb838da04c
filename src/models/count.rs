//! Exact address counts.
//!
//! A /0 IPv6 network holds 2^128 addresses, one more than `u128::MAX`, so
//! counts carry that value as its own variant instead of wrapping to zero.

use serde::{Serialize, Serializer};
use std::fmt;

/// Decimal form of 2^128.
const IPV6_SPACE_DECIMAL: &str = "340282366920938463463374607431768211456";

/// Number of addresses in a network, exact up to and including 2^128.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AddressCount {
    Exact(u128),
    /// The whole IPv6 address space, 2^128.
    Ipv6Space,
}

impl AddressCount {
    /// 2^`host_bits` addresses.
    pub fn from_host_bits(host_bits: u8) -> AddressCount {
        match 1u128.checked_shl(u32::from(host_bits)) {
            Some(count) => AddressCount::Exact(count),
            None => AddressCount::Ipv6Space,
        }
    }

    /// The count as `u128`, or `None` for 2^128.
    pub fn as_u128(&self) -> Option<u128> {
        match self {
            AddressCount::Exact(count) => Some(*count),
            AddressCount::Ipv6Space => None,
        }
    }

    /// Count minus `n`, stopping at zero.
    pub fn saturating_sub(self, n: u128) -> AddressCount {
        match self {
            AddressCount::Exact(count) => AddressCount::Exact(count.saturating_sub(n)),
            AddressCount::Ipv6Space if n == 0 => AddressCount::Ipv6Space,
            // 2^128 - n == u128::MAX - (n - 1)
            AddressCount::Ipv6Space => AddressCount::Exact(u128::MAX - (n - 1)),
        }
    }
}

impl fmt::Display for AddressCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressCount::Exact(count) => write!(f, "{count}"),
            AddressCount::Ipv6Space => f.write_str(IPV6_SPACE_DECIMAL),
        }
    }
}

/// Serialised as an integer; 2^128 does not fit any integer type serde
/// knows about and is written as a decimal string.
impl Serialize for AddressCount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AddressCount::Exact(count) => serializer.serialize_u128(*count),
            AddressCount::Ipv6Space => serializer.serialize_str(IPV6_SPACE_DECIMAL),
        }
    }
}
