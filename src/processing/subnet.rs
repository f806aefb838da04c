//! Subnet accounting per cloud mode.
//!
//! Computes network/broadcast addresses, masks, and how many host addresses
//! are usable once the provider's reserved addresses are taken out.
//!
//! IPv4 reservations:
//! - Standard: network and broadcast (RFC 950)
//! - Azure/AWS: network, the next three addresses, and broadcast
//! - OCI: network, gateway, and broadcast
//! - /31 and /32: no reservations in any mode (RFC 3021 point-to-point, single host)
//!
//! IPv6 has no broadcast and no reserved addresses; every address is usable.

use crate::error::SubnetError;
use crate::models::{parse_network, AddressCount, CloudMode, IpAddress, IpFamily, IpNetwork};
use serde::Serialize;

pub const NOTE_POINT_TO_POINT: &str = "RFC 3021 point-to-point link (no broadcast)";
pub const NOTE_SINGLE_HOST: &str = "Single host address";
pub const NOTE_IPV6: &str = "IPv6 subnets do not have reserved addresses like IPv4";

/// Everything the accountant derives from a network and a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubnetInfo {
    /// The network as requested.
    pub network: String,
    pub mode: CloudMode,
    pub network_address: IpAddress,
    /// Always `None` for IPv6.
    pub broadcast_address: Option<IpAddress>,
    pub netmask: IpAddress,
    pub wildcard_mask: IpAddress,
    pub prefix_length: u8,
    pub total_addresses: AddressCount,
    pub usable_addresses: AddressCount,
    pub first_usable_ip: IpAddress,
    pub last_usable_ip: IpAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Addresses a mode takes out at either end of an IPv4 subnet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Reservation {
    at_start: u32,
    at_end: u32,
}

/// IPv4 reservation and smallest allowed prefix for each mode.
fn ipv4_policy(mode: CloudMode) -> (Reservation, Option<u8>) {
    match mode {
        CloudMode::Standard => (
            Reservation {
                at_start: 1,
                at_end: 1,
            },
            None,
        ),
        // network, gateway, two DNS, broadcast
        CloudMode::Azure => (
            Reservation {
                at_start: 4,
                at_end: 1,
            },
            Some(29),
        ),
        // network, VPC router, DNS, future use, broadcast
        CloudMode::Aws => (
            Reservation {
                at_start: 4,
                at_end: 1,
            },
            Some(29),
        ),
        // network, gateway, broadcast
        CloudMode::Oci => (
            Reservation {
                at_start: 2,
                at_end: 1,
            },
            Some(30),
        ),
    }
}

struct Usable {
    count: AddressCount,
    first: IpAddress,
    last: IpAddress,
    note: Option<String>,
}

/// Parse `text` as a network and compute its [`SubnetInfo`].
///
/// A bare address is treated as a host network (/32 or /128).
pub fn compute_subnet_info(text: &str, mode: CloudMode) -> Result<SubnetInfo, SubnetError> {
    let network = parse_network(text)?;
    Ok(build_subnet_info(text.trim().to_string(), &network, mode))
}

/// Compute the [`SubnetInfo`] of an already parsed network.
pub fn subnet_info(network: &IpNetwork, mode: CloudMode) -> SubnetInfo {
    let requested = format!("{}/{}", network.base(), network.prefix_length());
    build_subnet_info(requested, network, mode)
}

fn build_subnet_info(requested: String, network: &IpNetwork, mode: CloudMode) -> SubnetInfo {
    let usable = match network.family() {
        IpFamily::V4 => ipv4_usable(network, mode),
        // mode has no numeric effect on IPv6
        IpFamily::V6 => ipv6_usable(network),
    };

    log::debug!(
        "subnet_info({requested}, {mode}) usable={} note={:?}",
        usable.count,
        usable.note
    );

    SubnetInfo {
        network: requested,
        mode,
        network_address: network.network_address(),
        broadcast_address: network.broadcast(),
        netmask: network.netmask(),
        wildcard_mask: network.hostmask(),
        prefix_length: network.prefix_length(),
        total_addresses: network.num_addresses(),
        usable_addresses: usable.count,
        first_usable_ip: usable.first,
        last_usable_ip: usable.last,
        note: usable.note,
    }
}

fn ipv6_usable(network: &IpNetwork) -> Usable {
    Usable {
        count: network.num_addresses(),
        first: network.network_address(),
        last: network.last_address(),
        note: Some(NOTE_IPV6.to_string()),
    }
}

fn ipv4_usable(network: &IpNetwork, mode: CloudMode) -> Usable {
    let (reservation, min_prefix) = ipv4_policy(mode);
    let prefix = network.prefix_length();
    let network_bits = network.network_address().bits() as u32;
    let last_bits = network.last_address().bits() as u32;

    let provider_note = match min_prefix {
        Some(min) if prefix > min => Some(format!(
            "{mode} does not support subnets smaller than /{min}"
        )),
        _ => None,
    };
    let with_provider_note = |note: &str| match &provider_note {
        Some(provider) => format!("{provider}; {note}"),
        None => note.to_string(),
    };

    match prefix {
        32 => Usable {
            count: AddressCount::Exact(1),
            first: IpAddress::V4(network_bits),
            last: IpAddress::V4(network_bits),
            note: Some(with_provider_note(NOTE_SINGLE_HOST)),
        },
        31 => Usable {
            count: AddressCount::Exact(2),
            first: IpAddress::V4(network_bits),
            last: IpAddress::V4(last_bits),
            note: Some(with_provider_note(NOTE_POINT_TO_POINT)),
        },
        _ => {
            // below the provider minimum the provider numbers go negative,
            // report Standard accounting instead
            let reservation = match provider_note {
                Some(_) => ipv4_policy(CloudMode::Standard).0,
                None => reservation,
            };
            let reserved = u128::from(reservation.at_start + reservation.at_end);
            Usable {
                count: network.num_addresses().saturating_sub(reserved),
                first: IpAddress::V4(network_bits + reservation.at_start),
                last: IpAddress::V4(last_bits - reservation.at_end),
                note: provider_note
                    .as_ref()
                    .map(|provider| format!("{provider}; Standard accounting shown")),
            }
        }
    }
}
