//! Reverse-zone (`*.arpa`) name encoding.
//!
//! A reverse zone is configured as a CIDR (`10.1.20.0/24`) and addressed in
//! DNS by its nibble form (`20.1.10.in-addr.arpa`). IPv4 reverses dotted
//! octets, IPv6 reverses the 32 hex digits of the expanded address. The
//! minimal form keeps only the labels covered by the prefix length and
//! names the zone itself; the full form of a single address minus the zone
//! suffix yields the PTR owner name.

use std::net::IpAddr;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

/// A reverse-DNS name together with the family it was encoded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibbleName {
    pub name: String,
    pub family: AddressFamily,
}

/// Encode a CIDR into its reverse-DNS name. `minimal` keeps only the
/// labels covered by the prefix length (the zone name); the full form
/// encodes every label of the address.
pub fn nibble_name(cidr: &str, minimal: bool) -> Result<NibbleName, CoreError> {
    let (address, prefix_len) = split_cidr(cidr)?;

    match address {
        IpAddr::V4(v4) => {
            let mut labels: Vec<String> =
                v4.octets().iter().rev().map(ToString::to_string).collect();
            if minimal {
                labels = labels.split_off(labels.len() - usize::from(prefix_len / 8));
            }
            Ok(NibbleName {
                name: format!("{}.in-addr.arpa", labels.join(".")),
                family: AddressFamily::V4,
            })
        }
        IpAddr::V6(v6) => {
            let expanded = format!("{:032x}", u128::from(v6));
            let mut labels: Vec<String> = expanded.chars().rev().map(String::from).collect();
            if minimal {
                labels = labels.split_off(labels.len() - usize::from(prefix_len / 4));
            }
            Ok(NibbleName {
                name: format!("{}.ip6.arpa", labels.join(".")),
                family: AddressFamily::V6,
            })
        }
    }
}

/// PTR owner name for `address` inside the minimal reverse zone `zone`:
/// the full reverse form with the zone suffix stripped.
pub fn ptr_owner(address: &str, zone: &NibbleName) -> Result<String, CoreError> {
    let full = nibble_name(address, false)?;

    if full.family != zone.family {
        return Err(CoreError::FamilyMismatch {
            address: address.to_owned(),
            zone: zone.name.clone(),
        });
    }

    full.name
        .strip_suffix(&zone.name)
        .and_then(|rest| rest.strip_suffix('.'))
        .map(ToOwned::to_owned)
        .ok_or_else(|| CoreError::OutsideReverseZone {
            address: address.to_owned(),
            zone: zone.name.clone(),
        })
}

fn split_cidr(cidr: &str) -> Result<(IpAddr, u8), CoreError> {
    let invalid = |reason: &str| CoreError::InvalidCidr {
        cidr: cidr.to_owned(),
        reason: reason.to_owned(),
    };

    let (addr_part, len_part) = cidr
        .split_once('/')
        .ok_or_else(|| invalid("missing prefix length"))?;
    let address: IpAddr = addr_part.parse().map_err(|_| invalid("unparseable address"))?;
    let prefix_len: u8 = len_part
        .parse()
        .map_err(|_| invalid("unparseable prefix length"))?;

    let max = match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };
    if prefix_len > max {
        return Err(invalid("prefix length out of range"));
    }

    Ok((address, prefix_len))
}
