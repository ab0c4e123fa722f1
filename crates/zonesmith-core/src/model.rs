//! Domain model for the inventory records a run operates on.

use std::net::IpAddr;
use std::sync::Arc;

use crate::tags::PrefixFeatures;

/// A network prefix with its generator feature selection already resolved
/// from its own tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryPrefix {
    /// CIDR notation, e.g. `10.1.20.0/24`.
    pub cidr: String,
    pub tags: Vec<String>,
    pub features: PrefixFeatures,
}

/// One address record under a prefix. The prefix is shared because every
/// address of a prefix falls back to the same parent tag namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryAddress {
    pub id: i64,
    /// Address in CIDR notation, e.g. `10.1.20.11/24`.
    pub address: String,
    pub dns_name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub prefix: Arc<InventoryPrefix>,
}

impl InventoryAddress {
    /// Display name of the record: `dns_name` when set, `description`
    /// otherwise.
    pub fn display_name(&self) -> &str {
        if self.dns_name.is_empty() {
            &self.description
        } else {
            &self.dns_name
        }
    }

    /// The bare IP of `address`, if it parses.
    pub fn ip(&self) -> Option<IpAddr> {
        bare_address(&self.address).parse().ok()
    }
}

/// Strip the prefix-length suffix from a CIDR-notation address. An address
/// without a slash is returned unchanged.
pub fn bare_address(address: &str) -> &str {
    address.split('/').next().unwrap_or(address)
}

/// Resource-record types the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum RecordType {
    A,
    #[strum(serialize = "AAAA")]
    Aaaa,
    #[strum(serialize = "CNAME")]
    Cname,
    #[strum(serialize = "PTR")]
    Ptr,
}

/// One rendered zone-file record row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Owner name, relative to the zone.
    pub name: String,
    pub rtype: RecordType,
    pub rdata: String,
}
