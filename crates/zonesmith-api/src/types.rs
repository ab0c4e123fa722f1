//! NetBox IPAM response types.
//!
//! All types match the JSON returned by `/api/ipam/` endpoints. NetBox wraps
//! every list response in a `{count, results}` pagination envelope and
//! attaches tags as objects, of which only the name is consumed here.

use serde::{Deserialize, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Pagination envelope returned by all NetBox list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub results: Vec<T>,
}

// ── Tags ─────────────────────────────────────────────────────────────

/// Object-form tag attached to prefixes and addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

// ── Prefixes ─────────────────────────────────────────────────────────

/// Network prefix — from `GET /ipam/prefixes/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefix {
    pub id: i64,
    /// CIDR notation, e.g. `10.1.20.0/24`.
    pub prefix: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

// ── IP addresses ─────────────────────────────────────────────────────

/// IP address — from `GET /ipam/ip-addresses/?parent=<cidr>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddress {
    pub id: i64,
    /// Address with prefix length, e.g. `10.1.20.15/24`.
    pub address: String,
    #[serde(default)]
    pub dns_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}
