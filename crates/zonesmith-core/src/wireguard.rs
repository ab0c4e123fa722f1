//! WireGuard peer configuration rendering.
//!
//! Peers carry their connection settings as `nx:wg:*` tags and are grouped
//! into VPNs by their prefix. Every complete peer gets one config file
//! listing every *other* peer of the same VPN as a `[Peer]` section.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::model::InventoryAddress;
use crate::tags::{WireguardSettings, resolve};

/// One complete peer: tag-resolved connection settings plus inventory
/// identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WgPeer {
    /// Raw display name, also used in the output file name.
    pub name: String,
    /// Inventory address in CIDR notation; serves as the interface address
    /// and as the `AllowedIPs` entry other peers use.
    pub address: String,
    pub public_key: String,
    pub endpoint_ip: String,
    pub port: i64,
}

static MASKS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![Regex::new(r"(?m)^# Generated at .*$").expect("hash mask regex")]);

/// Volatile substrings of a peer config: the generation timestamp.
pub fn masks() -> &'static [Regex] {
    &MASKS
}

/// Group the complete peers by their prefix's VPN name. Peers missing a
/// public key, endpoint IP, or port are dropped.
pub fn collect_peers(addresses: &[InventoryAddress]) -> BTreeMap<String, Vec<WgPeer>> {
    let mut vpns: BTreeMap<String, Vec<WgPeer>> = BTreeMap::new();

    for address in addresses {
        let settings: WireguardSettings = resolve(&address.tags, &address.prefix.tags);
        if settings.public_key.is_empty() || settings.ip.is_empty() || settings.port == 0 {
            debug!(
                "skipping {}: not a complete wireguard peer",
                address.address
            );
            continue;
        }

        vpns.entry(address.prefix.features.wg_vpn.clone())
            .or_default()
            .push(WgPeer {
                name: address.display_name().to_owned(),
                address: address.address.clone(),
                public_key: settings.public_key,
                endpoint_ip: settings.ip,
                port: settings.port,
            });
    }

    vpns
}

/// Render the config file for one peer, with a `[Peer]` section for every
/// other peer of the VPN. The peer itself is excluded by public key.
pub fn render(vpn: &str, peer: &WgPeer, peers: &[WgPeer], generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# WireGuard peer {} in vpn {vpn}", peer.name);
    let _ = writeln!(out, "# Generated at {generated_at}");
    let _ = writeln!(out);
    let _ = writeln!(out, "[Interface]");
    let _ = writeln!(out, "Address = {}", peer.address);
    let _ = writeln!(out, "ListenPort = {}", peer.port);

    for other in peers {
        if other.public_key == peer.public_key {
            continue;
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "[Peer]");
        let _ = writeln!(out, "# {}", other.name);
        let _ = writeln!(out, "PublicKey = {}", other.public_key);
        let _ = writeln!(out, "Endpoint = {}:{}", other.endpoint_ip, other.port);
        let _ = writeln!(out, "AllowedIPs = {}", other.address);
    }

    out
}

pub fn file_name(vpn: &str, peer: &WgPeer) -> String {
    format!("{vpn}_{}.conf", peer.name)
}
