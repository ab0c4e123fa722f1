//! Run configuration consumed by the pipeline.
//!
//! These are the owned domain types the configuration loader produces;
//! they deliberately know nothing about files, TOML, or environment
//! variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default SOA timer values and contacts, applied to every zone without an
/// owning server entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaDefaults {
    /// Value of the zone file's `$TTL` directive, in seconds.
    pub default_rr_ttl: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    /// SOA minimum field, the negative-answer cache TTL.
    pub negative_ttl: u32,
    /// Responsible mail in zone-file dotted form, e.g. `hostmaster\.peg.nu`.
    pub mail: String,
    /// FQDN of the default primary nameserver, trailing dot included.
    pub nameserver: String,
}

impl Default for SoaDefaults {
    fn default() -> Self {
        Self {
            default_rr_ttl: 120,
            refresh: 900,
            retry: 900,
            expire: 172_800,
            negative_ttl: 600,
            mail: "unknown\\.admin.local".to_owned(),
            nameserver: "unknown-nameserver.local.".to_owned(),
        }
    }
}

/// One authoritative DNS server and the zones it owns as master.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsServer {
    pub name: String,
    pub ip: String,
    /// Responsible mail for this server's zones, dotted form.
    pub dotted_email: String,
    pub zones: Vec<String>,
    /// Extra secondary IPs per zone, allowed to transfer and notified in
    /// addition to the configured servers.
    pub additional_secondaries: BTreeMap<String, Vec<String>>,
}

/// Everything one generation run needs to know besides the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_root: PathBuf,
    /// Explicit zone serial; when `None` a time-derived serial is used.
    pub serial_override: Option<String>,
    pub soa: SoaDefaults,
    pub servers: Vec<DnsServer>,
    /// Zones whose master declarations get DNSSEC signing options.
    pub dnssec_zones: Vec<String>,
    /// Per-zone `$INCLUDE` files spliced into the rendered zone file.
    pub zone_includes: BTreeMap<String, Vec<String>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("generated"),
            serial_override: None,
            soa: SoaDefaults::default(),
            servers: Vec::new(),
            dnssec_zones: Vec::new(),
            zone_includes: BTreeMap::new(),
        }
    }
}

impl RunConfig {
    /// The server owning `zone` as master, if any.
    pub fn server_for_zone(&self, zone: &str) -> Option<&DnsServer> {
        self.servers
            .iter()
            .find(|server| server.zones.iter().any(|owned| owned == zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soa_defaults_match_documented_values() {
        let soa = SoaDefaults::default();
        assert_eq!(soa.default_rr_ttl, 120);
        assert_eq!(soa.refresh, 900);
        assert_eq!(soa.retry, 900);
        assert_eq!(soa.expire, 172_800);
        assert_eq!(soa.negative_ttl, 600);
        assert_eq!(soa.mail, "unknown\\.admin.local");
        assert_eq!(soa.nameserver, "unknown-nameserver.local.");
    }

    #[test]
    fn server_lookup_by_owned_zone() {
        let config = RunConfig {
            servers: vec![
                DnsServer {
                    name: "ns1.peg.nu".to_owned(),
                    zones: vec!["peg.nu".to_owned()],
                    ..DnsServer::default()
                },
                DnsServer {
                    name: "ns2.peg.nu".to_owned(),
                    zones: vec!["rack.farm".to_owned()],
                    ..DnsServer::default()
                },
            ],
            ..RunConfig::default()
        };

        assert_eq!(
            config.server_for_zone("rack.farm").map(|s| s.name.as_str()),
            Some("ns2.peg.nu")
        );
        assert_eq!(config.server_for_zone("intra"), None);
    }
}
