//! Aggregation of inventory addresses into per-zone record sets.

use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::{DateTime, Datelike, Local, Timelike};
use tracing::warn;

use crate::model::{InventoryAddress, RecordType, ResourceRecord, bare_address};
use crate::name::{PlaceholderNames, canonicalize};
use crate::reverse::{nibble_name, ptr_owner};
use crate::tags::{DnsSettings, resolve};

/// Group the DNS-enabled addresses into zone buckets of A/AAAA, CNAME and
/// PTR records. Bucket keys are forward zone names and minimal reverse
/// zone names; iteration order is lexicographic.
pub fn aggregate(
    addresses: &[InventoryAddress],
    placeholders: &mut PlaceholderNames,
) -> BTreeMap<String, Vec<ResourceRecord>> {
    let mut zones: BTreeMap<String, Vec<ResourceRecord>> = BTreeMap::new();

    for address in addresses {
        let settings: DnsSettings = resolve(&address.tags, &address.prefix.tags);
        if !settings.enabled {
            continue;
        }

        let (name, forward_zone) =
            canonicalize(address.display_name(), &settings.forward_zone, placeholders);

        let Ok(ip) = bare_address(&address.address).parse::<IpAddr>() else {
            warn!("skipping {}: unparseable address", address.address);
            continue;
        };

        if !forward_zone.is_empty() {
            let rtype = match ip {
                IpAddr::V4(_) => RecordType::A,
                IpAddr::V6(_) => RecordType::Aaaa,
            };
            let bucket = zones.entry(forward_zone.clone()).or_default();
            bucket.push(ResourceRecord {
                name: name.clone(),
                rtype,
                rdata: ip.to_string(),
            });
            for cname in &settings.cnames {
                bucket.push(ResourceRecord {
                    name: cname.clone(),
                    rtype: RecordType::Cname,
                    rdata: name.clone(),
                });
            }
        }

        if settings.reverse_zone.is_empty() {
            continue;
        }

        let zone = match nibble_name(&settings.reverse_zone, true) {
            Ok(zone) => zone,
            Err(err) => {
                warn!("skipping reverse record for {}: {err}", address.address);
                continue;
            }
        };

        // An empty own forward zone may be an explicit suppression tag; the
        // PTR target then still points into the parent's forward zone.
        let ptr_zone = if forward_zone.is_empty() {
            let parent: DnsSettings = resolve(&address.prefix.tags, &[]);
            parent.forward_zone
        } else {
            forward_zone
        };

        let owner = match ptr_owner(&address.address, &zone) {
            Ok(owner) => owner,
            Err(err) => {
                warn!("skipping reverse record for {}: {err}", address.address);
                continue;
            }
        };

        let rdata = if ptr_zone.is_empty() {
            format!("{name}.")
        } else {
            format!("{name}.{ptr_zone}.")
        };
        zones.entry(zone.name).or_default().push(ResourceRecord {
            name: owner,
            rtype: RecordType::Ptr,
            rdata,
        });
    }

    zones
}

/// Time-derived zone serial `YYMMDDnnn`: `nnn` counts completed 2-minute
/// windows since local midnight, keeping serials monotonic within a day.
pub fn default_serial(now: &DateTime<Local>) -> String {
    let iteration = now.num_seconds_from_midnight() / 120;
    format!(
        "{:02}{:02}{:02}{iteration:03}",
        now.year() - 2000,
        now.month(),
        now.day()
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::InventoryPrefix;
    use crate::tags::PrefixFeatures;

    fn prefix(tags: &[&str]) -> Arc<InventoryPrefix> {
        Arc::new(InventoryPrefix {
            cidr: "10.1.20.0/24".to_owned(),
            tags: tags.iter().map(|&t| t.to_owned()).collect(),
            features: PrefixFeatures::default(),
        })
    }

    fn address(
        id: i64,
        addr: &str,
        dns_name: &str,
        tags: &[&str],
        prefix: &Arc<InventoryPrefix>,
    ) -> InventoryAddress {
        InventoryAddress {
            id,
            address: addr.to_owned(),
            dns_name: dns_name.to_owned(),
            description: String::new(),
            tags: tags.iter().map(|&t| t.to_owned()).collect(),
            prefix: Arc::clone(prefix),
        }
    }

    fn record(name: &str, rtype: RecordType, rdata: &str) -> ResourceRecord {
        ResourceRecord {
            name: name.to_owned(),
            rtype,
            rdata: rdata.to_owned(),
        }
    }

    #[test]
    fn forward_reverse_and_alias_records() {
        let parent = prefix(&[
            "nx:dns:enable[true]",
            "nx:dns:forward_zone[peg.nu]",
            "nx:dns:reverse_zone[10.1.20.0/24]",
        ]);
        let addresses = vec![
            address(
                1,
                "10.1.20.11/24",
                "vm-ns-1",
                &["nx:dns:cname[www]", "nx:dns:cname[mail]"],
                &parent,
            ),
            address(2, "10.1.20.12/24", "Vm-NS-2.peg.nu", &[], &parent),
        ];

        let mut placeholders = PlaceholderNames::new();
        let zones = aggregate(&addresses, &mut placeholders);

        assert_eq!(
            zones.keys().collect::<Vec<_>>(),
            vec!["20.1.10.in-addr.arpa", "peg.nu"]
        );
        assert_eq!(
            zones["peg.nu"],
            vec![
                record("vm-ns-1", RecordType::A, "10.1.20.11"),
                record("www", RecordType::Cname, "vm-ns-1"),
                record("mail", RecordType::Cname, "vm-ns-1"),
                record("vm-ns-2", RecordType::A, "10.1.20.12"),
            ]
        );
        assert_eq!(
            zones["20.1.10.in-addr.arpa"],
            vec![
                record("11", RecordType::Ptr, "vm-ns-1.peg.nu."),
                record("12", RecordType::Ptr, "vm-ns-2.peg.nu."),
            ]
        );
    }

    #[test]
    fn disabled_records_are_skipped() {
        let parent = prefix(&["nx:dns:forward_zone[peg.nu]"]);
        let addresses = vec![address(1, "10.1.20.11/24", "vm-ns-1", &[], &parent)];

        let mut placeholders = PlaceholderNames::new();
        assert!(aggregate(&addresses, &mut placeholders).is_empty());
    }

    #[test]
    fn empty_forward_zone_tag_suppresses_forward_records_only() {
        let parent = prefix(&[
            "nx:dns:enable[true]",
            "nx:dns:forward_zone[bue39.peg.nu]",
            "nx:dns:reverse_zone[10.1.20.0/24]",
        ]);
        let addresses = vec![address(
            1,
            "10.1.20.11/24",
            "hidden-host",
            &["nx:dns:forward_zone[]"],
            &parent,
        )];

        let mut placeholders = PlaceholderNames::new();
        let zones = aggregate(&addresses, &mut placeholders);

        // No forward bucket at all, but the PTR still points into the
        // parent's (unflattened) forward zone.
        assert_eq!(zones.keys().collect::<Vec<_>>(), vec!["20.1.10.in-addr.arpa"]);
        assert_eq!(
            zones["20.1.10.in-addr.arpa"],
            vec![record("11", RecordType::Ptr, "hidden-host.bue39.peg.nu.")]
        );
    }

    #[test]
    fn reverse_family_mismatch_keeps_forward_record() {
        let parent = prefix(&[
            "nx:dns:enable[true]",
            "nx:dns:forward_zone[peg.nu]",
            "nx:dns:reverse_zone[10.1.20.0/24]",
        ]);
        let addresses = vec![address(1, "2001:db8::1/64", "v6-host", &[], &parent)];

        let mut placeholders = PlaceholderNames::new();
        let zones = aggregate(&addresses, &mut placeholders);

        assert_eq!(zones.keys().collect::<Vec<_>>(), vec!["peg.nu"]);
        assert_eq!(
            zones["peg.nu"],
            vec![record("v6-host", RecordType::Aaaa, "2001:db8::1")]
        );
    }

    #[test]
    fn unparseable_address_is_skipped_entirely() {
        let parent = prefix(&[
            "nx:dns:enable[true]",
            "nx:dns:forward_zone[peg.nu]",
            "nx:dns:reverse_zone[10.1.20.0/24]",
        ]);
        let addresses = vec![
            address(1, "bogus/24", "broken", &[], &parent),
            address(2, "10.1.20.12/24", "fine", &[], &parent),
        ];

        let mut placeholders = PlaceholderNames::new();
        let zones = aggregate(&addresses, &mut placeholders);

        assert_eq!(
            zones["peg.nu"],
            vec![record("fine", RecordType::A, "10.1.20.12")]
        );
    }

    #[test]
    fn aaaa_rdata_uses_compressed_form() {
        let parent = prefix(&["nx:dns:enable[true]", "nx:dns:forward_zone[peg.nu]"]);
        let addresses = vec![address(
            1,
            "2001:0db8:0000:0000:0000:0000:0000:0001/64",
            "v6-host",
            &[],
            &parent,
        )];

        let mut placeholders = PlaceholderNames::new();
        let zones = aggregate(&addresses, &mut placeholders);
        assert_eq!(
            zones["peg.nu"],
            vec![record("v6-host", RecordType::Aaaa, "2001:db8::1")]
        );
    }

    #[test]
    fn serial_counts_two_minute_windows_since_midnight() {
        let noon = Local
            .with_ymd_and_hms(2026, 8, 24, 12, 0, 0)
            .single()
            .expect("unambiguous");
        assert_eq!(default_serial(&noon), "260824360");

        let early = Local
            .with_ymd_and_hms(2030, 1, 5, 0, 3, 59)
            .single()
            .expect("unambiguous");
        assert_eq!(default_serial(&early), "300105001");
    }
}
