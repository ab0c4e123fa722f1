//! End-to-end generation pipeline.
//!
//! Fetches the inventory, routes each enabled prefix's addresses to the
//! selected generators, renders everything, and writes only what changed.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use chrono::{Local, SecondsFormat};
use futures::future::try_join_all;
use tracing::{debug, info};
use zonesmith_api::NetboxClient;

use crate::aggregate::{aggregate, default_serial};
use crate::config::RunConfig;
use crate::error::CoreError;
use crate::model::{InventoryAddress, InventoryPrefix};
use crate::name::PlaceholderNames;
use crate::writer::{CachedWriter, RunReport};
use crate::zonefile::SoaInfo;
use crate::{ipl, serverconf, wireguard, zonefile};

/// Which output families a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct GeneratorSet {
    pub dns: bool,
    pub bind_config: bool,
    pub wireguard: bool,
    pub ip_lists: bool,
}

impl GeneratorSet {
    pub const ALL: Self = Self {
        dns: true,
        bind_config: true,
        wireguard: true,
        ip_lists: true,
    };
}

impl Default for GeneratorSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Run the pipeline: fetch, generate, write, report.
pub async fn run(
    client: &NetboxClient,
    config: &RunConfig,
    generators: GeneratorSet,
) -> Result<RunReport, CoreError> {
    info!("loading prefixes");
    let prefixes: Vec<Arc<InventoryPrefix>> = client
        .list_prefixes()
        .await?
        .into_iter()
        .map(|prefix| Arc::new(InventoryPrefix::from(prefix)))
        .collect();

    let enabled: Vec<Arc<InventoryPrefix>> = prefixes
        .into_iter()
        .filter(|prefix| {
            if prefix.features.any_enabled() {
                true
            } else {
                info!(
                    "skipping prefix {} because no features are enabled",
                    prefix.cidr
                );
                false
            }
        })
        .collect();

    info!("loading ip addresses of {} enabled prefixes", enabled.len());
    let fetched =
        try_join_all(enabled.iter().map(|prefix| fetch_addresses(client, prefix))).await?;

    let mut dns_addresses = Vec::new();
    let mut wg_addresses = Vec::new();
    let mut ipl_addresses = Vec::new();
    for (prefix, addresses) in enabled.iter().zip(fetched) {
        if prefix.features.dns {
            dns_addresses.extend(addresses.iter().cloned());
        }
        if !prefix.features.wg_vpn.is_empty() {
            wg_addresses.extend(addresses.iter().cloned());
        }
        if prefix.features.ipl {
            ipl_addresses.extend(addresses);
        }
    }
    sort_by_address(&mut dns_addresses);
    sort_by_address(&mut wg_addresses);
    sort_by_address(&mut ipl_addresses);

    let now = Local::now();
    let generated_at = now.to_rfc3339_opts(SecondsFormat::Secs, true);
    let serial = config
        .serial_override
        .clone()
        .unwrap_or_else(|| default_serial(&now));

    ensure_dir(&config.output_root)?;
    let mut writer = CachedWriter::new();
    let mut generated_zones: Vec<String> = Vec::new();

    // Server configs declare exactly the zones generated this run, so the
    // zone set is computed whenever either output family is selected.
    if generators.dns || generators.bind_config {
        let mut placeholders = PlaceholderNames::new();
        let zones = aggregate(&dns_addresses, &mut placeholders);
        generated_zones = zones.keys().cloned().collect();

        if generators.dns {
            info!("generating {} dns zone files", zones.len());
            let dir = config.output_root.join("zones");
            ensure_dir(&dir)?;
            for (zone, records) in &zones {
                let soa = SoaInfo::for_zone(config, zone, &serial);
                let includes = config
                    .zone_includes
                    .get(zone)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let rendered = zonefile::render(zone, &soa, records, includes, &generated_at);
                writer.write(&dir.join(format!("{zone}.db")), &rendered, zonefile::masks())?;
            }
            writer.clean_directory(&dir)?;
        }
    }

    if generators.bind_config {
        info!("generating {} bind config files", config.servers.len());
        let dir = config.output_root.join("bind-config");
        ensure_dir(&dir)?;
        for server in &config.servers {
            let rendered = serverconf::render(server, config, &generated_zones, &generated_at);
            writer.write(
                &dir.join(format!("{}.conf", server.name)),
                &rendered,
                serverconf::masks(),
            )?;
        }
        writer.clean_directory(&dir)?;
    }

    if generators.wireguard {
        let vpns = wireguard::collect_peers(&wg_addresses);
        info!("generating wireguard configs for {} vpns", vpns.len());
        let dir = config.output_root.join("wg");
        ensure_dir(&dir)?;
        for (vpn, peers) in &vpns {
            for peer in peers {
                let rendered = wireguard::render(vpn, peer, peers, &generated_at);
                writer.write(
                    &dir.join(wireguard::file_name(vpn, peer)),
                    &rendered,
                    wireguard::masks(),
                )?;
            }
        }
        writer.clean_directory(&dir)?;
    }

    if generators.ip_lists {
        let lists = ipl::collect_lists(&ipl_addresses);
        info!("generating {} ip lists", lists.len());
        let dir = config.output_root.join("ipl");
        ensure_dir(&dir)?;
        for (name, addresses) in &lists {
            let rendered = ipl::render(name, addresses, &generated_at);
            writer.write(&dir.join(ipl::file_name(name)), &rendered, ipl::masks())?;
        }
        writer.clean_directory(&dir)?;
    }

    let report = writer.into_report();

    info!("writing updated files report");
    let summary_path = config.output_root.join("updated_files.txt");
    let lines: Vec<String> = report
        .changes
        .iter()
        .map(|change| change.path.display().to_string())
        .collect();
    fs::write(&summary_path, lines.join("\n")).map_err(|source| CoreError::WriteFile {
        path: summary_path.clone(),
        source,
    })?;

    Ok(report)
}

async fn fetch_addresses(
    client: &NetboxClient,
    prefix: &Arc<InventoryPrefix>,
) -> Result<Vec<InventoryAddress>, CoreError> {
    debug!("getting ip addresses in {}", prefix.cidr);
    let addresses = client.list_addresses(&prefix.cidr).await?;
    Ok(addresses
        .into_iter()
        .map(|address| InventoryAddress::from_api(address, Arc::clone(prefix)))
        .collect())
}

/// Deterministic processing order: unparseable addresses first in input
/// order, then v4 ascending, then v6 ascending.
fn sort_by_address(addresses: &mut [InventoryAddress]) {
    addresses.sort_by_key(InventoryAddress::ip);
}

fn ensure_dir(path: &Path) -> Result<(), CoreError> {
    fs::create_dir_all(path).map_err(|source| CoreError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::InventoryPrefix;

    fn address(addr: &str) -> InventoryAddress {
        InventoryAddress {
            id: 0,
            address: addr.to_owned(),
            dns_name: String::new(),
            description: String::new(),
            tags: vec![],
            prefix: Arc::new(InventoryPrefix::default()),
        }
    }

    #[test]
    fn sorting_orders_by_family_then_value() {
        let mut addresses = vec![
            address("2001:db8::1/64"),
            address("10.1.20.100/24"),
            address("broken"),
            address("10.1.20.9/24"),
        ];
        sort_by_address(&mut addresses);

        let order: Vec<&str> = addresses.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(
            order,
            vec!["broken", "10.1.20.9/24", "10.1.20.100/24", "2001:db8::1/64"]
        );
    }

    #[test]
    fn default_generator_set_selects_everything() {
        let set = GeneratorSet::default();
        assert!(set.dns && set.bind_config && set.wireguard && set.ip_lists);
    }
}
