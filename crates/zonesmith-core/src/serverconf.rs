//! BIND server configuration rendering.
//!
//! Every configured server gets one config file declaring every generated
//! zone: as master where the server owns the zone, as slave of the owning
//! server everywhere else. Transfer and notify targets are expressed as
//! named `acl`/`masters` lists so the zone declarations stay stable while
//! the server set changes.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::config::{DnsServer, RunConfig};

pub const DEFAULT_ACL: &str = "nx-slaves-acl";
pub const DEFAULT_MASTERS: &str = "nx-slaves-masters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum ListKind {
    Acl,
    Masters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum ZoneRole {
    Master,
    Slave,
}

static MASKS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![Regex::new(r"(?m)^ \* Generated at.*$").expect("hash mask regex")]);

/// Volatile substrings of a server config: the generation timestamp.
pub fn masks() -> &'static [Regex] {
    &MASKS
}

/// Stable 8-character zone identifier used in per-zone list names, so the
/// names remain valid even for zones with unusual characters.
fn zone_id(zone: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(zone.as_bytes()));
    digest[..8].to_owned()
}

fn scoped_list_name(kind: ListKind, zone: &str) -> String {
    format!("nx-slaves-{kind}-{}", zone_id(zone))
}

fn quoted(name: &str) -> String {
    format!("\"{name}\"")
}

/// Render the configuration file for one server.
pub fn render(
    server: &DnsServer,
    config: &RunConfig,
    generated_zones: &[String],
    generated_at: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "/*");
    let _ = writeln!(out, " * BIND configuration for {} ({})", server.name, server.ip);
    let _ = writeln!(out, " * Generated at {generated_at}");
    let _ = writeln!(out, " */");

    // The standard lists hold every other configured server, so all of
    // them may transfer from us and get notified.
    let other_ips: Vec<String> = config
        .servers
        .iter()
        .filter(|other| other.ip != server.ip)
        .map(|other| other.ip.clone())
        .collect();
    write_list(&mut out, ListKind::Acl, DEFAULT_ACL, &other_ips);
    write_list(&mut out, ListKind::Masters, DEFAULT_MASTERS, &other_ips);

    for (zone, secondaries) in &server.additional_secondaries {
        write_list(
            &mut out,
            ListKind::Acl,
            &scoped_list_name(ListKind::Acl, zone),
            secondaries,
        );
        write_list(
            &mut out,
            ListKind::Masters,
            &scoped_list_name(ListKind::Masters, zone),
            secondaries,
        );
    }

    for owner in &config.servers {
        let role = if owner.name == server.name {
            ZoneRole::Master
        } else {
            ZoneRole::Slave
        };
        for zone in &owner.zones {
            // Declare only zones actually generated this run.
            if !generated_zones.contains(zone) {
                continue;
            }
            write_zone(&mut out, server, config, owner, role, zone);
        }
    }

    out
}

fn write_list(out: &mut String, kind: ListKind, name: &str, entries: &[String]) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{kind} \"{name}\" {{");
    for entry in entries {
        let _ = writeln!(out, "  {entry};");
    }
    let _ = writeln!(out, "}};");
}

fn write_zone(
    out: &mut String,
    current: &DnsServer,
    config: &RunConfig,
    owner: &DnsServer,
    role: ZoneRole,
    zone: &str,
) {
    let _ = writeln!(out);
    let _ = writeln!(out, "zone \"{zone}\" IN {{");
    let _ = writeln!(out, "  type {role};");
    let _ = writeln!(out, "  file \"zones/{zone}.db\";");

    match role {
        ZoneRole::Master => {
            let mut transfer_refs = vec![quoted(DEFAULT_ACL)];
            let mut notify_refs = vec![quoted(DEFAULT_MASTERS)];
            if current.additional_secondaries.contains_key(zone) {
                transfer_refs.push(quoted(&scoped_list_name(ListKind::Acl, zone)));
                notify_refs.push(quoted(&scoped_list_name(ListKind::Masters, zone)));
            }
            let _ = writeln!(out, "  allow-transfer {{ {} }};", joined(&transfer_refs));
            let _ = writeln!(out, "  also-notify {{ {} }};", joined(&notify_refs));

            if config.dnssec_zones.iter().any(|flagged| flagged == zone) {
                let _ = writeln!(out, "  dnssec-policy \"default\";");
                let _ = writeln!(out, "  inline-signing yes;");
            }
        }
        ZoneRole::Slave => {
            let _ = writeln!(out, "  masters {{ {}; }};", owner.ip);
        }
    }

    let _ = writeln!(out, "}};");
}

fn joined(refs: &[String]) -> String {
    refs.iter()
        .map(|name| format!("{name};"))
        .collect::<Vec<_>>()
        .join(" ")
}
