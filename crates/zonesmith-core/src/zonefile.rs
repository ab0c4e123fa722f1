//! DNS zone file rendering.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::RunConfig;
use crate::model::ResourceRecord;

/// Fully resolved SOA parameters for one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaInfo {
    /// FQDN of the zone's primary nameserver, trailing dot included.
    pub nameserver_fqdn: String,
    /// Responsible mail in dotted form, rendered as given.
    pub dotted_mail: String,
    pub serial: String,
    pub default_rr_ttl: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub negative_ttl: u32,
}

impl SoaInfo {
    /// Configured defaults, with the zone's owning server (if any)
    /// overriding the responsible contacts.
    pub fn for_zone(config: &RunConfig, zone: &str, serial: &str) -> Self {
        let mut info = Self {
            nameserver_fqdn: config.soa.nameserver.clone(),
            dotted_mail: config.soa.mail.clone(),
            serial: serial.to_owned(),
            default_rr_ttl: config.soa.default_rr_ttl,
            refresh: config.soa.refresh,
            retry: config.soa.retry,
            expire: config.soa.expire,
            negative_ttl: config.soa.negative_ttl,
        };

        if let Some(server) = config.server_for_zone(zone) {
            info.dotted_mail = server.dotted_email.clone();
            info.nameserver_fqdn = format!("{}.", server.name);
        }

        info
    }
}

static MASKS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?m)^(\s+\d+\s+; serial.*|; Generated at .*)$").expect("hash mask regex"),
    ]
});

/// Volatile substrings of a zone file: the serial line and the generation
/// timestamp.
pub fn masks() -> &'static [Regex] {
    &MASKS
}

/// Render one zone file.
pub fn render(
    zone: &str,
    soa: &SoaInfo,
    records: &[ResourceRecord],
    includes: &[String],
    generated_at: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "; Zone file for {zone}");
    let _ = writeln!(out, "; Generated at {generated_at}");
    let _ = writeln!(out);
    let _ = writeln!(out, "$TTL {}", soa.default_rr_ttl);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "@  IN  SOA  {} {} (",
        soa.nameserver_fqdn, soa.dotted_mail
    );
    let _ = writeln!(out, "  {}  ; serial", soa.serial);
    let _ = writeln!(out, "  {}  ; refresh", soa.refresh);
    let _ = writeln!(out, "  {}  ; retry", soa.retry);
    let _ = writeln!(out, "  {}  ; expire", soa.expire);
    let _ = writeln!(out, "  {}  ; negative cache TTL", soa.negative_ttl);
    let _ = writeln!(out, ")");
    let _ = writeln!(out);
    let _ = writeln!(out, "  IN  NS  {}", soa.nameserver_fqdn);

    if !includes.is_empty() {
        let _ = writeln!(out);
        for include in includes {
            let _ = writeln!(out, "$INCLUDE \"{include}\"");
        }
    }

    if !records.is_empty() {
        let name_width = records.iter().map(|r| r.name.len()).max().unwrap_or(0);
        let type_width = records
            .iter()
            .map(|r| r.rtype.to_string().len())
            .max()
            .unwrap_or(0);

        let _ = writeln!(out);
        for record in records {
            let rtype = record.rtype.to_string();
            let _ = writeln!(
                out,
                "{:<name_width$}  IN  {rtype:<type_width$}  {}",
                record.name, record.rdata
            );
        }
    }

    out
}
