//! Configuration for the zonesmith CLI.
//!
//! A TOML file merged with `ZONESMITH_`-prefixed environment variables,
//! resolved into connection settings plus a `zonesmith_core::RunConfig`.
//! The file is looked up as `zonesmith.toml` in the working directory
//! first, then in the platform config directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use zonesmith_core::{DnsServer, RunConfig, SoaDefaults};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no netbox token configured")]
    NoToken,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub netbox: NetboxSection,

    #[serde(default)]
    pub output: OutputSection,

    #[serde(default)]
    pub soa: SoaSection,

    #[serde(default)]
    pub zones: ZonesSection,

    #[serde(default)]
    pub dns: DnsSection,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NetboxSection {
    /// Base URL of the NetBox API (e.g., "https://netbox.example.net/api").
    #[serde(default)]
    pub url: String,

    /// API token (plaintext — prefer `ZONESMITH_NETBOX__TOKEN`).
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputSection {
    /// Directory the generators write into.
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            root: default_output_root(),
        }
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from("generated")
}

/// SOA timer and contact defaults, overridable per field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoaSection {
    #[serde(default = "default_rr_ttl")]
    pub default_rr_ttl: u32,

    #[serde(default = "default_refresh")]
    pub refresh: u32,

    #[serde(default = "default_retry")]
    pub retry: u32,

    #[serde(default = "default_expire")]
    pub expire: u32,

    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u32,

    /// Responsible mail in dotted zone-file form.
    #[serde(default = "default_mail")]
    pub mail: String,

    /// Fallback nameserver FQDN for zones no configured server owns.
    #[serde(default = "default_nameserver")]
    pub nameserver: String,
}

impl Default for SoaSection {
    fn default() -> Self {
        Self {
            default_rr_ttl: default_rr_ttl(),
            refresh: default_refresh(),
            retry: default_retry(),
            expire: default_expire(),
            negative_ttl: default_negative_ttl(),
            mail: default_mail(),
            nameserver: default_nameserver(),
        }
    }
}

fn default_rr_ttl() -> u32 {
    SoaDefaults::default().default_rr_ttl
}
fn default_refresh() -> u32 {
    SoaDefaults::default().refresh
}
fn default_retry() -> u32 {
    SoaDefaults::default().retry
}
fn default_expire() -> u32 {
    SoaDefaults::default().expire
}
fn default_negative_ttl() -> u32 {
    SoaDefaults::default().negative_ttl
}
fn default_mail() -> String {
    SoaDefaults::default().mail
}
fn default_nameserver() -> String {
    SoaDefaults::default().nameserver
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ZonesSection {
    /// Zones that get DNSSEC options in their master declaration.
    #[serde(default)]
    pub dnssec: Vec<String>,

    /// Extra `$INCLUDE` paths per zone, for hand-maintained records.
    #[serde(default)]
    pub includes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DnsSection {
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

/// One authoritative server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerEntry {
    pub name: String,
    pub ip: String,
    pub dotted_email: String,

    /// Zones this server is the master of.
    #[serde(default)]
    pub zones: Vec<String>,

    /// Out-of-band secondaries per owned zone.
    #[serde(default)]
    pub additional_secondaries: BTreeMap<String, Vec<String>>,
}

// ── Config file path ────────────────────────────────────────────────

/// File name looked up in the working directory before the platform dir.
pub const LOCAL_CONFIG: &str = "zonesmith.toml";

/// The platform config file path via XDG / OS conventions.
pub fn default_config_path() -> PathBuf {
    ProjectDirs::from("io", "zonesmith", "zonesmith").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("zonesmith");
    p
}

/// The path `load` reads: an explicit override wins, then a local
/// `zonesmith.toml`, then the platform config path.
pub fn active_config_path(override_path: Option<&Path>) -> PathBuf {
    if let Some(path) = override_path {
        return path.to_path_buf();
    }
    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return local;
    }
    default_config_path()
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the Config from the active file plus environment variables.
pub fn load(override_path: Option<&Path>) -> Result<Config, ConfigError> {
    load_from(&active_config_path(override_path))
}

/// Load the Config from a specific file plus environment variables.
/// A missing file is fine; defaults and the environment still apply.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZONESMITH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Resolution to runtime settings ──────────────────────────────────

/// Fully resolved runtime settings: connection plus generation config.
#[derive(Debug)]
pub struct Settings {
    pub netbox_url: Url,
    pub netbox_token: SecretString,
    pub run: RunConfig,
}

impl Config {
    /// Validate the connection settings and translate the file model
    /// into the owned domain config.
    pub fn resolve(self) -> Result<Settings, ConfigError> {
        let netbox_url: Url = self
            .netbox
            .url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "netbox.url".into(),
                reason: format!("invalid URL: '{}'", self.netbox.url),
            })?;

        let netbox_token = match self.netbox.token {
            Some(token) if !token.is_empty() => SecretString::from(token),
            _ => return Err(ConfigError::NoToken),
        };

        let run = RunConfig {
            output_root: self.output.root,
            serial_override: None,
            soa: SoaDefaults {
                default_rr_ttl: self.soa.default_rr_ttl,
                refresh: self.soa.refresh,
                retry: self.soa.retry,
                expire: self.soa.expire,
                negative_ttl: self.soa.negative_ttl,
                mail: self.soa.mail,
                nameserver: self.soa.nameserver,
            },
            servers: self.dns.servers.into_iter().map(Into::into).collect(),
            dnssec_zones: self.zones.dnssec,
            zone_includes: self.zones.includes,
        };

        Ok(Settings {
            netbox_url,
            netbox_token,
            run,
        })
    }

    /// Copy with the token replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.netbox.token.is_some() {
            copy.netbox.token = Some("<redacted>".into());
        }
        copy
    }
}

impl From<ServerEntry> for DnsServer {
    fn from(entry: ServerEntry) -> Self {
        Self {
            name: entry.name,
            ip: entry.ip,
            dotted_email: entry.dotted_email,
            zones: entry.zones,
            additional_secondaries: entry.additional_secondaries,
        }
    }
}

// ── Starter config ──────────────────────────────────────────────────

/// Commented starter configuration written by `config init`.
pub const STARTER_CONFIG: &str = r#"[netbox]
url = "https://netbox.example.net/api"
# token = "..."            # or set ZONESMITH_NETBOX__TOKEN

[output]
root = "generated"

# SOA timers and contacts; every field is optional.
[soa]
# default_rr_ttl = 120
# refresh = 900
# retry = 900
# expire = 172800
# negative_ttl = 600
# mail = "hostmaster\\.example.net."
# nameserver = "ns1.example.net."

[zones]
# Zones signed with the default DNSSEC policy.
dnssec = []

# Extra $INCLUDE paths per zone, for hand-maintained records.
# [zones.includes]
# "example.net" = ["includes/example.net.static"]

# One block per authoritative server.
# [[dns.servers]]
# name = "ns1.example.net"
# ip = "203.0.113.1"
# dotted_email = "hostmaster\\.example.net."
# zones = ["example.net", "113.0.203.in-addr.arpa"]
# [dns.servers.additional_secondaries]
# "example.net" = ["198.51.100.53"]
"#;

/// Write the starter config, creating parent directories as needed.
pub fn write_starter_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, STARTER_CONFIG)?;
    Ok(())
}
