//! The `nx:` tag annotation language and its typed bindings.
//!
//! Inventory objects carry free-text tags of the form
//! `nx:<namespace>:<field>[<value>]`. Each settings struct declares a
//! [`FieldSpec`] table binding `(namespace, field)` pairs to typed setters;
//! [`resolve`] scans a record's own tags first and falls back to the parent
//! prefix's tags for single-valued fields that found no own value. List
//! fields collect every matching own tag and never consult the parent.
//!
//! Values that fail to parse to the declared primitive are skipped with a
//! warning, never fatal: the next matching value (or the parent's) is tried.

use tracing::warn;

// ── Binding table ────────────────────────────────────────────────────

/// Typed setter for one field of a settings struct.
pub enum Setter<T> {
    Str(fn(&mut T, String)),
    Int(fn(&mut T, i64)),
    Bool(fn(&mut T, bool)),
    StrList(fn(&mut T, Vec<String>)),
    IntList(fn(&mut T, Vec<i64>)),
}

/// One row of a schema's binding table: which `(namespace, field)` pair
/// feeds which typed setter.
pub struct FieldSpec<T> {
    pub namespace: &'static str,
    pub field: &'static str,
    pub setter: Setter<T>,
}

impl<T> FieldSpec<T> {
    pub const fn string(ns: &'static str, field: &'static str, set: fn(&mut T, String)) -> Self {
        Self {
            namespace: ns,
            field,
            setter: Setter::Str(set),
        }
    }

    pub const fn int(ns: &'static str, field: &'static str, set: fn(&mut T, i64)) -> Self {
        Self {
            namespace: ns,
            field,
            setter: Setter::Int(set),
        }
    }

    pub const fn bool(ns: &'static str, field: &'static str, set: fn(&mut T, bool)) -> Self {
        Self {
            namespace: ns,
            field,
            setter: Setter::Bool(set),
        }
    }

    pub const fn string_list(
        ns: &'static str,
        field: &'static str,
        set: fn(&mut T, Vec<String>),
    ) -> Self {
        Self {
            namespace: ns,
            field,
            setter: Setter::StrList(set),
        }
    }

    pub const fn int_list(ns: &'static str, field: &'static str, set: fn(&mut T, Vec<i64>)) -> Self {
        Self {
            namespace: ns,
            field,
            setter: Setter::IntList(set),
        }
    }
}

/// A settings struct that can be populated from tag strings.
pub trait TagSchema: Default + Sized + 'static {
    /// Declarative binding table for this schema.
    const FIELDS: &'static [FieldSpec<Self>];
}

// ── Resolution ───────────────────────────────────────────────────────

/// Populate a fresh `T` from a record's own tags, falling back to the
/// parent's tags for single-valued fields with no own value.
pub fn resolve<T: TagSchema>(own_tags: &[String], parent_tags: &[String]) -> T {
    let mut target = T::default();

    for spec in T::FIELDS {
        match spec.setter {
            Setter::Str(set) => {
                // Not `or` — the parent scan only runs when the own scan
                // found nothing, so an empty own value shadows a parent
                // value.
                let value = first_string(&matching_values(own_tags, spec))
                    .or_else(|| first_string(&matching_values(parent_tags, spec)));
                if let Some(value) = value {
                    set(&mut target, value);
                }
            }
            Setter::Int(set) => {
                let value = first_int(&matching_values(own_tags, spec), spec)
                    .or_else(|| first_int(&matching_values(parent_tags, spec), spec));
                if let Some(value) = value {
                    set(&mut target, value);
                }
            }
            Setter::Bool(set) => {
                let value = first_bool(&matching_values(own_tags, spec), spec)
                    .or_else(|| first_bool(&matching_values(parent_tags, spec), spec));
                if let Some(value) = value {
                    set(&mut target, value);
                }
            }
            // List fields read own tags only: zero matches is not
            // distinguishable from an explicit empty override, so there is
            // no parent fallback for them.
            Setter::StrList(set) => {
                let values = matching_values(own_tags, spec)
                    .into_iter()
                    .map(ToOwned::to_owned)
                    .collect();
                set(&mut target, values);
            }
            Setter::IntList(set) => {
                let values = matching_values(own_tags, spec)
                    .into_iter()
                    .filter_map(|value| match value.parse::<i64>() {
                        Ok(parsed) => Some(parsed),
                        Err(_) => {
                            warn!(
                                "could not parse {value:?} as int for nx:{}:{}, skipping",
                                spec.namespace, spec.field
                            );
                            None
                        }
                    })
                    .collect();
                set(&mut target, values);
            }
        }
    }

    target
}

/// Extract the value of one tag if it matches `nx:<ns>:<field>[<value>]`.
fn tag_value<'t, T>(tag: &'t str, spec: &FieldSpec<T>) -> Option<&'t str> {
    let rest = tag.strip_prefix("nx:")?;
    let rest = rest.strip_prefix(spec.namespace)?;
    let rest = rest.strip_prefix(':')?;
    let rest = rest.strip_prefix(spec.field)?;
    let rest = rest.strip_prefix('[')?;
    rest.strip_suffix(']')
}

/// All values matching a spec, in tag order.
fn matching_values<'t, T>(tags: &'t [String], spec: &FieldSpec<T>) -> Vec<&'t str> {
    tags.iter()
        .filter_map(|tag| tag_value(tag, spec))
        .collect()
}

/// First matching value as an owned string; an empty value counts as found.
fn first_string(values: &[&str]) -> Option<String> {
    values.first().map(|v| (*v).to_owned())
}

/// First value that parses as an integer; unparseable values are skipped
/// with a warning.
fn first_int<T>(values: &[&str], spec: &FieldSpec<T>) -> Option<i64> {
    for value in values {
        match value.parse::<i64>() {
            Ok(parsed) => return Some(parsed),
            Err(_) => warn!(
                "could not parse {value:?} as int for nx:{}:{}, trying next value",
                spec.namespace, spec.field
            ),
        }
    }
    None
}

/// First value that parses as a boolean (`1/t/T/TRUE/true/True` and the
/// matching false literals); unparseable values are skipped with a warning.
fn first_bool<T>(values: &[&str], spec: &FieldSpec<T>) -> Option<bool> {
    for value in values {
        match parse_bool_literal(value) {
            Some(parsed) => return Some(parsed),
            None => warn!(
                "could not parse {value:?} as bool for nx:{}:{}, trying next value",
                spec.namespace, spec.field
            ),
        }
    }
    None
}

fn parse_bool_literal(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// ── Schemas ──────────────────────────────────────────────────────────

/// Per-record DNS generation settings (`nx:dns:*`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DnsSettings {
    pub enabled: bool,
    pub forward_zone: String,
    /// Reverse zone as a CIDR string, e.g. `10.1.20.0/24`.
    pub reverse_zone: String,
    pub cnames: Vec<String>,
}

impl TagSchema for DnsSettings {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::bool("dns", "enable", |s, v| s.enabled = v),
        FieldSpec::string("dns", "forward_zone", |s, v| s.forward_zone = v),
        FieldSpec::string("dns", "reverse_zone", |s, v| s.reverse_zone = v),
        FieldSpec::string_list("dns", "cname", |s, v| s.cnames = v),
    ];
}

/// Per-peer WireGuard settings (`nx:wg:*`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireguardSettings {
    pub public_key: String,
    /// Endpoint address other peers connect to.
    pub ip: String,
    pub port: i64,
}

impl TagSchema for WireguardSettings {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::string("wg", "pubkey", |s, v| s.public_key = v),
        FieldSpec::string("wg", "ip", |s, v| s.ip = v),
        FieldSpec::int("wg", "port", |s, v| s.port = v),
    ];
}

/// Per-record IP list membership (`nx:ipl:*`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IplSettings {
    pub enabled: bool,
    pub lists: Vec<String>,
}

impl TagSchema for IplSettings {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::bool("ipl", "enable", |s, v| s.enabled = v),
        FieldSpec::string_list("ipl", "list", |s, v| s.lists = v),
    ];
}

/// Which generators a prefix opts its addresses into. Resolved from the
/// prefix's own tags only — prefixes have no parent namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixFeatures {
    pub dns: bool,
    /// Name of the WireGuard VPN group; empty means not a VPN prefix.
    pub wg_vpn: String,
    pub ipl: bool,
}

impl TagSchema for PrefixFeatures {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec::bool("dns", "enable", |s, v| s.dns = v),
        FieldSpec::string("wg", "vpn", |s, v| s.wg_vpn = v),
        FieldSpec::bool("ipl", "enable", |s, v| s.ipl = v),
    ];
}

impl PrefixFeatures {
    pub fn any_enabled(&self) -> bool {
        self.dns || !self.wg_vpn.is_empty() || self.ipl
    }
}
