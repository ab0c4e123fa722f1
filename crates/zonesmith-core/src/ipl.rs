//! Plain IP allow-list rendering.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{InventoryAddress, bare_address};
use crate::tags::{IplSettings, resolve};

static MASKS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| vec![Regex::new(r"(?m)^# Generated at .*$").expect("hash mask regex")]);

/// Volatile substrings of an IP list: the generation timestamp.
pub fn masks() -> &'static [Regex] {
    &MASKS
}

/// Group the opted-in addresses by list name. A record may belong to
/// several lists; the prefix length is stripped from every address.
pub fn collect_lists(addresses: &[InventoryAddress]) -> BTreeMap<String, Vec<String>> {
    let mut lists: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for address in addresses {
        let settings: IplSettings = resolve(&address.tags, &address.prefix.tags);
        if !settings.enabled || settings.lists.is_empty() {
            continue;
        }

        let bare = bare_address(&address.address);
        for list in &settings.lists {
            lists.entry(list.clone()).or_default().push(bare.to_owned());
        }
    }

    lists
}

/// Render one list file: a comment header and one bare address per line.
pub fn render(name: &str, addresses: &[String], generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# IP list {name}");
    let _ = writeln!(out, "# Generated at {generated_at}");
    let _ = writeln!(out);
    for address in addresses {
        let _ = writeln!(out, "{address}");
    }
    out
}

pub fn file_name(name: &str) -> String {
    format!("{name}.ipl.txt")
}
