//! Canonicalization of inventory display names into zone-relative record
//! names.
//!
//! Inventory names arrive in every shape people type into a web form:
//! mixed case, trailing free text, fully qualified, or empty. Zones deeper
//! than two labels are additionally flattened, moving the extra depth into
//! the record name so every generated zone file serves a two-label zone.

use tracing::debug;

/// Run-scoped source of substitute names for records without any usable
/// display name.
#[derive(Debug)]
pub struct PlaceholderNames {
    next: u64,
}

impl PlaceholderNames {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn next_name(&mut self) -> String {
        let n = self.next;
        self.next += 1;
        format!("unknown-static-{n}")
    }
}

impl Default for PlaceholderNames {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a raw display name against its forward zone.
///
/// Lower-cases the name, truncates it at the first space, substitutes a
/// placeholder when nothing is left, strips the zone suffix, and flattens
/// zones deeper than two labels by appending the cut-off labels to the
/// name. Returns the adjusted `(name, zone)` pair.
pub fn canonicalize(
    raw_name: &str,
    forward_zone: &str,
    placeholders: &mut PlaceholderNames,
) -> (String, String) {
    let mut name = raw_name.to_lowercase();
    if let Some(idx) = name.find(' ') {
        name.truncate(idx);
    }
    if name.is_empty() {
        name = placeholders.next_name();
    }

    if forward_zone.is_empty() {
        return (name, String::new());
    }

    let labels: Vec<&str> = forward_zone.split('.').collect();
    let (cutoff, short_zone) = if labels.len() > 2 {
        (
            labels[..labels.len() - 2].join("."),
            labels[labels.len() - 2..].join("."),
        )
    } else {
        (String::new(), forward_zone.to_owned())
    };

    // A name equal to the zone is left alone, there is nothing relative
    // left to keep.
    if name.len() > forward_zone.len() && name.ends_with(forward_zone) {
        name.truncate(name.len() - forward_zone.len() - 1);
    }

    if !cutoff.is_empty() {
        name = format!("{name}.{cutoff}");
    }

    debug!("({raw_name}).{forward_zone} -> ({name}).{short_zone}");
    (name, short_zone)
}
