//! Conversions from the raw NetBox API types into the domain model.

use std::sync::Arc;

use crate::model::{InventoryAddress, InventoryPrefix};
use crate::tags::{PrefixFeatures, resolve};

fn tag_names(tags: Vec<zonesmith_api::Tag>) -> Vec<String> {
    tags.into_iter().map(|tag| tag.name).collect()
}

impl From<zonesmith_api::Prefix> for InventoryPrefix {
    fn from(prefix: zonesmith_api::Prefix) -> Self {
        let tags = tag_names(prefix.tags);
        let features: PrefixFeatures = resolve(&tags, &[]);
        Self {
            cidr: prefix.prefix,
            tags,
            features,
        }
    }
}

impl InventoryAddress {
    /// Attach a fetched address to its (already converted) parent prefix.
    pub fn from_api(address: zonesmith_api::IpAddress, prefix: Arc<InventoryPrefix>) -> Self {
        Self {
            id: address.id,
            address: address.address,
            dns_name: address.dns_name,
            description: address.description,
            tags: tag_names(address.tags),
            prefix,
        }
    }
}
