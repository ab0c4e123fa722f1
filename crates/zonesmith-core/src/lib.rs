// zonesmith-core: inventory-to-artifact generation engine
//
// Turns NetBox prefixes and addresses into BIND zone files and server
// configs, WireGuard peer configs, and plain IP lists. Rendering is pure;
// the cached writer touches only files whose content actually changed.

pub mod aggregate;
pub mod config;
mod convert;
pub mod error;
pub mod ipl;
pub mod model;
pub mod name;
pub mod pipeline;
pub mod reverse;
pub mod serverconf;
pub mod tags;
pub mod wireguard;
pub mod writer;
pub mod zonefile;

pub use config::{DnsServer, RunConfig, SoaDefaults};
pub use error::CoreError;
pub use model::{InventoryAddress, InventoryPrefix, RecordType, ResourceRecord};
pub use pipeline::{GeneratorSet, run};
pub use writer::{CachedWriter, Change, ChangeKind, RunReport};
