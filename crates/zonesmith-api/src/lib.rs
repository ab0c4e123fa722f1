// zonesmith-api: Async Rust client for the NetBox IPAM API

pub mod client;
pub mod error;
pub mod types;

pub use client::NetboxClient;
pub use error::Error;
pub use types::{IpAddress, Page, Prefix, Tag};
