// ── Core error types ──
//
// Fatal errors abort the run; record-level conditions (bad reverse CIDR,
// family mismatch) are surfaced as errors here but caught inside the
// aggregator, which logs the offending record and moves on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Inventory ────────────────────────────────────────────────────
    #[error("inventory fetch failed: {0}")]
    Inventory(#[from] zonesmith_api::Error),

    // ── Record-level encoding errors ─────────────────────────────────
    #[error("invalid CIDR {cidr:?}: {reason}")]
    InvalidCidr { cidr: String, reason: String },

    #[error("address family mismatch: {address} does not match reverse zone {zone}")]
    FamilyMismatch { address: String, zone: String },

    #[error("address {address} is not covered by reverse zone {zone}")]
    OutsideReverseZone { address: String, zone: String },

    // ── Output file system ───────────────────────────────────────────
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    WriteFile { path: PathBuf, source: io::Error },

    #[error("failed to clean directory {}: {source}", path.display())]
    CleanDirectory { path: PathBuf, source: io::Error },
}

impl CoreError {
    /// Returns `true` for conditions that skip a single record instead of
    /// aborting the run.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            Self::InvalidCidr { .. } | Self::FamilyMismatch { .. } | Self::OutsideReverseZone { .. }
        )
    }
}
