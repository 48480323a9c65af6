//! Artifact classification
//!
//! Debug reports start with a short human-readable banner containing a
//! fixed sentinel; everything else is treated as a charge log. This is the
//! only place the decoder can fail hard: with no first block at all the
//! upload is not a recognizable artifact.

use crate::blocks::BlockSequence;
use crate::types::{DecodeError, Result};
use serde::Serialize;

/// Sentinel the firmware puts in the first block of every debug report
pub const REPORT_SENTINEL: &str = "Scroll down for event log!";

/// A report banner is short; anything longer is charge-log data
const REPORT_BANNER_MAX_CHARS: usize = 100;

/// The two artifact kinds the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    /// Charge log: configs, logs and a CSV time series
    Protocol,
    /// Firmware debug report: config, event log, trace log, coredump
    Report,
}

/// Classify an upload by its first block
///
/// # Errors
/// `DecodeError::EmptyArtifact` if the upload has no blocks at all.
pub fn classify(blocks: &BlockSequence) -> Result<ArtifactKind> {
    let first = blocks.get(0).ok_or(DecodeError::EmptyArtifact)?;

    if first.chars().count() < REPORT_BANNER_MAX_CHARS && first.contains(REPORT_SENTINEL) {
        Ok(ArtifactKind::Report)
    } else {
        Ok(ArtifactKind::Protocol)
    }
}
