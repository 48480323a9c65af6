//! WARP Charger Artifact Decoder Library
//!
//! A stateless, reusable library for decoding artifacts uploaded from WARP
//! charger firmware: charge logs ("protocols") and debug reports.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on decoding:
//! - Splits an upload into blank-line-delimited blocks
//! - Classifies the upload as a charge log or a debug report
//! - Extracts JSON configs, free-text logs and the CSV time series
//! - Segments debug-report trace logs into named modules
//! - Decodes the embedded ESP32 coredump (ELF repair, build metadata,
//!   register table, exception cause)
//!
//! The library does NOT:
//! - Handle HTTP routing, uploads or file storage
//! - Render HTML or charts
//! - Symbolicate stack traces (that is GDB's job, via the esp32-firmware
//!   coredump tooling)
//!
//! All higher-level functionality is in the application layer (vislog-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use vislog_decoder::{decode_artifact, DecodedArtifact};
//!
//! let raw = std::fs::read_to_string("charge.log").unwrap();
//! match decode_artifact(&raw).unwrap() {
//!     DecodedArtifact::Protocol(protocol) => {
//!         println!("charge log with {} columns", protocol.columns.len());
//!     }
//!     DecodedArtifact::Report(report) => {
//!         println!("debug report, coredump: {}", report.coredump.has_coredump);
//!     }
//! }
//! ```
//!
//! Decoding is a pure function of the artifact's text. Every field degrades
//! independently to its zero value on malformed input; the only hard error is
//! an upload that cannot be classified at all.

// Public modules
pub mod blocks;
pub mod classify;
pub mod columns;
pub mod coredump;
pub mod decoder;
pub mod protocol;
pub mod report;
pub mod types;

// Internal modules (not exposed in public API)
mod causes;
mod table;

// Re-export main types for convenience
pub use blocks::{split_blocks, BlockSequence};
pub use classify::ArtifactKind;
pub use decoder::decode_artifact;
pub use types::{
    ColumnInfo, CoredumpInfo, DataSeries, DecodeError, DecodedArtifact, ExceptionCause,
    ProtocolRecord, ReportRecord, Result, TimeSeries,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
