//! Core types for the artifact decoder library
//!
//! This module defines the structured records the decoder emits for the two
//! artifact kinds, plus the decoder error type. Every record is constructed
//! fresh per upload and is fully serializable so a rendering layer can
//! consume it directly.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Hard errors raised by the decoder
///
/// Soft failures (bad JSON block, missing CSV column, corrupt coredump
/// stage) never surface here - they degrade to the field's zero value.
/// The only hard error is an upload that cannot be classified at all.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("artifact contains no content to classify")]
    EmptyArtifact,
}

/// A fully decoded upload, one variant per artifact kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum DecodedArtifact {
    /// A charge log ("protocol"): configs, logs and a CSV time series
    Protocol(ProtocolRecord),
    /// A firmware debug report: config, event log, trace log and coredump
    Report(ReportRecord),
}

/// Decoded charge log
///
/// Positional fields degrade independently: a bad JSON block never blanks
/// out the CSV block and vice versa.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolRecord {
    /// Charger configuration captured before the charge (empty object on
    /// parse failure)
    pub before_config: Value,
    /// Free-text log preceding the charge
    pub before_log: String,
    /// Raw CSV text of the charge table
    pub csv_text: String,
    /// Charger configuration captured after the charge
    pub after_config: Value,
    /// Free-text log following the charge
    pub after_log: String,
    /// Number of CSV lines the firmware dropped before upload, if its
    /// truncation safeguard fired (a warning, not an error)
    pub dropped_lines: Option<u64>,
    /// Chart-ready time series; absent when the CSV has no `millis` column
    pub time_series: Option<TimeSeries>,
    /// All selectable data columns, predefined entries first
    pub columns: Vec<ColumnInfo>,
}

/// Chart-ready view of the charge table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    /// One `HH:MM:SS` label per CSV row
    pub timestamps: Vec<String>,
    /// One entry per numeric, non-reserved column
    pub series: Vec<DataSeries>,
    /// True if the labels were reconciled against a wall-clock timestamp
    /// from the pre-charge log; false means device millis were displayed
    /// as literal epoch times (a known approximation)
    pub reconciled: bool,
}

/// A single data column of the time series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSeries {
    /// CSV column name
    pub column: String,
    /// Display label (predefined label, or the column name for ad hoc
    /// columns)
    pub label: String,
    /// Values after the column transform and log-scale zero substitution
    pub data: Vec<f64>,
    /// True if the column is hidden by default
    pub hidden: bool,
    /// True if the column is in the predefined telemetry table
    pub predefined: bool,
}

/// A selectable column in the user-facing catalog
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    /// CSV column name
    pub name: String,
    /// Display label
    pub label: String,
    /// True if the column is in the predefined telemetry table
    pub predefined: bool,
    /// True if the column is shown without user selection
    pub default_visible: bool,
}

/// Decoded debug report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRecord {
    /// Charger configuration (empty object on parse failure, after the
    /// firmware-bug syntax repair)
    pub config: Value,
    /// Free-text event log
    pub event_log: String,
    /// Trace-log text outside any named module
    pub trace_remaining: String,
    /// Named trace-log modules in document order
    pub trace_modules: Vec<(String, String)>,
    /// Decoded coredump region
    pub coredump: CoredumpInfo,
}

/// Result of decoding the coredump region of a debug report
///
/// `has_coredump == false` with `error == None` is the canonical "no
/// coredump present" state. A set `error` means decoding was attempted and
/// failed at a specific stage; fields populated before the failure are
/// retained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoredumpInfo {
    /// True if a coredump payload was present and base64-decoded
    pub has_coredump: bool,
    /// Firmware file name from the embedded build metadata
    pub firmware_name: Option<String>,
    /// Firmware commit id from the embedded build metadata
    pub firmware_commit: Option<String>,
    /// Handle of the task that crashed, hex-formatted
    pub crashed_task_handle: Option<String>,
    /// Decoded EXCCAUSE register, if its value is a known cause code
    pub exception_cause: Option<ExceptionCause>,
    /// Register name to hex-formatted value
    pub registers: BTreeMap<&'static str, String>,
    /// The full dump-region text as uploaded (for the GDB tooling)
    pub raw_base64: Option<String>,
    /// First decoding error observed, for diagnostic display
    pub error: Option<String>,
}

/// A decoded Xtensa/ESP exception cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExceptionCause {
    /// EXCCAUSE register value
    pub code: u32,
    /// Cause mnemonic, e.g. `IntegerDivideByZeroCause`
    pub name: &'static str,
    /// Human-readable description from the Xtensa ISA manual
    pub description: &'static str,
}
