//! Charge-log ("protocol") parsing
//!
//! A charge log is five positional blocks: pre-charge config JSON,
//! pre-charge log text, the CSV charge table, post-charge config JSON and
//! post-charge log text. Every field degrades independently to its zero
//! value - a missing or malformed block never fails the upload and never
//! disturbs its siblings.
//!
//! Device timestamps are uptime milliseconds. When the pre-charge log
//! contains a wall-clock timestamp, the last one in the text anchors the
//! first CSV row and every label is shifted accordingly; otherwise the
//! millis values are displayed as literal epoch times, a known
//! approximation.

use crate::blocks::BlockSequence;
use crate::columns::{self, ColumnTransform};
use crate::table::CsvTable;
use crate::types::{ColumnInfo, DataSeries, ProtocolRecord, TimeSeries};
use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// Wall-clock timestamps the firmware writes into its logs
static WALL_CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2},\d{3}").expect("invalid wall-clock pattern")
});

const WALL_CLOCK_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Offset between device uptime and wall-clock time, anchored at the first
/// CSV row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestampReconciliation {
    /// `wall_clock - epoch(first_device_millis)`
    pub offset: TimeDelta,
    /// `millis` value of the first CSV row
    pub first_device_millis: i64,
}

/// Compute the reconciliation from the pre-charge log
///
/// The last wall-clock timestamp in the text (closest to the CSV start) is
/// taken as the real-world instant of the first CSV row. `None` if no
/// parseable timestamp exists.
pub fn reconcile(before_log: &str, first_device_millis: i64) -> Option<TimestampReconciliation> {
    let found = WALL_CLOCK_RE.find_iter(before_log).last()?;
    let wall = NaiveDateTime::parse_from_str(found.as_str(), WALL_CLOCK_FORMAT).ok()?;
    let device = DateTime::from_timestamp_millis(first_device_millis)?;
    Some(TimestampReconciliation {
        offset: wall.and_utc() - device,
        first_device_millis,
    })
}

/// Format one device-millis value as an `HH:MM:SS` label
///
/// Without a reconciliation the millis value is interpreted as its own
/// epoch time.
fn format_millis(millis: i64, reconciliation: Option<&TimestampReconciliation>) -> String {
    let Some(device) = DateTime::<Utc>::from_timestamp_millis(millis) else {
        return String::new();
    };
    let instant = match reconciliation {
        Some(r) => device + r.offset,
        None => device,
    };
    instant.format("%H:%M:%S").to_string()
}

impl ProtocolRecord {
    /// Decode a charge log from its block sequence
    pub fn parse(blocks: &BlockSequence) -> ProtocolRecord {
        let before_config = parse_config_block(blocks.get(0));
        let before_log = blocks.get(1).unwrap_or_default().to_string();
        let csv_text = blocks.get(2).unwrap_or_default().to_string();
        let after_config = parse_config_block(blocks.get(3));
        let after_log = blocks.get(4).unwrap_or_default().to_string();

        let (time_series, catalog) = match CsvTable::parse(&csv_text) {
            Some(table) => (
                build_time_series(&table, &before_log),
                build_catalog(&table),
            ),
            None => (None, Vec::new()),
        };

        ProtocolRecord {
            before_config,
            before_log,
            csv_text,
            after_config,
            after_log,
            dropped_lines: blocks.dropped_lines,
            time_series,
            columns: catalog,
        }
    }
}

/// Parse a config block as JSON, degrading to an empty object
fn parse_config_block(block: Option<&str>) -> serde_json::Value {
    block
        .and_then(|text| serde_json::from_str(text.trim()).ok())
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()))
}

/// Assemble the chart-ready time series
///
/// Requires a numeric `millis` column; without one there is no time axis
/// and the whole series is absent (the JSON/log panes still render).
fn build_time_series(table: &CsvTable, before_log: &str) -> Option<TimeSeries> {
    let millis = table.numeric_column("millis")?;
    let first_millis = millis.first().copied()? as i64;

    let reconciliation = reconcile(before_log, first_millis);
    if reconciliation.is_none() {
        log::debug!("no wall-clock timestamp in pre-charge log, using device millis as epoch");
    }

    let timestamps = millis
        .iter()
        .map(|&m| format_millis(m as i64, reconciliation.as_ref()))
        .collect();

    let mut series = Vec::new();

    // Predefined columns first, in their declared order
    for entry in columns::PREDEFINED_COLUMNS {
        let Some(values) = table.numeric_column(entry.name) else {
            continue;
        };
        series.push(make_series(
            entry.name,
            entry.label,
            values,
            entry.transform,
            !entry.default_visible,
            true,
        ));
    }

    // Ad hoc columns in CSV order, default-hidden
    for name in table.headers() {
        if name == "millis"
            || columns::is_reserved_placeholder(name)
            || columns::predefined(name).is_some()
        {
            continue;
        }
        let Some(values) = table.numeric_column(name) else {
            continue;
        };
        series.push(make_series(
            name,
            name,
            values,
            ColumnTransform::Identity,
            true,
            false,
        ));
    }

    Some(TimeSeries {
        timestamps,
        series,
        reconciled: reconciliation.is_some(),
    })
}

fn make_series(
    column: &str,
    label: &str,
    values: &[f64],
    transform: ColumnTransform,
    hidden: bool,
    predefined: bool,
) -> DataSeries {
    let mut data: Vec<f64> = values.iter().map(|&v| transform.apply(v)).collect();
    // Log-scale substitution applies after the transform, to every series
    columns::substitute_log_zero(&mut data);
    DataSeries {
        column: column.to_string(),
        label: label.to_string(),
        data,
        hidden,
        predefined,
    }
}

/// Enumerate the selectable columns
///
/// Predefined columns are listed in table order whenever present (numeric
/// or not); ad hoc columns follow in CSV order and must be numeric.
/// `millis` and reserved all-uppercase placeholders never appear.
fn build_catalog(table: &CsvTable) -> Vec<ColumnInfo> {
    let mut catalog = Vec::new();

    for entry in columns::PREDEFINED_COLUMNS {
        if table.column(entry.name).is_some() {
            catalog.push(ColumnInfo {
                name: entry.name.to_string(),
                label: entry.label.to_string(),
                predefined: true,
                default_visible: entry.default_visible,
            });
        }
    }

    for name in table.headers() {
        if name == "millis"
            || columns::is_reserved_placeholder(name)
            || columns::predefined(name).is_some()
            || !table.is_numeric(name)
        {
            continue;
        }
        catalog.push(ColumnInfo {
            name: name.clone(),
            label: name.clone(),
            predefined: false,
            default_visible: false,
        });
    }

    catalog
}
