//! Predefined charge-log column catalog and numeric transforms
//!
//! The charger's known telemetry columns carry display labels, default
//! visibility and an optional unit transform. Anything else in the CSV is
//! an ad hoc column: selectable, default-hidden, labeled by its name.

use serde::Serialize;

/// Value shown instead of 0 in series destined for logarithmic display.
/// chart.js cannot place 0 on a log axis, so every series gets this
/// substitution after its transform.
pub const LOG_SCALE_ZERO_SUBSTITUTE: f64 = 0.01;

/// Named transform applied to a column's values before charting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColumnTransform {
    /// Values pass through unchanged
    Identity,
    /// Values are divided by a constant (e.g. tenths-of-percent to percent)
    DivideBy(f64),
}

impl ColumnTransform {
    /// Apply the transform to one value
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            ColumnTransform::Identity => value,
            ColumnTransform::DivideBy(divisor) => value / divisor,
        }
    }
}

/// One entry of the predefined telemetry-column table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredefinedColumn {
    /// CSV column name
    pub name: &'static str,
    /// Display label
    pub label: &'static str,
    /// Transform applied before charting
    pub transform: ColumnTransform,
    /// True if the column is charted without user selection
    pub default_visible: bool,
}

const fn column(
    name: &'static str,
    label: &'static str,
    transform: ColumnTransform,
    default_visible: bool,
) -> PredefinedColumn {
    PredefinedColumn {
        name,
        label,
        transform,
        default_visible,
    }
}

/// Known charger telemetry columns, in display order
pub const PREDEFINED_COLUMNS: &[PredefinedColumn] = &[
    column(
        "allowed_charging_current",
        "Allowed charging current (mA)",
        ColumnTransform::Identity,
        true,
    ),
    // Firmware reports the duty cycle in tenths of a percent
    column(
        "cp_pwm_duty_cycle",
        "CP PWM (% Duty Cycle)",
        ColumnTransform::DivideBy(10.0),
        true,
    ),
    column(
        "iec61851_state",
        "IEC61851 State",
        ColumnTransform::Identity,
        true,
    ),
    column("power", "Power (W)", ColumnTransform::Identity, true),
    column(
        "current_0",
        "Current L1 (mA)",
        ColumnTransform::Identity,
        true,
    ),
    column(
        "current_1",
        "Current L2 (mA)",
        ColumnTransform::Identity,
        true,
    ),
    column(
        "current_2",
        "Current L3 (mA)",
        ColumnTransform::Identity,
        true,
    ),
    column(
        "resistance_cp_pe",
        "Resistance CP/PE (Ohm)",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "contactor_state",
        "Contactor state",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "contactor_error",
        "Contactor error state",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "phase_0_active",
        "Phase 0 active",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "phase_1_active",
        "Phase 1 active",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "phase_2_active",
        "Phase 2 active",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "phase_0_connected",
        "Phase 0 connected",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "phase_1_connected",
        "Phase 1 connected",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "phase_2_connected",
        "Phase 2 connected",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "time_since_state_change",
        "Time since state change",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "voltage_plus_12v",
        "Voltage +12V",
        ColumnTransform::Identity,
        false,
    ),
    column(
        "voltage_minus_12v",
        "Voltage -12V",
        ColumnTransform::Identity,
        false,
    ),
];

/// Predefined table entry for a column name
pub fn predefined(name: &str) -> Option<&'static PredefinedColumn> {
    PREDEFINED_COLUMNS.iter().find(|c| c.name == name)
}

/// True for reserved placeholder columns
///
/// The firmware reserves fully upper-case column names (e.g. `STATE`) as
/// placeholder markers; they never appear in the user-facing catalog.
pub fn is_reserved_placeholder(name: &str) -> bool {
    name.chars().any(|c| c.is_alphabetic()) && !name.chars().any(|c| c.is_lowercase())
}

/// Replace exact zeros so the series survives a logarithmic axis
pub fn substitute_log_zero(data: &mut [f64]) {
    for value in data.iter_mut() {
        if *value == 0.0 {
            *value = LOG_SCALE_ZERO_SUBSTITUTE;
        }
    }
}
