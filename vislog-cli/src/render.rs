//! Human-readable summary rendering
//!
//! Text renditions of the decoded records, sectioned the way the web
//! viewer tabs them: configs, logs, chart columns, trace modules,
//! coredump.

use vislog_decoder::{CoredumpInfo, DecodedArtifact, ProtocolRecord, ReportRecord};

pub fn print_summary(decoded: &DecodedArtifact) {
    match decoded {
        DecodedArtifact::Protocol(protocol) => print_protocol(protocol),
        DecodedArtifact::Report(report) => print_report(report),
    }
}

fn print_protocol(protocol: &ProtocolRecord) {
    println!("═══════════════════════════════════════════════");
    println!("  WARP Charger Charge Log");
    println!("═══════════════════════════════════════════════\n");

    if let Some(count) = protocol.dropped_lines {
        println!(
            "⚠  Warning: {count} lines were removed from the CSV data. The charge log is incomplete.\n"
        );
    }

    println!("Configuration before charge: {}", json_summary(&protocol.before_config));
    println!("Configuration after charge:  {}", json_summary(&protocol.after_config));
    println!("Log before charge: {}", line_count(&protocol.before_log));
    println!("Log after charge:  {}", line_count(&protocol.after_log));

    match &protocol.time_series {
        Some(ts) => {
            println!("\nChart data: {} rows", ts.timestamps.len());
            if !ts.reconciled {
                println!("  (no wall-clock anchor found - timestamps are approximate)");
            }
            if let (Some(first), Some(last)) = (ts.timestamps.first(), ts.timestamps.last()) {
                println!("  time range: {first} .. {last}");
            }
        }
        None => println!("\nChart data: none (no millis column)"),
    }

    if !protocol.columns.is_empty() {
        println!("\nColumns ({}):", protocol.columns.len());
        for column in &protocol.columns {
            let badge = if column.predefined { "default" } else { "ad hoc" };
            let shown = if column.default_visible { "shown" } else { "hidden" };
            println!("  {:<28} {:<32} [{badge}, {shown}]", column.name, column.label);
        }
    }
}

fn print_report(report: &ReportRecord) {
    println!("═══════════════════════════════════════════════");
    println!("  WARP Charger Debug Report");
    println!("═══════════════════════════════════════════════\n");

    println!("Configuration: {}", json_summary(&report.config));
    println!("Event log: {}", line_count(&report.event_log));

    if report.trace_modules.is_empty() {
        println!("Trace log: {}", line_count(&report.trace_remaining));
    } else {
        println!("Trace log modules:");
        for (name, content) in &report.trace_modules {
            println!("  {:<20} {}", name, line_count(content));
        }
        if !report.trace_remaining.is_empty() {
            println!("  (unsectioned: {})", line_count(&report.trace_remaining));
        }
    }

    println!();
    print_coredump(&report.coredump);
}

fn print_coredump(coredump: &CoredumpInfo) {
    if !coredump.has_coredump && coredump.error.is_none() {
        println!("Coredump: none found in the debug report");
        return;
    }

    println!("Coredump:");
    if let Some(name) = &coredump.firmware_name {
        println!("  Firmware: {name}");
    }
    if let Some(commit) = &coredump.firmware_commit {
        println!("  Commit:   {commit}");
    }
    if let Some(handle) = &coredump.crashed_task_handle {
        println!("  Crashed task handle: {handle}");
    }
    if let Some(cause) = &coredump.exception_cause {
        println!("  Exception cause:");
        println!("    Code: {} ({:#x})", cause.code, cause.code);
        println!("    Name: {}", cause.name);
        println!("    Description: {}", cause.description);
    }
    if !coredump.registers.is_empty() {
        println!("  Registers:");
        for (name, value) in &coredump.registers {
            println!("    {name:<10} {value}");
        }
    }
    if let Some(error) = &coredump.error {
        println!("  Parsing warning: {error}");
    }
    if coredump.has_coredump {
        println!(
            "\n  Note: for a complete stack trace analysis with GDB, use the\n  coredump.py script from the esp32-firmware repository."
        );
    }
}

fn json_summary(value: &serde_json::Value) -> String {
    match value.as_object() {
        Some(map) if map.is_empty() => "empty".to_string(),
        Some(map) => format!("{} top-level entries", map.len()),
        None => "non-object value".to_string(),
    }
}

fn line_count(text: &str) -> String {
    if text.trim().is_empty() {
        "empty".to_string()
    } else {
        format!("{} lines", text.lines().count())
    }
}
