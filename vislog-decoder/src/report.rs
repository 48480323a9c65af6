//! Debug-report parsing
//!
//! A debug report is: banner block, config JSON, event log, then a tail
//! region of blocks bucketed by two sentinels into a trace log and a
//! coredump. The trace log is further segmented into named modules
//! delimited by `__begin_NAME__` / `__end_NAME__` markers.

use crate::blocks::BlockSequence;
use crate::coredump::{self, NO_COREDUMP_PLACEHOLDER};
use crate::types::ReportRecord;

/// Sentinel switching tail bucketing to the trace log
pub const TRACE_LOG_START: &str = "___TRACE_LOG_START___";

/// Sentinel switching tail bucketing to the coredump
pub const CORE_DUMP_START: &str = "___CORE_DUMP_START___";

const MODULE_BEGIN: &str = "__begin_";

/// Repair a known firmware serialization bug before JSON parsing
///
/// Some firmware versions emit an empty value before a comma
/// (`"key": ,`); rewriting the literal pattern to an empty object makes
/// the config parseable again.
pub fn repair_config_json(text: &str) -> String {
    text.replace(": ,", ": {},")
}

impl ReportRecord {
    /// Decode a debug report from its block sequence
    pub fn parse(blocks: &BlockSequence) -> ReportRecord {
        let config = blocks
            .get(1)
            .and_then(|text| serde_json::from_str(&repair_config_json(text.trim())).ok())
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
        let event_log = blocks.get(2).unwrap_or_default().to_string();

        let (trace_text, dump_text) = bucket_tail(blocks);
        let (trace_modules, trace_remaining) = segment_trace_modules(&trace_text);

        log::debug!(
            "report tail: {} trace modules, dump region {} chars",
            trace_modules.len(),
            dump_text.len()
        );

        ReportRecord {
            config,
            event_log,
            trace_remaining,
            trace_modules,
            coredump: coredump::decode(&dump_text),
        }
    }
}

/// Bucket the tail blocks (index 3 onward) into trace and dump regions
///
/// Sentinel blocks switch the active bucket and are consumed; blocks
/// before any sentinel belong to neither and are dropped. An empty dump
/// bucket is substituted with the "no coredump" placeholder.
fn bucket_tail(blocks: &BlockSequence) -> (String, String) {
    enum Bucket {
        None,
        Trace,
        Dump,
    }

    let mut bucket = Bucket::None;
    let mut trace: Vec<&str> = Vec::new();
    let mut dump: Vec<&str> = Vec::new();

    for block in blocks.blocks.iter().skip(3) {
        if block.contains(TRACE_LOG_START) {
            bucket = Bucket::Trace;
            continue;
        }
        if block.contains(CORE_DUMP_START) {
            bucket = Bucket::Dump;
            continue;
        }
        match bucket {
            Bucket::Trace => trace.push(block),
            Bucket::Dump => dump.push(block),
            Bucket::None => {}
        }
    }

    let dump_text = if dump.is_empty() {
        NO_COREDUMP_PLACEHOLDER.to_string()
    } else {
        dump.join("\n\n")
    };
    (trace.join("\n\n"), dump_text)
}

/// Segment the trace log into named modules
///
/// Regions delimited by `__begin_NAME__ ... __end_NAME__` (the closing
/// name must match the opening name) become modules; trimmed non-empty
/// text outside all regions is concatenated into the remaining text. With
/// no modules at all the whole trace text is returned verbatim as
/// remaining.
fn segment_trace_modules(text: &str) -> (Vec<(String, String)>, String) {
    let mut modules = Vec::new();
    let mut outside: Vec<&str> = Vec::new();
    let mut segment_start = 0;
    let mut search_from = 0;

    while let Some(found) = text[search_from..].find(MODULE_BEGIN) {
        let begin_at = search_from + found;
        let name_start = begin_at + MODULE_BEGIN.len();

        // The name runs to the next double underscore
        let Some(name_len) = text[name_start..].find("__") else {
            break;
        };
        let name = &text[name_start..name_start + name_len];
        let content_start = name_start + name_len + 2;

        let valid = !name.is_empty()
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let end_marker = format!("__end_{name}__");
        let matched = if valid {
            text[content_start..].find(&end_marker)
        } else {
            None
        };

        match matched {
            Some(end_found) => {
                let content_end = content_start + end_found;
                outside.push(&text[segment_start..begin_at]);
                modules.push((
                    name.to_string(),
                    text[content_start..content_end].trim().to_string(),
                ));
                segment_start = content_end + end_marker.len();
                search_from = segment_start;
            }
            None => {
                // Unmatched opening marker stays in the surrounding text
                search_from = name_start;
            }
        }
    }
    outside.push(&text[segment_start..]);

    if modules.is_empty() {
        return (modules, text.to_string());
    }

    let remaining = outside
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    (modules, remaining)
}
