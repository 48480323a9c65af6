//! Coredump decoding
//!
//! The dump region of a debug report is a base64 blob (optionally behind a
//! data-URI-style `...;base64,` prefix) decoding to an ELF image the
//! firmware writes without the 4-byte magic to save space. Decoding runs
//! in stages; each stage can fail independently and fields extracted
//! before a failure are retained. The first error observed is kept for
//! diagnostic display.
//!
//! Full symbolication is out of scope - the retained raw text is what the
//! esp32-firmware GDB tooling consumes.

use crate::causes;
use crate::types::CoredumpInfo;
use base64::Engine as _;
use byteorder::{ByteOrder, LittleEndian};

/// Placeholder shown when a debug report carries no coredump. Also the
/// detection sentinel for the terminal "no coredump present" state.
pub const NO_COREDUMP_PLACEHOLDER: &str = "No coredump found in the debug report.";

const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];

/// Markers bounding the build-metadata JSON the firmware embeds in the
/// coredump image
const METADATA_PREFIX: &[u8] = b"___tf_coredump_info_start___";
const METADATA_SUFFIX: &[u8] = b"___tf_coredump_info_end___";

/// Padded note name plus version word of the extra-info section written by
/// the ESP-IDF coredump component
const EXTRA_INFO_HEADER: [u8; 18] = *b"EXTRA_INFO\x00\x00\x01\x00\x00\x00\x00\x00";
const EXTRA_INFO_RESERVED: usize = 2;

/// Register block: 4-byte crashed-task handle + 13 (id, value) entries
const REGISTER_BLOCK_LEN: usize = 108;
const REGISTER_ENTRIES: usize = 13;

/// Decode the dump region of a debug report
///
/// Never fails: the worst outcome is a `CoredumpInfo` whose `error` names
/// the stage that broke. A region equal to the "no coredump" placeholder
/// yields the terminal `has_coredump == false` state with no error.
pub fn decode(dump_text: &str) -> CoredumpInfo {
    let mut info = CoredumpInfo::default();

    if dump_text.contains(NO_COREDUMP_PLACEHOLDER) {
        return info;
    }

    // Payload recovery: everything after the last data-URI marker, or the
    // whole trimmed region
    let payload = match dump_text.rfind("base64,") {
        Some(at) => &dump_text[at + "base64,".len()..],
        None => dump_text.trim(),
    };
    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let mut image = match base64::engine::general_purpose::STANDARD.decode(cleaned.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("coredump payload is not base64: {e}");
            info.error = Some(format!("failed to decode base64 coredump payload: {e}"));
            return info;
        }
    };

    // The firmware omits the ELF magic to save flash space
    if !image.starts_with(&ELF_MAGIC) {
        let mut repaired = Vec::with_capacity(image.len() + ELF_MAGIC.len());
        repaired.extend_from_slice(&ELF_MAGIC);
        repaired.append(&mut image);
        image = repaired;
    }
    info.has_coredump = true;
    info.raw_base64 = Some(dump_text.to_string());

    if let Err(message) = extract_metadata(&image, &mut info) {
        log::warn!("coredump metadata extraction failed: {message}");
        record_error(&mut info, message);
    }
    if let Err(message) = extract_registers(&image, &mut info) {
        log::warn!("coredump register extraction failed: {message}");
        record_error(&mut info, message);
    }

    info
}

/// First error wins; later stages never overwrite it
fn record_error(info: &mut CoredumpInfo, message: String) {
    if info.error.is_none() {
        info.error = Some(message);
    }
}

/// Extract the embedded build metadata JSON
fn extract_metadata(image: &[u8], info: &mut CoredumpInfo) -> Result<(), String> {
    let prefix_at = find_bytes(image, METADATA_PREFIX)
        .ok_or_else(|| "coredump metadata start marker not found".to_string())?;
    let body_start = prefix_at + METADATA_PREFIX.len();
    let body_len = find_bytes(&image[body_start..], METADATA_SUFFIX)
        .ok_or_else(|| "coredump metadata end marker not found".to_string())?;

    let body = String::from_utf8_lossy(&image[body_start..body_start + body_len]);
    let metadata: serde_json::Value = serde_json::from_str(body.trim_matches('\0').trim())
        .map_err(|e| format!("coredump metadata is not valid JSON: {e}"))?;

    info.firmware_name = metadata
        .get("firmware_file_name")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    info.firmware_commit = metadata
        .get("firmware_commit_id")
        .and_then(|v| v.as_str())
        .map(str::to_string);
    Ok(())
}

/// Extract the fixed-layout register table
///
/// A missing extra-info header is not an error (older firmware); a header
/// with a truncated table is.
fn extract_registers(image: &[u8], info: &mut CoredumpInfo) -> Result<(), String> {
    let Some(header_at) = find_bytes(image, &EXTRA_INFO_HEADER) else {
        return Ok(());
    };

    let table_start = header_at + EXTRA_INFO_HEADER.len() + EXTRA_INFO_RESERVED;
    let table_end = table_start + REGISTER_BLOCK_LEN;
    if image.len() < table_end {
        return Err("coredump register block is truncated".to_string());
    }
    let block = &image[table_start..table_end];

    let handle = LittleEndian::read_u32(&block[0..4]);
    info.crashed_task_handle = Some(format!("{handle:#x}"));

    for entry in 0..REGISTER_ENTRIES {
        let offset = 4 + entry * 8;
        let id = LittleEndian::read_u32(&block[offset..offset + 4]);
        // Id 0 marks an unused slot
        if id == 0 {
            continue;
        }
        let value = LittleEndian::read_u32(&block[offset + 4..offset + 8]);
        let Some(name) = causes::register_name(id) else {
            continue;
        };
        info.registers.insert(name, format!("{value:#x}"));
        if name == "EXCCAUSE" {
            info.exception_cause = causes::lookup_cause(value);
        }
    }
    Ok(())
}

/// First occurrence of `needle` in `haystack`
fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
