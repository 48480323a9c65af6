//! End-to-end decoding of complete synthetic artifacts

use base64::Engine as _;
use vislog_decoder::{decode_artifact, DecodedArtifact};

fn charge_log() -> String {
    [
        r#"{"evse":{"auto_start_charging":true},"charge_limit":32000}"#,
        "2024-03-05 07:59:58,120 boot complete\n2024-03-05 08:00:00,000 charge requested",
        "millis,allowed_charging_current,cp_pwm_duty_cycle,power,current_0,STATE,adc_raw\n\
         5000,16000,266,0,0,A,512\n\
         6000,16000,266,3600,15800,C,530\n\
         7000,0,1000,0,0,C,528",
        r#"{"evse":{"auto_start_charging":true},"charge_limit":16000}"#,
        "2024-03-05 08:10:12,900 charge stopped",
    ]
    .join("\n\n")
}

#[test]
fn decodes_a_complete_charge_log() {
    let DecodedArtifact::Protocol(protocol) = decode_artifact(&charge_log()).unwrap() else {
        panic!("charge log classified as report");
    };

    assert_eq!(protocol.before_config["charge_limit"], 32000);
    assert_eq!(protocol.after_config["charge_limit"], 16000);
    assert!(protocol.before_log.contains("charge requested"));
    assert_eq!(protocol.dropped_lines, None);

    let ts = protocol.time_series.expect("millis column present");
    assert!(ts.reconciled);
    // Last pre-log timestamp (08:00:00,000) anchors the first row (5000 ms)
    assert_eq!(ts.timestamps, vec!["08:00:00", "08:00:01", "08:00:02"]);

    let duty = ts
        .series
        .iter()
        .find(|s| s.column == "cp_pwm_duty_cycle")
        .unwrap();
    assert_eq!(duty.data, vec![26.6, 26.6, 100.0]);

    let power = ts.series.iter().find(|s| s.column == "power").unwrap();
    // Zeros substituted for the log axis
    assert_eq!(power.data, vec![0.01, 3600.0, 0.01]);

    // STATE is a reserved placeholder, adc_raw is ad hoc
    let names: Vec<&str> = protocol.columns.iter().map(|c| c.name.as_str()).collect();
    assert!(!names.contains(&"STATE"));
    assert!(!names.contains(&"millis"));
    assert!(names.contains(&"adc_raw"));
    let adc = protocol.columns.iter().find(|c| c.name == "adc_raw").unwrap();
    assert!(!adc.predefined);
    assert!(!adc.default_visible);
}

#[test]
fn decodes_a_truncated_charge_log_with_warning() {
    let raw = "{}\n\npre log\n\n250 lines have been dropped from the following table.\n\nmillis,power\n0,100\n";
    let DecodedArtifact::Protocol(protocol) = decode_artifact(raw).unwrap() else {
        panic!("charge log classified as report");
    };
    assert_eq!(protocol.dropped_lines, Some(250));
    assert!(protocol.time_series.is_some());
}

fn coredump_image() -> Vec<u8> {
    let mut image = Vec::new();
    image.extend_from_slice(b"\x01\x00\x00\x00 elf body ");
    image.extend_from_slice(b"___tf_coredump_info_start___");
    image.extend_from_slice(
        br#"{"firmware_file_name":"warp2_firmware_2_1_0_6606fbbf.bin","firmware_commit_id":"6606fbbf"}"#,
    );
    image.extend_from_slice(b"___tf_coredump_info_end___");
    image.extend_from_slice(b"EXTRA_INFO\x00\x00\x01\x00\x00\x00\x00\x00");
    image.extend_from_slice(&[0, 0]); // reserved
    let mut block = vec![0u8; 108];
    block[0..4].copy_from_slice(&0x3ffb_4a8cu32.to_le_bytes());
    // Slot 0: EXCCAUSE = 29 (StoreProhibitedCause)
    block[4..8].copy_from_slice(&232u32.to_le_bytes());
    block[8..12].copy_from_slice(&29u32.to_le_bytes());
    // Slot 1: EXCVADDR
    block[12..16].copy_from_slice(&238u32.to_le_bytes());
    block[16..20].copy_from_slice(&0x0000_001cu32.to_le_bytes());
    image.extend_from_slice(&block);
    image
}

fn debug_report(dump_block: &str) -> String {
    [
        "WARP2 debug report. Scroll down for event log!",
        r#"{"network": ,"evse":{"managed":true}}"#,
        "2024-03-05 08:00:00,000 event log line",
        "___TRACE_LOG_START___",
        "boot banner",
        "__begin_network__\nsta connected\n__end_network__\n__begin_evse__\niec state 2\n__end_evse__\ntrailing noise",
        "___CORE_DUMP_START___",
        dump_block,
    ]
    .join("\n\n")
}

#[test]
fn decodes_a_complete_debug_report() {
    let encoded = base64::engine::general_purpose::STANDARD.encode(coredump_image());
    let raw = debug_report(&encoded);

    let DecodedArtifact::Report(report) = decode_artifact(&raw).unwrap() else {
        panic!("debug report classified as protocol");
    };

    // The firmware-bug repair turned `"network": ,` into an empty object
    assert_eq!(report.config["network"], serde_json::json!({}));
    assert_eq!(report.config["evse"]["managed"], true);
    assert!(report.event_log.contains("event log line"));

    assert_eq!(report.trace_modules.len(), 2);
    assert_eq!(report.trace_modules[0].0, "network");
    assert_eq!(report.trace_modules[0].1, "sta connected");
    assert_eq!(report.trace_modules[1].0, "evse");
    assert!(report.trace_remaining.contains("boot banner"));
    assert!(report.trace_remaining.contains("trailing noise"));

    let coredump = &report.coredump;
    assert!(coredump.has_coredump);
    assert_eq!(coredump.error, None);
    assert_eq!(
        coredump.firmware_name.as_deref(),
        Some("warp2_firmware_2_1_0_6606fbbf.bin")
    );
    assert_eq!(coredump.firmware_commit.as_deref(), Some("6606fbbf"));
    assert_eq!(coredump.crashed_task_handle.as_deref(), Some("0x3ffb4a8c"));
    assert_eq!(coredump.registers["EXCCAUSE"], "0x1d");
    assert_eq!(coredump.registers["EXCVADDR"], "0x1c");
    let cause = coredump.exception_cause.unwrap();
    assert_eq!(cause.code, 29);
    assert_eq!(cause.name, "StoreProhibitedCause");
}

#[test]
fn report_without_coredump_is_terminal_not_an_error() {
    let raw = [
        "WARP2 debug report. Scroll down for event log!",
        "{}",
        "events",
        "___TRACE_LOG_START___",
        "just trace text",
    ]
    .join("\n\n");

    let DecodedArtifact::Report(report) = decode_artifact(&raw).unwrap() else {
        panic!("debug report classified as protocol");
    };
    assert_eq!(report.trace_remaining, "just trace text");
    assert!(report.trace_modules.is_empty());
    assert!(!report.coredump.has_coredump);
    assert_eq!(report.coredump.error, None);
}

#[test]
fn decoding_the_same_artifact_twice_is_byte_identical() {
    let encoded = base64::engine::general_purpose::STANDARD.encode(coredump_image());
    for raw in [charge_log(), debug_report(&encoded)] {
        let first = serde_json::to_vec(&decode_artifact(&raw).unwrap()).unwrap();
        let second = serde_json::to_vec(&decode_artifact(&raw).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
