//! Result logs produced by a full sweep.

mod common;

use baudsweep::port::MockDevice;
use baudsweep::report::{LogFileReporter, LogFormat};
use baudsweep::sweep::{CancelFlag, Fanout, Sweeper};
use common::{fast_plan_with_commands, RecordingReporter};
use std::fs;

fn sweep_to_log(device: &MockDevice, format: LogFormat) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sweep.log");

    let log = LogFileReporter::create(&path, format).unwrap();
    let mut reporter = Fanout::new()
        .with(Box::new(RecordingReporter::new()))
        .with(Box::new(log));

    Sweeper::new(fast_plan_with_commands(&[1200, 4800, 9600, 19200], &["AT\\r"])).run(
        device.connect(),
        &mut reporter,
        &CancelFlag::new(),
    );
    drop(reporter);

    fs::read_to_string(&path).unwrap()
}

fn scripted_device() -> MockDevice {
    let device = MockDevice::new("MOCK0");
    device.reply_at(19200, b"OK\r\n");
    device.reply_at(4800, b"\x01\x02\x03");
    device.reject_baud(1200, "Invalid argument");
    device
}

#[test]
fn test_text_log_has_header_and_blocks() {
    let text = sweep_to_log(&scripted_device(), LogFormat::Text);

    let header = text.lines().next().unwrap();
    assert!(header.starts_with("baudsweep results - "));
    assert!(header.contains("port MOCK0"));

    assert!(text.contains("baud 19200\n  result: ASCII\n  hex:    4F 4B 0D 0A\n"));
    assert!(text.contains("baud 4800\n  result: Non-ASCII\n  hex:    01 02 03\n"));
    assert!(text.contains("baud 1200\n  result: ERROR: "));
    // Silent candidates are not logged.
    assert!(!text.contains("baud 9600"));
    assert!(text.contains("tested 4, ascii 1, non-ascii 1, errors 1, silent 1"));
}

#[test]
fn test_json_log_is_one_record_per_line() {
    let text = sweep_to_log(&scripted_device(), LogFormat::Json);
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    // start, three non-silent outcomes, summary
    assert_eq!(records.len(), 5);
    assert_eq!(records[0]["event"], "start");
    assert_eq!(records[0]["candidates"], 4);

    let outcomes: Vec<(&str, u64)> = records[1..4]
        .iter()
        .map(|r| (r["outcome"].as_str().unwrap(), r["baud"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        outcomes,
        vec![("failed", 1200), ("response", 4800), ("response", 19200)]
    );

    let summary = &records[4];
    assert_eq!(summary["event"], "summary");
    assert_eq!(summary["tested"], 4);
    assert_eq!(summary["non_ascii_bauds"][0], 4800);
    assert_eq!(summary["interrupted"], false);
}

#[test]
fn test_log_creation_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("sweep.log");
    assert!(LogFileReporter::create(&path, LogFormat::Text).is_err());
}
