#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

fn skytraq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_skytraq"))
        .arg("--log-level")
        .arg("error")
        .args(args)
        .output()
        .expect("skytraq should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout should be utf-8")
}

fn temp_file(tag: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "skytraq-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::write(&path, contents).expect("temp file should be writable");
    path
}

#[test]
fn encode_query_software_version_prints_frame_hex() {
    let output = skytraq(&[
        "--format",
        "json",
        "encode",
        "query-software-version",
        "--software-type",
        "0",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(value["id"], 2);
    assert_eq!(value["name"], "Query software version");
    assert_eq!(value["hex"], "a0a100020200020d0a");
}

#[test]
fn encode_configure_datum_fills_reference_values() {
    let output = skytraq(&["--format", "json", "encode", "configure-datum", "19"]);
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_str(stdout(&output).trim()).expect("stdout should be JSON");
    assert_eq!(
        value["hex"],
        "a0a1001329001307ff7aff97fed9007ddf390046f41000ce0d0a"
    );
    assert_eq!(value["fields"][0]["display"], "Arc 1950 (19)");
}

#[test]
fn encode_rejects_unsupported_update_rate() {
    let output = skytraq(&["encode", "configure-update-rate", "3"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn decode_ack_prints_summary() {
    let output = skytraq(&["--format", "pretty", "decode", "a0a100028302810d0a"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        "GPS acknowledges 'Query software version' (0x02)"
    );
}

#[test]
fn decode_bad_checksum_is_invalid_data() {
    let output = skytraq(&["decode", "a0a100028302800d0a"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_capture_file_interprets_every_line() {
    let mut capture = b"$GPGLL,,,,,,V,N*64\r\n".to_vec();
    capture.extend_from_slice(&[0xA0, 0xA1, 0x00, 0x02, 0x86, 0x0A, 0x8C, 0x0D, 0x0A]);
    capture.extend_from_slice(&[0xA0, 0xA1, 0x00, 0x02, 0x84, 0x05, 0x81, 0x0D, 0x0A]);
    let path = temp_file("capture", &capture);

    let output = skytraq(&[
        "--format",
        "pretty",
        "decode",
        "--nmea",
        "--file",
        path.to_str().expect("temp path should be utf-8"),
    ]);
    let _ = std::fs::remove_file(&path);
    assert!(output.status.success());

    let lines: Vec<String> = stdout(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "$GPGLL,,,,,,V,N*64",
            "GPS update rate is 10 Hz",
            "GPS rejects 'Configure serial port' (0x05)",
        ]
    );
}

#[test]
fn version_prints_package_version() {
    let output = skytraq(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output).trim(),
        format!("skytraq {}", env!("CARGO_PKG_VERSION"))
    );
}
