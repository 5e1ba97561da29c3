#![cfg(feature = "cli")]

use std::process::{Command, Output};

fn httpbridge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_httpbridge"))
        .env_remove("HTTPBRIDGE_APP_ID")
        .args(["--log-level", "error"])
        .args(args)
        .output()
        .expect("httpbridge should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be json")
}

#[test]
fn encode_time_request_raw_wire() {
    let output = httpbridge(&["--format", "raw", "encode", "time"]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "01f5ff000002010001");
}

#[test]
fn encode_http_get_json() {
    let output = httpbridge(&[
        "--format",
        "json",
        "encode",
        "--app-id",
        "0x2a",
        "http-get",
        "--url",
        "http://example.com/",
        "--request-id",
        "9",
    ]);

    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["request"], "http-get");
    let tuples = payload["tuples"].as_array().expect("tuples array");
    let names: Vec<&str> = tuples
        .iter()
        .map(|t| t["name"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(names, ["URL", "REQUEST_ID", "APP_ID"]);
    assert_eq!(tuples[1]["value"]["int32"], 9);
    assert_eq!(tuples[2]["value"]["int32"], 42);
}

#[test]
fn encode_overflow_is_invalid_data() {
    let long_url = format!("http://example.com/{}", "a".repeat(300));
    let output = httpbridge(&[
        "encode",
        "http-get",
        "--url",
        &long_url,
        "--request-id",
        "1",
    ]);

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("code 8192"));
}

#[test]
fn encode_cookie_set_hex_value() {
    let output = httpbridge(&[
        "--format",
        "json",
        "encode",
        "cookie-set",
        "--request-id",
        "3",
        "--key",
        "100",
        "--hex",
        "beef",
    ]);

    assert!(output.status.success());
    let payload = stdout_json(&output);
    let tuples = payload["tuples"].as_array().expect("tuples array");
    assert_eq!(tuples.len(), 3);
    assert_eq!(tuples[2]["key"], 100);
    assert_eq!(tuples[2]["type"], "bytes");
}

#[test]
fn decode_http_success() {
    let json = r#"[
        {"key": 65535, "value": {"uint8": 1}},
        {"key": 65534, "value": {"int16": 200}},
        {"key": 65532, "value": {"int32": 5}},
        {"key": 65522, "value": {"int32": 7}}
    ]"#;
    let output = httpbridge(&["--format", "json", "decode", "--app-id", "7", "--json", json]);

    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["kind"], "http_success");
    assert_eq!(payload["callbacks"][0]["callback"], "success");
    assert_eq!(payload["callbacks"][0]["args"]["status"], "200");
}

#[test]
fn decode_wrong_app_is_dropped() {
    let json = r#"[{"key": 65520, "value": {"int32": 1}}, {"key": 65522, "value": {"int32": 8}}]"#;
    let output = httpbridge(&["--format", "json", "decode", "--app-id", "7", "--json", json]);

    assert_eq!(output.status.code(), Some(1));
    let payload = stdout_json(&output);
    assert!(payload["dropped"]
        .as_str()
        .unwrap_or_default()
        .contains("mismatch"));
    assert_eq!(payload["callbacks"].as_array().map(Vec::len), Some(0));
}

#[test]
fn decode_wire_reconnect() {
    // CONNECT = 1 (uint8)
    let output = httpbridge(&["--format", "pretty", "decode", "--wire", "01fbff000002010001"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("kind=reconnect"));
}

#[test]
fn decode_rejects_bad_json() {
    let output = httpbridge(&["decode", "--json", "{not json"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn decode_rejects_malformed_wire_hex() {
    let output = httpbridge(&["decode", "--wire", "zz"]);
    assert_eq!(output.status.code(), Some(64));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--wire"));
}

#[test]
fn encode_rejects_odd_length_hex_value() {
    let output = httpbridge(&[
        "encode",
        "cookie-set",
        "--request-id",
        "1",
        "--key",
        "7",
        "--hex",
        "abc",
    ]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn keys_lists_reserved_table() {
    let output = httpbridge(&["--format", "json", "keys"]);

    assert!(output.status.success());
    let payload = stdout_json(&output);
    let rows = payload.as_array().expect("keys array");
    assert_eq!(rows.len(), 18);
    assert_eq!(rows[0]["name"], "URL");
    assert_eq!(rows[0]["hex"], "0xffff");
}

#[test]
fn version_reports_package_version() {
    let output = httpbridge(&["version"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("httpbridge {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_as_json() {
    let output = httpbridge(&["--format", "json", "version", "--extended"]);

    assert!(output.status.success());
    let payload = stdout_json(&output);
    assert_eq!(payload["name"], "httpbridge");
    assert_eq!(payload["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(payload["outbound_capacity"], 256);
    assert_eq!(payload["reserved_keys"], "0xffe0..=0xffff");
    assert_eq!(payload["reserved_key_count"], 18);
}
