mod support;

use std::path::Path;
use std::process::{Command, Output};

use support::{StubServer, dir_entries, unique_temp_dir};

fn run_cli(config_path: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rpc2xlsx"))
        .arg("--config")
        .arg(config_path)
        .args(extra)
        .env("NO_PROXY", "127.0.0.1")
        .env("no_proxy", "127.0.0.1")
        .output()
        .expect("should run rpc2xlsx binary")
}

fn write_config(dir: &Path, endpoint: &str, extra: &str) -> std::path::PathBuf {
    std::fs::create_dir_all(dir).expect("should create temp dir");
    let path = dir.join("report.json");
    let config = format!(
        r#"{{
  "endpoint": "{endpoint}",
  "token": "cli-token",
  "output_dir": "{}"{extra}
}}"#,
        dir.join("out").display()
    );
    std::fs::write(&path, config).expect("should write config");
    path
}

#[test]
fn cli_writes_report_for_records_reply() {
    let temp = unique_temp_dir("rpc2xlsx_cli_ok");
    let server = StubServer::replying("200 OK", support::read_fixture_response("website"));
    let config = write_config(&temp, &server.url, "");

    let output = run_cli(
        &config,
        &["--query-file", "tests/fixtures/website/query.sql"],
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(stdout.contains("Total rows: 3"));

    let files = dir_entries(&temp.join("out"));
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("website_data_") && name.ends_with(".xlsx"), "{name}");

    let request = server.received_body();
    assert!(request.contains("\"method\":\"execute\""));
    assert!(request.contains("cli-token"));
}

#[test]
fn cli_exits_2_without_output_on_http_error() {
    let temp = unique_temp_dir("rpc2xlsx_cli_http_error");
    let server = StubServer::replying("500 Internal Server Error", "database offline");
    let config = write_config(&temp, &server.url, r#", "query": "SELECT a FROM t""#);

    let output = run_cli(&config, &[]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HTTP 500"), "stdout: {stdout}");
    assert!(stdout.contains("database offline"));
    assert!(dir_entries(&temp.join("out")).is_empty());
}

#[test]
fn cli_rejects_invalid_config_before_sending() {
    let temp = unique_temp_dir("rpc2xlsx_cli_bad_tz");
    let config = write_config(
        &temp,
        "http://127.0.0.1:9/sql",
        r#", "query": "SELECT a FROM t", "timezone": "Nowhere/Land""#,
    );

    let output = run_cli(&config, &[]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("unknown timezone 'Nowhere/Land'"), "stdout: {stdout}");
}

#[test]
fn cli_reports_missing_config_file() {
    let temp = unique_temp_dir("rpc2xlsx_cli_missing");
    let output = run_cli(&temp.join("absent.json"), &[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Error reading"));
}

#[test]
fn cli_reports_unreadable_query_file() {
    let temp = unique_temp_dir("rpc2xlsx_cli_query_file");
    let config = write_config(&temp, "http://127.0.0.1:9/sql", "");
    let query_file = temp.join("missing.sql").display().to_string();

    let output = run_cli(&config, &["--query-file", query_file.as_str()]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error reading"), "stdout: {stdout}");
    assert!(stdout.contains("missing.sql"));
    assert!(dir_entries(&temp.join("out")).is_empty());
}
