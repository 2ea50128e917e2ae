//! Integration tests for the `vapix` CLI binary.
//!
//! Argument parsing, help output, completions and error handling run
//! without a camera; the end-to-end cases talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{basic_auth, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `vapix` binary with env isolation.
///
/// Clears all `VAPIX_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn vapix_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("vapix");
    cmd.env("HOME", "/tmp/vapix-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/vapix-cli-test-nonexistent")
        .env_remove("VAPIX_PROFILE")
        .env_remove("VAPIX_ENDPOINT")
        .env_remove("VAPIX_USERNAME")
        .env_remove("VAPIX_PASSWORD")
        .env_remove("VAPIX_OUTPUT")
        .env_remove("VAPIX_INSECURE")
        .env_remove("VAPIX_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// `vapix_cmd()` pointed at the mock camera with valid credentials.
fn camera_cmd(server_uri: &str) -> assert_cmd::Command {
    let mut cmd = vapix_cmd();
    cmd.args([
        "--endpoint",
        &format!("{server_uri}/axis-cgi"),
        "--username",
        "root",
        "--password",
        "pass",
    ]);
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = vapix_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    vapix_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("network camera")
            .and(predicate::str::contains("report"))
            .and(predicate::str::contains("params"))
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("image")),
    );
}

#[test]
fn test_version_flag() {
    vapix_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vapix"));
}

#[test]
fn test_completions_zsh() {
    vapix_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = vapix_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_no_endpoint_configured() {
    vapix_cmd()
        .arg("log")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No camera endpoint configured"));
}

#[test]
fn test_invalid_level() {
    let output = vapix_cmd()
        .args(["params", "--level", "superuser"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("possible values"), "got:\n{text}");
}

#[test]
fn test_invalid_endpoint_is_usage_error() {
    vapix_cmd()
        .args(["--endpoint", "ftp://cam", "--username", "root", "--password", "x", "log"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("endpoint"));
}

#[test]
fn test_missing_profile() {
    vapix_cmd()
        .args(["--profile", "lobby", "log"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'lobby' not found"));
}

#[test]
fn test_image_requires_out() {
    vapix_cmd()
        .args(["image"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--out"));
}

// ── Against a mock camera ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_params_json_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/axis-cgi/admin/param.cgi"))
        .and(basic_auth("root", "pass"))
        .and(query_param("group", "Network.RTSP"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("root.Network.RTSP.Port=554\nroot.Network.RTSP.Enabled=yes\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = camera_cmd(&server.uri());
    cmd.args(["-o", "json-compact", "params", "--group", "Network.RTSP"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        r#"{"Network.RTSP.Port":554,"Network.RTSP.Enabled":true}"#
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_report_section_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/axis-cgi/admin/serverreport.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "Report\n----- Uptime -----\n3 days\n----- Network Status -----\neth0 up\n",
        ))
        .mount(&server)
        .await;

    let mut cmd = camera_cmd(&server.uri());
    cmd.args(["report", "--section", "Network Status"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "eth0 up\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_device_error_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/axis-cgi/admin/param.cgi"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("# Error: Error -1 getting param\n"),
        )
        .mount(&server)
        .await;

    let mut cmd = camera_cmd(&server.uri());
    cmd.args(["params", "--group", "Nope"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("Error -1 getting param"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unsupported_endpoint_exit_code() {
    let server = MockServer::start().await;

    let mut cmd = camera_cmd(&server.uri());
    cmd.arg("users");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("admin/pwdgrp"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unauthorized_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/axis-cgi/admin/systemlog.cgi"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let mut cmd = camera_cmd(&server.uri());
    cmd.arg("log");
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_image_written_to_file() {
    let server = MockServer::start().await;
    let jpeg = b"\xff\xd8\xff\xe0fake\xff\xd9".to_vec();
    Mock::given(method("GET"))
        .and(path("/axis-cgi/jpg/image.cgi"))
        .and(query_param("resolution", "320x240"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(jpeg.clone(), "image/jpeg"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("snap.jpg");

    let mut cmd = camera_cmd(&server.uri());
    cmd.args(["image", "--resolution", "320x240", "--out"]).arg(&out);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(std::fs::read(&out).unwrap(), jpeg);
}

#[test]
fn test_profile_from_config_file() {
    // Port 9 (discard) refuses connections, so the run ends in a
    // connection error after the profile was resolved.
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("vapix");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "default_profile = \"gate\"\n\n[profiles.gate]\n\
         endpoint = \"http://127.0.0.1:9/axis-cgi\"\n\
         username = \"root\"\npassword = \"pass\"\n",
    )
    .unwrap();

    vapix_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .arg("log")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect to camera"));
}
