//! Integration tests for the `zonesmith` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! config handling, and a full generate run against a mock NetBox — no
//! live instance required.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path as url_path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `zonesmith` binary with env isolation.
///
/// Runs in `dir`, points HOME and XDG config at it, and clears all
/// `ZONESMITH_*` env vars so tests never touch the user's real
/// configuration.
fn zonesmith_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("zonesmith");
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("ZONESMITH_NETBOX__URL")
        .env_remove("ZONESMITH_NETBOX__TOKEN")
        .env_remove("ZONESMITH_OUTPUT__ROOT")
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let dir = TempDir::new().unwrap();
    let output = zonesmith_cmd(dir.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let dir = TempDir::new().unwrap();
    zonesmith_cmd(dir.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("generate")
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    zonesmith_cmd(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zonesmith"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    zonesmith_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let dir = TempDir::new().unwrap();
    zonesmith_cmd(dir.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let dir = TempDir::new().unwrap();
    let output = zonesmith_cmd(dir.path()).arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let dir = TempDir::new().unwrap();
    let output = zonesmith_cmd(dir.path())
        .args(["--output", "invalid", "generate"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error mentioning the invalid format:\n{text}"
    );
}

#[test]
fn test_invalid_generator_selection() {
    let dir = TempDir::new().unwrap();
    let output = zonesmith_cmd(dir.path())
        .args(["generate", "--only", "bogus"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for unknown generator"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid"),
        "Expected error listing valid generators:\n{text}"
    );
}

#[test]
fn test_generate_without_config_fails_with_usage_code() {
    let dir = TempDir::new().unwrap();
    let output = zonesmith_cmd(dir.path()).arg("generate").output().unwrap();
    assert_eq!(
        output.status.code(),
        Some(2),
        "Expected the usage/config exit code"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("netbox.url"),
        "Expected a netbox.url validation error:\n{text}"
    );
}

// ── Config subcommands ──────────────────────────────────────────────

#[test]
fn test_config_path_prefers_local_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("zonesmith.toml"), "[netbox]\n").unwrap();

    zonesmith_cmd(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zonesmith.toml"));
}

#[test]
fn test_config_path_honors_override() {
    let dir = TempDir::new().unwrap();
    zonesmith_cmd(dir.path())
        .args(["--config", "custom-config.toml", "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("custom-config.toml"));
}

#[test]
fn test_config_show_without_file_succeeds() {
    // No file anywhere — show renders the defaults.
    let dir = TempDir::new().unwrap();
    zonesmith_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[netbox]"));
}

#[test]
fn test_config_show_redacts_the_token() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("zonesmith.toml"),
        "[netbox]\nurl = \"https://netbox.example.net\"\ntoken = \"secret-token-123\"\n",
    )
    .unwrap();

    zonesmith_cmd(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("<redacted>")
                .and(predicate::str::contains("secret-token-123").not()),
        );
}

#[test]
fn test_config_init_writes_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("fresh.toml");
    let config_arg = config_path.display().to_string();

    zonesmith_cmd(dir.path())
        .args(["--config", &config_arg, "config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote starter config"));
    assert!(config_path.exists());

    // A second init must not clobber the file without --force.
    let output = zonesmith_cmd(dir.path())
        .args(["--config", &config_arg, "config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("already exists"));

    zonesmith_cmd(dir.path())
        .args(["--config", &config_arg, "config", "init", "--force"])
        .assert()
        .success();
}

// ── End-to-end generate ─────────────────────────────────────────────

async fn mock_netbox() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(url_path("/api/ipam/prefixes/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 1,
                "prefix": "10.1.20.0/24",
                "tags": [
                    {"name": "nx:dns:enable[true]"},
                    {"name": "nx:dns:forward_zone[peg.nu]"},
                ],
            }],
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(url_path("/api/ipam/ip-addresses/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{
                "id": 11,
                "address": "10.1.20.11/24",
                "dns_name": "vm-ns-1",
                "tags": [],
            }],
        })))
        .mount(&server)
        .await;

    server
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_generate_runs_against_mock_netbox() {
    let server = mock_netbox().await;
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("zonesmith.toml"),
        format!(
            "[netbox]\n\
             url = \"{}\"\n\
             token = \"test-token\"\n\n\
             [output]\n\
             root = \"out\"\n\n\
             [[dns.servers]]\n\
             name = \"ns1.peg.nu\"\n\
             ip = \"203.0.113.1\"\n\
             dotted_email = \"hostmaster\\\\.peg.nu\"\n\
             zones = [\"peg.nu\"]\n",
            server.uri()
        ),
    )
    .unwrap();

    // First run creates the zone file and the server config.
    zonesmith_cmd(dir.path())
        .args(["generate", "-o", "plain", "--serial", "2024010100"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("peg.nu.db")
                .and(predicate::str::contains("ns1.peg.nu.conf")),
        );

    let zone = std::fs::read_to_string(dir.path().join("out/zones/peg.nu.db")).unwrap();
    assert!(zone.contains("  2024010100  ; serial"));
    assert!(zone.contains("vm-ns-1  IN  A  10.1.20.11"));

    // Unchanged inventory: the second run rewrites nothing.
    zonesmith_cmd(dir.path())
        .args(["generate", "-o", "plain", "--serial", "2024010100"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Everything up to date"));

    // --output-dir redirects the whole tree.
    zonesmith_cmd(dir.path())
        .args([
            "generate",
            "-o",
            "plain",
            "--serial",
            "2024010100",
            "--output-dir",
            "elsewhere",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("elsewhere"));
    assert!(dir.path().join("elsewhere/zones/peg.nu.db").exists());
}
