//! Integration tests for the `routerlab` CLI binary.
//!
//! Every test runs against an isolated HOME/XDG config directory, so the
//! built-in three-router inventory is used unless a test passes its own.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `routerlab` binary with env isolation.
fn routerlab_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("routerlab");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("ROUTERLAB_CONFIG")
        .env_remove("ROUTERLAB_INVENTORY")
        .env_remove("ROUTERLAB_OUTPUT")
        .env_remove("ROUTERLAB_SIMULATION__RESTART_DELAY_MS")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn write_inventory(dir: &Path, body: &str) -> std::path::PathBuf {
    let path = dir.join("inventory.json");
    std::fs::write(&path, body).unwrap();
    path
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = home();
    let output = routerlab_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    let home = home();
    routerlab_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("list")
            .and(predicate::str::contains("restart"))
            .and(predicate::str::contains("ping"))
            .and(predicate::str::contains("topology")),
    );
}

#[test]
fn test_completions_zsh() {
    let home = home();
    routerlab_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Listing ─────────────────────────────────────────────────────────

#[test]
fn test_list_default_inventory() {
    let home = home();
    routerlab_cmd(&home)
        .args(["list", "--color", "never"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("10.0.0.1:22")
                .and(predicate::str::contains("unauthorized"))
                .and(predicate::str::contains("pending"))
                .and(predicate::str::contains("green")),
        );
}

#[test]
fn test_list_plain_preserves_order() {
    let home = home();
    routerlab_cmd(&home)
        .args(["list", "-o", "plain"])
        .assert()
        .success()
        .stdout("R1\nR2\nR3\n");
}

#[test]
fn test_list_json() {
    let home = home();
    let output = routerlab_cmd(&home)
        .args(["list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let routers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let routers = routers.as_array().unwrap();
    assert_eq!(routers.len(), 3);
    assert_eq!(routers[1]["status"], "unauthorized");
    assert_eq!(routers[0]["interfaces"]["Gig0/0"], "down");
}

#[test]
fn test_custom_inventory() {
    let home = home();
    let inventory = write_inventory(
        home.path(),
        r#"[{"id": "edge", "ip": "192.0.2.1", "port": "830", "status": "connected"}]"#,
    );
    routerlab_cmd(&home)
        .args(["list", "-o", "plain", "--inventory"])
        .arg(&inventory)
        .assert()
        .success()
        .stdout("edge\n");
}

#[test]
fn test_duplicate_inventory_rejected() {
    let home = home();
    let inventory = write_inventory(
        home.path(),
        r#"[{"id": "R1", "ip": "10.0.0.1", "port": 22, "status": "connected"},
            {"id": "R1", "ip": "10.0.0.9", "port": 22, "status": "connected"}]"#,
    );
    routerlab_cmd(&home)
        .arg("list")
        .arg("--inventory")
        .arg(&inventory)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("duplicate"));
}

#[test]
fn test_show_unknown_router() {
    let home = home();
    routerlab_cmd(&home)
        .args(["show", "R9"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("R9"));
}

#[test]
fn test_show_detail() {
    let home = home();
    routerlab_cmd(&home)
        .args(["show", "R2"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("10.0.0.2:22")
                .and(predicate::str::contains("Gig0/2 down")),
        );
}

// ── Simulated actions ───────────────────────────────────────────────

#[test]
fn test_view_logs_address_and_status() {
    let home = home();
    routerlab_cmd(&home)
        .args(["view", "R1"])
        .assert()
        .success()
        .stdout("R1: IP=10.0.0.1 Port=22 Status=connected\n");
}

#[test]
fn test_connect() {
    let home = home();
    routerlab_cmd(&home)
        .args(["connect", "R2"])
        .assert()
        .success()
        .stdout("R2: Simulating connect...\n");
}

#[test]
fn test_restart_waits_for_completion() {
    let home = home();
    routerlab_cmd(&home)
        .args(["restart", "R1", "--restart-delay-ms", "20"])
        .assert()
        .success()
        .stdout("R1: Restart command simulated\nR1: Restart complete\n");
}

#[test]
fn test_restart_no_wait() {
    let home = home();
    let output = routerlab_cmd(&home)
        .args(["restart", "R3", "--no-wait", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["result"]["status"], "restarting (sim)");
    assert_eq!(report["log"], serde_json::json!(["R3: Restart command simulated"]));
}

#[test]
fn test_interfaces_listing_and_toggle() {
    let home = home();
    routerlab_cmd(&home)
        .args(["interfaces", "R1"])
        .assert()
        .success()
        .stdout("R1: Interfaces => Gig0/0, Gig0/1, Gig0/2 (simulated)\n");

    routerlab_cmd(&home)
        .args(["interfaces", "R1", "--toggle", "Gig0/1"])
        .assert()
        .success()
        .stdout("R1: Interface Gig0/1 set to up\n");
}

#[test]
fn test_toggle_unknown_interface() {
    let home = home();
    routerlab_cmd(&home)
        .args(["interfaces", "R1", "--toggle", "Eth9"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Eth9"));
}

#[test]
fn test_bgp() {
    let home = home();
    routerlab_cmd(&home)
        .args(["bgp", "R1", "10.1.1.1", "AS65001"])
        .assert()
        .success()
        .stdout("R1: BGP neighbor set to 10.1.1.1 AS65001\n");
}

#[test]
fn test_bgp_invalid_ip() {
    let home = home();
    routerlab_cmd(&home)
        .args(["bgp", "R1", "not-an-ip", "65001"])
        .assert()
        .code(2);
}

#[test]
fn test_ping_fails_when_target_unauthorized() {
    let home = home();
    routerlab_cmd(&home)
        .args(["ping", "R1", "R2"])
        .assert()
        .code(1)
        .stdout("Pinging from R1 to R2...\nPing failed (simulated)\n");
}

#[test]
fn test_ping_succeeds_between_connected_routers() {
    let home = home();
    routerlab_cmd(&home)
        .args(["ping", "R1", "R1"])
        .assert()
        .success()
        .stdout("Pinging from R1 to R1...\nPing successful!\n");
}

#[test]
fn test_fleet_actions() {
    let home = home();
    routerlab_cmd(&home)
        .arg("connect-all")
        .assert()
        .success()
        .stdout("All routers set to connected (simulated)\n");
    routerlab_cmd(&home)
        .arg("simulate-failure")
        .assert()
        .success()
        .stdout("All routers set to unauthorized (simulated ODL failure)\n");
}

#[test]
fn test_topology_json() {
    let home = home();
    let output = routerlab_cmd(&home)
        .args(["topology", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let topo: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(topo["nodes"].as_array().unwrap().len(), 4);
    assert_eq!(topo["edges"].as_array().unwrap().len(), 4);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_defaults() {
    let home = home();
    routerlab_cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restart_delay_ms = 2000"));
}

#[test]
fn test_config_init_then_conflict() {
    let home = home();
    let path = home.path().join("lab.toml");

    routerlab_cmd(&home)
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    routerlab_cmd(&home)
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .code(6);

    routerlab_cmd(&home)
        .args(["config", "init", "--force", "--config"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn test_config_file_sets_restart_delay() {
    let home = home();
    let path = home.path().join("lab.toml");
    std::fs::write(&path, "[simulation]\nrestart_delay_ms = 0\n").unwrap();
    routerlab_cmd(&home)
        .args(["list", "--config"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("restart_delay_ms"));
}

#[test]
fn test_restart_delay_flag_overrides_invalid_file() {
    let home = home();
    let path = home.path().join("lab.toml");
    std::fs::write(&path, "[simulation]\nrestart_delay_ms = 0\n").unwrap();
    routerlab_cmd(&home)
        .args(["list", "-o", "plain", "--restart-delay-ms", "500", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout("R1\nR2\nR3\n");
}

#[test]
fn test_restart_delay_flag_overrides_invalid_env() {
    let home = home();
    routerlab_cmd(&home)
        .env("ROUTERLAB_SIMULATION__RESTART_DELAY_MS", "0")
        .args(["restart", "R1", "--restart-delay-ms", "10"])
        .assert()
        .success()
        .stdout("R1: Restart command simulated\nR1: Restart complete\n");
}
