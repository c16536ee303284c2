//! Integration tests for the `wlanprof` CLI binary.
//!
//! Every test works on a throwaway store under a temp directory and points
//! the config directories at a nonexistent path, so the user's real
//! profiles and configuration are never read or written.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

const HOME_KEY: &str = r#""home"WPA_PSK"#;

/// Build a [`Command`] for the `wlanprof` binary with env isolation.
fn wlanprof_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wlanprof");
    cmd.env("HOME", "/tmp/wlanprof-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wlanprof-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/wlanprof-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("WLANPROF_CONFIG")
        .env_remove("WLANPROF_STORE")
        .env_remove("WLANPROF_OUTPUT")
        .env_remove("WLANPROF_DEFAULTS_OUTPUT")
        .env_remove("WLANPROF_DEFAULTS_COLOR")
        .env_remove("WLANPROF_DEFAULTS_MASK");
    cmd
}

/// A command bound to `store`.
fn store_cmd(store: &Path) -> assert_cmd::Command {
    let mut cmd = wlanprof_cmd();
    cmd.arg("--store").arg(store);
    cmd
}

/// Temp dir holding a store with one WPA2 profile named `home`.
fn seeded_store() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("profiles.toml");
    store_cmd(&store)
        .args(["suggest", "--ssid", "home", "--wpa2-passphrase", "hunter22!", "--save"])
        .assert()
        .success();
    (dir, store)
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
    let output = wlanprof_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    wlanprof_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Wi-Fi network profiles")
            .and(predicate::str::contains("profiles"))
            .and(predicate::str::contains("suggest"))
            .and(predicate::str::contains("check")),
    );
}

#[test]
fn test_version_flag() {
    wlanprof_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wlanprof"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    wlanprof_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    wlanprof_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    wlanprof_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = wlanprof_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_security_type_value() {
    let dir = tempfile::tempdir().unwrap();
    let output = store_cmd(&dir.path().join("p.toml"))
        .args(["profiles", "add-security", "0", "wpa4"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unsupported_store_extension() {
    let dir = tempfile::tempdir().unwrap();
    let output = store_cmd(&dir.path().join("profiles.xml"))
        .args(["profiles", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("profiles.xml"), "Expected store path in:\n{text}");
}

// ── Profiles ────────────────────────────────────────────────────────

#[test]
fn test_list_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    store_cmd(&dir.path().join("profiles.toml"))
        .args(["profiles", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_suggest_save_then_list() {
    let (_dir, store) = seeded_store();
    assert!(store.exists());
    store_cmd(&store)
        .args(["profiles", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(HOME_KEY));
}

#[test]
fn test_show_by_network_id_redacts_passphrase() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "show", "0", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("home").and(predicate::str::contains("hunter22!").not()));
}

#[test]
fn test_show_detail_lists_security() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "show", HOME_KEY])
        .assert()
        .success()
        .stdout(predicate::str::contains("psk").and(predicate::str::contains("WPA_PSK")));
}

#[test]
fn test_show_missing_profile() {
    let (_dir, store) = seeded_store();
    let output = store_cmd(&store)
        .args(["profiles", "show", "42"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("profiles list"), "Expected help hint in:\n{text}");
}

#[test]
fn test_keys_include_data_usage_key() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "keys", "0", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wpa2-psk"));
}

#[test]
fn test_add_compatible_security_type() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "add-security", "0", "sae"])
        .assert()
        .success();
    store_cmd(&store)
        .args(["profiles", "show", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sae"));
}

#[test]
fn test_add_enterprise_to_personal_conflicts() {
    let (_dir, store) = seeded_store();
    let output = store_cmd(&store)
        .args(["profiles", "add-security", "0", "eap"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn test_add_duplicate_security_type_conflicts() {
    let (_dir, store) = seeded_store();
    let output = store_cmd(&store)
        .args(["profiles", "add-security", "0", "psk"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn test_set_security_rekeys_profile() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "set-security", HOME_KEY, "owe"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""home"OWE"#));
    store_cmd(&store)
        .args(["profiles", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(HOME_KEY).not());
}

#[test]
fn test_migrate_without_legacy_profiles() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "migrate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Migrated 0"));
}

#[test]
fn test_remove_requires_yes_when_not_a_tty() {
    let (_dir, store) = seeded_store();
    let output = store_cmd(&store)
        .args(["profiles", "remove", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--yes"), "Expected --yes hint in:\n{text}");
}

#[test]
fn test_remove_with_yes() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["profiles", "rm", "0", "--yes"])
        .assert()
        .success();
    store_cmd(&store)
        .args(["profiles", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

// ── Suggest ─────────────────────────────────────────────────────────

#[test]
fn test_suggest_two_credentials_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = store_cmd(&dir.path().join("p.toml"))
        .args([
            "suggest",
            "--ssid",
            "home",
            "--wpa2-passphrase",
            "hunter22!",
            "--wpa3-passphrase",
            "hunter22!",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_suggest_without_ssid_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = store_cmd(&dir.path().join("p.toml"))
        .args(["suggest", "--owe"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_suggest_without_save_leaves_store_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("p.json");
    store_cmd(&store)
        .args(["suggest", "--ssid", "cafe", "--owe", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""cafe"OWE"#));
    assert!(!store.exists());
}

#[test]
fn test_suggest_enterprise_redacts_password() {
    let dir = tempfile::tempdir().unwrap();
    store_cmd(&dir.path().join("p.toml"))
        .args([
            "suggest",
            "--ssid",
            "corp",
            "--eap",
            "peap",
            "--phase2",
            "mschapv2",
            "--identity",
            "alice",
            "--password",
            "s3cret-pass",
            "--ca-cert",
            "corp-ca",
            "--domain-suffix-match",
            "corp.example",
            "-o",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("alice").and(predicate::str::contains("s3cret-pass").not()));
}

// ── Check ───────────────────────────────────────────────────────────

#[test]
fn test_check_all_profiles() {
    let (_dir, store) = seeded_store();
    store_cmd(&store)
        .args(["check", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{HOME_KEY}\tusable")));
}

#[test]
fn test_check_missing_profile() {
    let (_dir, store) = seeded_store();
    let output = store_cmd(&store).args(["check", "nope"]).output().unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honors_flag() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    wlanprof_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wlanprof").join("config.toml");
    wlanprof_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(path.exists());

    wlanprof_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"defaults\"").and(predicate::str::contains("\"mask\"")));
}

#[test]
fn test_config_init_refuses_overwrite_without_yes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[defaults]\noutput = \"json\"\n").unwrap();
    let output = wlanprof_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(std::fs::read_to_string(&path).unwrap().contains("json"));
}

#[test]
fn test_config_default_output_applies() {
    let (dir, store) = seeded_store();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[defaults]\noutput = \"plain\"\n").unwrap();
    store_cmd(&store)
        .arg("--config")
        .arg(&config)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{HOME_KEY}\n")));
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[defaults]\noutput = \"xml\"\n").unwrap();
    let output = store_cmd(&dir.path().join("p.toml"))
        .arg("--config")
        .arg(&config)
        .args(["profiles", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("defaults.output"), "Expected field name in:\n{text}");
}
