//! Integration tests for `convoy addresses` — the address-list builder
//! exercised end-to-end against real keys files.

#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn convoy() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("convoy"));
    cmd.env("NO_COLOR", "1");
    cmd
}

fn write_keys(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("keys.json");
    std::fs::write(&path, content).expect("write keys file");
    path
}

fn addresses(keys_file: &Path) -> Command {
    let mut cmd = convoy();
    cmd.args(["addresses", "--keys-file"]).arg(keys_file);
    cmd
}

#[test]
fn test_two_addresses_render_as_bracketed_literal() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(
        &dir,
        r#"[{"address": "0xAAA", "private_key": "0x01"},
           {"address": "0xBBB", "private_key": "0x02"}]"#,
    );
    addresses(&path)
        .assert()
        .success()
        .stdout("[\"0xAAA\", \"0xBBB\"]\n");
}

#[test]
fn test_single_address_has_no_trailing_separator() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, r#"[{"address": "0x111"}]"#);
    addresses(&path).assert().success().stdout("[\"0x111\"]\n");
}

#[test]
fn test_empty_keys_file_prints_empty_brackets_and_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, "[]");
    addresses(&path).assert().success().stdout("[]\n");
}

#[test]
fn test_duplicate_addresses_are_preserved() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, r#"[{"address": "0xAAA"}, {"address": "0xAAA"}]"#);
    addresses(&path)
        .assert()
        .success()
        .stdout("[\"0xAAA\", \"0xAAA\"]\n");
}

#[test]
fn test_malformed_keys_file_fails_with_message() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, "not a record sequence");
    addresses(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a JSON array"));
}

#[test]
fn test_missing_keys_file_fails_with_message() {
    let dir = TempDir::new().expect("tempdir");
    addresses(&dir.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read keys file"));
}

#[test]
fn test_record_without_address_field_fails() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, r#"[{"private_key": "0x01"}]"#);
    addresses(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a JSON array"));
}

#[test]
fn test_json_flag_prints_plain_json_array() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, r#"[{"address": "0xAAA"}, {"address": "0xBBB"}]"#);
    let mut cmd = addresses(&path);
    cmd.arg("--json")
        .assert()
        .success()
        .stdout("[\"0xAAA\",\"0xBBB\"]\n");
}

#[test]
fn test_json_flag_emits_error_object_on_failure() {
    let dir = TempDir::new().expect("tempdir");
    let path = write_keys(&dir, "not json");
    let mut cmd = addresses(&path);
    cmd.arg("--json")
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""error": true"#))
        .stdout(predicate::str::contains(r#""code": "keys_error""#));
}

#[test]
fn test_default_keys_file_is_keys_json_in_cwd() {
    let dir = TempDir::new().expect("tempdir");
    write_keys(&dir, r#"[{"address": "0x222"}]"#);
    convoy()
        .arg("addresses")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout("[\"0x222\"]\n");
}
