//! Integration tests for CLI commands.

use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const ED25519_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
const ED25519_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

fn make_order() -> serde_json::Value {
    json!({
        "version": "1.0",
        "out_trade_no": "T20201214001",
        "pay_amount": 23,
        "currency": "CNY",
        "app_id": "m1001",
        "sign": "ignored",
        "time": "2020-12-14T13:03:35.025484056+08:00"
    })
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    path
}

fn write_config(dir: &TempDir) -> String {
    let config = format!(
        "merchants:\n  m1001:\n    sign_type: ED25519\n    md5_key: md5-secret\n    ed25519_public_key: {}\npolicy:\n  sort_keys: false\n",
        ED25519_PUBLIC
    );
    let path = write_file(dir, "paygate.yaml", &config);
    format!("file://{}", path.display())
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_paygate"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn sign_file(order_path: &str, sign_type: &str, key: &str) -> serde_json::Value {
    let (success, stdout, stderr) = run_cli(&[
        "sign",
        order_path,
        "--sign-type",
        sign_type,
        "--key",
        key,
        "--attach",
    ]);
    assert!(success, "sign failed: {}", stderr);
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_canonicalize_command() {
    let dir = TempDir::new().unwrap();
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let (success, stdout, _) = run_cli(&["canonicalize", order.to_str().unwrap()]);
    assert!(success);
    assert_eq!(
        stdout.trim(),
        "app_id=m1001&currency=CNY&out_trade_no=T20201214001&pay_amount=23&time=2020-12-14T05:03:35.025484056Z&version=1.0"
    );
}

#[test]
fn test_canonicalize_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_paygate"))
        .arg("canonicalize")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"version":"1.0","pay_amount":0,"sign":"x"}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "version=1.0");
}

#[test]
fn test_canonicalize_with_configured_policy() {
    let dir = TempDir::new().unwrap();
    let url = write_config(&dir);
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let (success, stdout, _) = run_cli(&[
        "canonicalize",
        order.to_str().unwrap(),
        "--config-url",
        &url,
    ]);
    assert!(success);
    assert!(stdout.starts_with("version=1.0&out_trade_no=T20201214001&pay_amount=23"));
}

#[test]
fn test_sign_prints_bare_signature() {
    let dir = TempDir::new().unwrap();
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let (success, stdout, _) = run_cli(&[
        "sign",
        order.to_str().unwrap(),
        "--sign-type",
        "md5",
        "--key",
        "md5-secret",
    ]);
    assert!(success);
    let sig = stdout.trim();
    assert_eq!(sig.len(), 32);
    assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}

#[test]
fn test_sign_then_verify_ed25519() {
    let dir = TempDir::new().unwrap();
    let url = write_config(&dir);
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let signed = sign_file(order.to_str().unwrap(), "ED25519", ED25519_SEED);
    assert_ne!(signed["sign"], "ignored");

    let signed_path = write_file(&dir, "signed.json", &signed.to_string());
    let (success, stdout, stderr) = run_cli(&[
        "verify",
        signed_path.to_str().unwrap(),
        "--config-url",
        &url,
        "--json",
    ]);
    assert!(success, "verify failed: {}", stderr);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["ok"], true);
    assert_eq!(parsed["app_id"], "m1001");
}

#[test]
fn test_verify_rejects_tampered_order() {
    let dir = TempDir::new().unwrap();
    let url = write_config(&dir);
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let mut signed = sign_file(order.to_str().unwrap(), "ED25519", ED25519_SEED);
    signed["pay_amount"] = json!(24);

    let signed_path = write_file(&dir, "tampered.json", &signed.to_string());
    let (success, stdout, stderr) = run_cli(&[
        "verify",
        signed_path.to_str().unwrap(),
        "--config-url",
        &url,
    ]);
    assert!(!success);
    assert!(stdout.contains("VERDICT"));
    assert!(stderr.contains("signature mismatch"));
}

#[test]
fn test_verify_with_declared_md5() {
    let dir = TempDir::new().unwrap();
    let url = write_config(&dir);
    let mut order = make_order();
    order["sign_type"] = json!("MD5");
    let order = write_file(&dir, "order.json", &order.to_string());
    let signed = sign_file(order.to_str().unwrap(), "MD5", "md5-secret");

    let signed_path = write_file(&dir, "signed.json", &signed.to_string());
    let (success, _, stderr) = run_cli(&[
        "verify",
        signed_path.to_str().unwrap(),
        "--config-url",
        &url,
    ]);
    assert!(success, "verify failed: {}", stderr);
}

#[test]
fn test_verify_unknown_backend() {
    let dir = TempDir::new().unwrap();
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let (success, _, stderr) = run_cli(&[
        "verify",
        order.to_str().unwrap(),
        "--config-url",
        "etcd://localhost:2379/paygate",
    ]);
    assert!(!success);
    assert!(stderr.contains("Error"));
    assert!(stderr.contains("unknown config backend"));
}

#[test]
fn test_invalid_json_and_key() {
    let dir = TempDir::new().unwrap();
    let bad = write_file(&dir, "bad.json", "{not json");
    let (success, _, stderr) = run_cli(&["canonicalize", bad.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Invalid order JSON"));

    let order = write_file(&dir, "order.json", &make_order().to_string());
    let (success, _, stderr) = run_cli(&[
        "sign",
        order.to_str().unwrap(),
        "--sign-type",
        "ED25519",
        "--key",
        "abcd",
    ]);
    assert!(!success);
    assert!(stderr.contains("Invalid key"));
}

#[test]
fn test_malformed_time_fails_canonicalize() {
    let dir = TempDir::new().unwrap();
    let mut order = make_order();
    order["time"] = json!("yesterday");
    let order = write_file(&dir, "order.json", &order.to_string());
    let (success, _, stderr) = run_cli(&["canonicalize", order.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Error"));
}

#[test]
fn test_missing_input_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.json");
    let (success, _, stderr) = run_cli(&["canonicalize", missing.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Error: Failed to read"));
    assert!(stderr.contains("absent.json"));
}

#[test]
fn test_debug_log_level_traces_commands() {
    let dir = TempDir::new().unwrap();
    let order = write_file(&dir, "order.json", &make_order().to_string());
    let (success, stdout, stderr) = run_cli(&[
        "--log-level",
        "debug",
        "sign",
        order.to_str().unwrap(),
        "--sign-type",
        "MD5",
        "--key",
        "md5-secret",
    ]);
    assert!(success);
    assert_eq!(stdout.trim().len(), 32);
    assert!(stderr.contains("order signed"));
}
