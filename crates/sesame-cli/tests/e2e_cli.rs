//! E2E integration tests for the `sesame` binary.
//!
//! Logins run with `--dry-run` so no real broker is needed. Results go to
//! stdout; tracing and errors go to stderr.

mod common;

use common::{sesame_cmd, sesame_cmd_raw, Fixture};
use predicates::prelude::PredicateBooleanExt;
use predicates::str::{contains, is_empty};

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .expect("utf8 stdout")
        .lines()
        .map(str::to_string)
        .collect()
}

// ─── login ─────────────────────────────────────────────────────────

#[test]
fn dry_run_login_prints_sid_and_grants() {
    let fixture = Fixture::new(&[]);
    let output = sesame_cmd(&fixture)
        .args(["login", "alice", "--dry-run"])
        .output()
        .expect("run sesame");

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3, "got: {lines:?}");
    assert_eq!(lines[0].len(), 32);
    assert_eq!(
        lines[1],
        r#"{"scope":"ubus","objects":[["system","reboot"],["system","info"]]}"#
    );
    assert_eq!(lines[2], r#"{"scope":"luci-ui","objects":[["admins","write"]]}"#);
}

#[test]
fn dry_run_login_flat_scope() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["login", "bob", "--dry-run"])
        .assert()
        .success()
        .stdout(contains(
            r#"{"scope":"uci","objects":[["network","read"],["wireless","read"]]}"#,
        ))
        .stdout(contains(r#"{"scope":"luci-ui","objects":[["ops","read"]]}"#))
        .stdout(contains("ubus").not());
}

#[test]
fn unknown_user_is_denied() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["login", "mallory", "--dry-run"])
        .assert()
        .failure()
        .code(1)
        .stdout(is_empty())
        .stderr(contains("PROVISION_DENIED"))
        .stderr(contains("mallory"));
}

#[test]
fn root_gets_everything() {
    let fixture = Fixture::new(&[]);
    let output = sesame_cmd(&fixture)
        .args(["login", "root", "--dry-run"])
        .output()
        .expect("run sesame");

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 5);
}

#[test]
fn broken_acl_file_is_skipped_with_warning() {
    let fixture = Fixture::new(&[("15-broken.json", "{ nope")]);
    let output = sesame_cmd(&fixture)
        .args(["login", "root", "--dry-run"])
        .output()
        .expect("run sesame");

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 5);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("15-broken.json"), "stderr: {stderr}");
}

#[test]
fn unreachable_ubus_fails_login() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .env("SESAME_UBUS_PATH", "/nonexistent/sesame/ubus")
        .args(["login", "alice"])
        .assert()
        .failure()
        .stdout(is_empty())
        .stderr(contains("PROVISION_BROKER_UNAVAILABLE"));
}

#[test]
fn debug_flag_logs_stages() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["-d", "login", "bob", "--dry-run"])
        .assert()
        .success()
        .stderr(contains("authorize_gate"))
        .stderr(contains("acl_scan"))
        .stderr(contains("Session created"));
}

// ─── acls ──────────────────────────────────────────────────────────

#[test]
fn acls_lists_groups() {
    let fixture = Fixture::new(&[(
        "30-more.json",
        r#"{"ops": {"write": {"uci": ["network"]}}, "bare": {}}"#,
    )]);
    let output = sesame_cmd(&fixture)
        .arg("acls")
        .output()
        .expect("run sesame");

    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            "admins\twrite\tAdministration",
            "ops\tread,write\tOperations",
            "bare\t-\t-",
        ]
    );
}

#[test]
fn acls_with_missing_directory_is_empty() {
    sesame_cmd_raw()
        .args(["--acl-dir", "/nonexistent/sesame/acl.d", "acls"])
        .assert()
        .success()
        .stdout(is_empty());
}

// ─── check ─────────────────────────────────────────────────────────

#[test]
fn check_write_implies_read() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["check", "alice", "read", "admins"])
        .assert()
        .success()
        .stdout("allowed\n");
}

#[test]
fn check_read_does_not_imply_write() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["check", "bob", "write", "ops"])
        .assert()
        .failure()
        .stdout("denied\n");
}

#[test]
fn check_root_without_policy() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["check", "root", "write", "anything"])
        .assert()
        .success()
        .stdout("allowed\n");
}

#[test]
fn check_rejects_unknown_permission() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .args(["check", "alice", "admin", "admins"])
        .assert()
        .failure()
        .code(2);
}

// ─── config ────────────────────────────────────────────────────────

#[test]
fn config_file_supplies_directories() {
    let fixture = Fixture::new(&[]);
    let config = fixture.root.path().join("sesame.toml");
    std::fs::write(
        &config,
        format!(
            "[paths]\nacl_dir = {:?}\nuci_dir = {:?}\n",
            fixture.acl_dir(),
            fixture.uci_dir()
        ),
    )
    .expect("write config");

    sesame_cmd_raw()
        .arg("--config")
        .arg(&config)
        .args(["check", "bob", "read", "ops"])
        .assert()
        .success()
        .stdout("allowed\n");
}

#[test]
fn invalid_config_file_is_an_error() {
    let fixture = Fixture::new(&[]);
    let config = fixture.root.path().join("bad.toml");
    std::fs::write(&config, "[paths\n").expect("write config");

    sesame_cmd(&fixture)
        .arg("--config")
        .arg(&config)
        .arg("acls")
        .assert()
        .failure()
        .stderr(contains("CONFIG_PARSE_TOML"));
}

#[test]
fn invalid_env_var_is_an_error() {
    let fixture = Fixture::new(&[]);
    sesame_cmd(&fixture)
        .env("SESAME_SESSION_TIMEOUT", "forever")
        .arg("acls")
        .assert()
        .failure()
        .stderr(contains("SESAME_SESSION_TIMEOUT"));
}
