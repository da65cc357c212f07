//! Shared E2E test helpers for `sesame` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables that would override the fixture directories.
const SESAME_VARS: &[&str] = &[
    "SESAME_ACL_DIR",
    "SESAME_UCI_DIR",
    "SESAME_SESSION_TIMEOUT",
    "SESAME_CALL_TIMEOUT_MS",
    "SESAME_UBUS_PATH",
    "RUST_LOG",
];

/// `luci` package used by every fixture.
pub const LUCI: &str = "
config access 'admins'
\toption user 'alice'
\tlist write 'admins'

config access 'operators'
\toption user 'bob'
\tlist read 'ops'
";

/// ACL document granting ubus calls to `admins` writers.
pub const ADMINS_JSON: &str = r#"{
    "admins": {
        "description": "Administration",
        "write": { "ubus": { "system": ["reboot", "info"] } }
    }
}"#;

/// ACL document granting uci reads to `ops` readers.
pub const OPS_JSON: &str = r#"{
    "ops": {
        "description": "Operations",
        "read": { "uci": ["network", "wireless"] }
    }
}"#;

/// UCI and ACL directories in a tempdir. Keep it alive for the test's duration.
pub struct Fixture {
    pub root: tempfile::TempDir,
}

impl Fixture {
    /// Creates the standard fixture plus any extra ACL files.
    pub fn new(extra_acls: &[(&str, &str)]) -> Self {
        let root = tempfile::tempdir().expect("create temp dir for fixture");
        std::fs::create_dir(root.path().join("config")).expect("create uci dir");
        std::fs::create_dir(root.path().join("acl.d")).expect("create acl dir");
        std::fs::write(root.path().join("config").join("luci"), LUCI).expect("write luci");

        let fixture = Self { root };
        fixture.write_acl("10-admins.json", ADMINS_JSON);
        fixture.write_acl("20-ops.json", OPS_JSON);
        for (name, content) in extra_acls {
            fixture.write_acl(name, content);
        }
        fixture
    }

    pub fn uci_dir(&self) -> std::path::PathBuf {
        self.root.path().join("config")
    }

    pub fn acl_dir(&self) -> std::path::PathBuf {
        self.root.path().join("acl.d")
    }

    pub fn write_acl(&self, name: &str, content: &str) {
        std::fs::write(self.acl_dir().join(name), content).expect("write acl file");
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("valid utf8")
}

/// Build a bare Command with no fixture directories.
pub fn sesame_cmd_raw() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("sesame");
    cmd.timeout(TIMEOUT_BASIC);
    for var in SESAME_VARS {
        cmd.env_remove(var);
    }
    cmd
}

/// Build a Command for the `sesame` binary pointed at `fixture`.
pub fn sesame_cmd(fixture: &Fixture) -> assert_cmd::Command {
    let mut cmd = sesame_cmd_raw();
    cmd.args(["--uci-dir", path_arg(&fixture.uci_dir())])
        .args(["--acl-dir", path_arg(&fixture.acl_dir())]);
    cmd
}
