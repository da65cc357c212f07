//! Session broker reached through the `ubus` command line client.
//!
//! Each call runs `ubus -t <secs> call session <method> <json>` and reads
//! the JSON reply from stdout. The client's exit status is the broker's
//! status code; `7` is its timeout status.

use super::{BrokerConnector, BrokerError, SessionBroker};
use crate::acl::GrantDescriptor;
use serde::Deserialize;
use sesame_types::SessionId;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Duration;
use tracing::{debug, trace};

/// Broker object all calls are addressed to.
const SESSION_OBJECT: &str = "session";

/// Lookup timeout used until one is configured.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_millis(500);

/// Exit status the client reports when a call timed out.
const STATUS_TIMEOUT: i32 = 7;

#[derive(Debug, Deserialize)]
struct CreateReply {
    #[serde(alias = "ubus_rpc_session")]
    sid: Option<String>,
}

/// Client for a broker reachable through the `ubus` executable.
///
/// It is its own [`BrokerConnector`], and `connect` only
/// verifies that the `session` object is published. That lookup is bounded
/// by [`call_timeout`](Self::call_timeout); session calls carry their own.
#[derive(Debug, Clone)]
pub struct UbusBroker {
    program: PathBuf,
    call_timeout: Duration,
}

impl UbusBroker {
    /// Creates a client using `program` as the `ubus` executable.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Sets the timeout of the `connect` lookup.
    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Returns the timeout of the `connect` lookup.
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Returns the executable in use.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn run(&self, args: &[&str], call_timeout: Duration) -> std::io::Result<Output> {
        let secs = timeout_secs(call_timeout).to_string();
        trace!(program = %self.program.display(), ?args, timeout = %secs, "Running ubus");
        Command::new(&self.program)
            .arg("-t")
            .arg(&secs)
            .args(args)
            .output()
    }

    fn call(
        &self,
        method: &str,
        body: &serde_json::Value,
        call_timeout: Duration,
    ) -> Result<Vec<u8>, BrokerError> {
        let body = body.to_string();
        let output = self.run(&["call", SESSION_OBJECT, method, &body], call_timeout)?;

        match output.status.code() {
            Some(0) => Ok(output.stdout),
            Some(STATUS_TIMEOUT) => Err(BrokerError::timeout(method)),
            Some(status) => Err(BrokerError::call(method, status)),
            None => Err(BrokerError::unavailable(format!(
                "ubus terminated by signal during session.{method}"
            ))),
        }
    }
}

impl Default for UbusBroker {
    fn default() -> Self {
        Self::new("ubus")
    }
}

impl BrokerConnector for UbusBroker {
    type Client = UbusBroker;

    fn connect(&self) -> Result<Self::Client, BrokerError> {
        let output = self
            .run(&["list", SESSION_OBJECT], self.call_timeout)
            .map_err(|e| {
                BrokerError::unavailable(format!("cannot run {}: {e}", self.program.display()))
            })?;

        if !output.status.success() {
            return Err(BrokerError::unavailable(format!(
                "'{SESSION_OBJECT}' object not found ({})",
                output.status
            )));
        }
        debug!(program = %self.program.display(), "Connected to ubus");
        Ok(self.clone())
    }
}

impl SessionBroker for UbusBroker {
    fn create(
        &self,
        idle_timeout: Duration,
        call_timeout: Duration,
    ) -> Result<SessionId, BrokerError> {
        let body = serde_json::json!({ "timeout": idle_timeout.as_secs() });
        let stdout = self.call("create", &body, call_timeout)?;

        let reply: CreateReply = serde_json::from_slice(&stdout)
            .map_err(|e| BrokerError::invalid_reply("create", e))?;

        match reply.sid {
            Some(sid) if !sid.is_empty() => Ok(SessionId::new(sid)),
            _ => Err(BrokerError::NoSessionId),
        }
    }

    fn set(
        &self,
        sid: &SessionId,
        key: &str,
        value: &str,
        call_timeout: Duration,
    ) -> Result<(), BrokerError> {
        let mut values = serde_json::Map::new();
        values.insert(key.to_string(), serde_json::Value::from(value));
        let body = serde_json::json!({ "sid": sid, "values": values });
        self.call("set", &body, call_timeout).map(drop)
    }

    fn grant(
        &self,
        sid: &SessionId,
        grant: &GrantDescriptor,
        call_timeout: Duration,
    ) -> Result<(), BrokerError> {
        self.call("grant", &grant.to_request(sid), call_timeout)
            .map(drop)
    }
}

/// Whole seconds for `ubus -t`, rounded up, at least one.
fn timeout_secs(timeout: Duration) -> u64 {
    let millis = timeout.as_millis();
    let secs = millis.div_ceil(1000).max(1);
    u64::try_from(secs).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_rounds_up() {
        assert_eq!(timeout_secs(Duration::from_millis(500)), 1);
        assert_eq!(timeout_secs(Duration::from_millis(1000)), 1);
        assert_eq!(timeout_secs(Duration::from_millis(1001)), 2);
        assert_eq!(timeout_secs(Duration::ZERO), 1);
    }

    #[test]
    fn create_reply_accepts_both_keys() {
        let a: CreateReply = serde_json::from_str(r#"{"sid": "abc"}"#).unwrap();
        let b: CreateReply =
            serde_json::from_str(r#"{"ubus_rpc_session": "def", "timeout": 3600}"#).unwrap();
        let c: CreateReply = serde_json::from_str("{}").unwrap();
        assert_eq!(a.sid.as_deref(), Some("abc"));
        assert_eq!(b.sid.as_deref(), Some("def"));
        assert!(c.sid.is_none());
    }

    #[test]
    fn missing_program_is_unavailable() {
        let broker = UbusBroker::new("/nonexistent/sesame/ubus");
        assert!(matches!(broker.connect(), Err(BrokerError::Unavailable(_))));
    }

    // Only test in this binary that writes executables; keep it that way
    // to avoid ETXTBSY from concurrent forks.
    #[cfg(unix)]
    #[test]
    fn fake_ubus_client() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let log = temp.path().join("calls.log");
        let write_script = |name: &str, body: &str| {
            let path = temp.path().join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };

        let good = write_script(
            "ubus",
            &format!(
                r#"echo "$*" >> '{log}'
case "$5" in
  create) echo '{{"ubus_rpc_session": "c0ffee", "timeout": 3600}}' ;;
  grant) case "$6" in *forbidden*) exit 6 ;; esac ;;
esac
exit 0"#,
                log = log.display()
            ),
        );
        let slow = write_script("ubus-slow", "exit 7");
        let empty = write_script("ubus-empty", r#"case "$3" in list) exit 0 ;; esac; echo '{}'"#);
        let down = write_script("ubus-down", "exit 4");

        let t = Duration::from_millis(1500);

        UbusBroker::new(&good).connect().unwrap();
        let client = UbusBroker::new(&good)
            .with_call_timeout(Duration::from_millis(2500))
            .connect()
            .unwrap();
        let sid = client.create(Duration::from_secs(3600), t).unwrap();
        assert_eq!(sid.as_str(), "c0ffee");
        client.set(&sid, "user", "alice", t).unwrap();
        client
            .grant(&sid, &GrantDescriptor::new("uci").with("network", "read"), t)
            .unwrap();
        let err = client
            .grant(&sid, &GrantDescriptor::new("uci").with("forbidden", "read"), t)
            .unwrap_err();
        assert!(matches!(err, BrokerError::Call { status: 6, .. }));

        let calls = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = calls.lines().collect();
        assert_eq!(lines[0], "-t 1 list session");
        assert_eq!(lines[1], "-t 3 list session");
        assert_eq!(lines[2], r#"-t 2 call session create {"timeout":3600}"#);
        assert_eq!(
            lines[3],
            r#"-t 2 call session set {"sid":"c0ffee","values":{"user":"alice"}}"#
        );
        assert_eq!(
            lines[4],
            r#"-t 2 call session grant {"sid":"c0ffee","scope":"uci","objects":[["network","read"]]}"#
        );

        let err = UbusBroker::new(&slow)
            .create(Duration::from_secs(1), t)
            .unwrap_err();
        assert!(matches!(err, BrokerError::Timeout { .. }));

        let client = UbusBroker::new(&empty).connect().unwrap();
        assert!(matches!(
            client.create(Duration::from_secs(1), t),
            Err(BrokerError::NoSessionId)
        ));

        assert!(matches!(
            UbusBroker::new(&down).connect(),
            Err(BrokerError::Unavailable(_))
        ));
    }
}
