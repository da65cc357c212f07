//! In-process session broker.
//!
//! [`MemoryBroker`] keeps sessions, their values and their ACL grants in
//! shared state behind a `parking_lot::Mutex`. Clones share the same
//! state, so a test can keep one handle for inspection while a
//! provisioner owns another as its connector.
//!
//! # Access Checks
//!
//! Granted pairs are stored as patterns. [`MemoryBroker::access`] answers
//! whether `(scope, object, function)` is covered, matching object and
//! function against the stored pairs with shell-glob semantics, the way a
//! real broker evaluates wildcard ACL entries.

use super::{BrokerConnector, BrokerError, SessionBroker};
use crate::acl::GrantDescriptor;
use parking_lot::Mutex;
use sesame_auth::matches;
use sesame_types::SessionId;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// One call recorded by [`MemoryBroker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrokerCall {
    /// `session.create`.
    Create { idle_timeout: Duration },
    /// `session.set`.
    Set {
        sid: SessionId,
        key: String,
        value: String,
    },
    /// `session.grant`.
    Grant {
        sid: SessionId,
        grant: GrantDescriptor,
    },
}

#[derive(Debug, Default)]
struct SessionRecord {
    idle_timeout: Duration,
    values: BTreeMap<String, String>,
    acl: BTreeMap<String, BTreeSet<(String, String)>>,
    applied: Vec<GrantDescriptor>,
}

#[derive(Debug, Default)]
struct Faults {
    unreachable: bool,
    fail_create: bool,
    empty_session_id: bool,
    fail_set: bool,
    fail_grant_scopes: HashSet<String>,
}

#[derive(Debug, Default)]
struct State {
    sessions: BTreeMap<SessionId, SessionRecord>,
    calls: Vec<BrokerCall>,
    connects: usize,
    faults: Faults,
}

/// Thread-safe in-memory session broker.
///
/// Acts as its own [`BrokerConnector`]: `connect` hands out a clone that
/// shares state with the handle it was cloned from.
///
/// # Example
///
/// ```
/// use sesame_runtime::acl::GrantDescriptor;
/// use sesame_runtime::broker::{BrokerConnector, MemoryBroker, SessionBroker};
/// use std::time::Duration;
///
/// let broker = MemoryBroker::new();
/// let client = broker.connect().unwrap();
/// let timeout = Duration::from_millis(500);
///
/// let sid = client.create(Duration::from_secs(3600), timeout).unwrap();
/// client
///     .grant(&sid, &GrantDescriptor::new("ubus").with("network.*", "status"), timeout)
///     .unwrap();
///
/// assert!(broker.access(&sid, "ubus", "network.interface", "status"));
/// assert!(!broker.access(&sid, "ubus", "network.interface", "up"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBroker {
    state: Arc<Mutex<State>>,
}

impl MemoryBroker {
    /// Creates an empty broker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `connect` fail with [`BrokerError::Unavailable`].
    #[must_use]
    pub fn unreachable(self) -> Self {
        self.state.lock().faults.unreachable = true;
        self
    }

    /// Makes every `create` fail.
    #[must_use]
    pub fn failing_create(self) -> Self {
        self.state.lock().faults.fail_create = true;
        self
    }

    /// Makes `create` succeed without returning a session id.
    #[must_use]
    pub fn without_session_id(self) -> Self {
        self.state.lock().faults.empty_session_id = true;
        self
    }

    /// Makes every `set` fail.
    #[must_use]
    pub fn failing_set(self) -> Self {
        self.state.lock().faults.fail_set = true;
        self
    }

    /// Makes `grant` fail for descriptors of `scope`.
    #[must_use]
    pub fn failing_grants_for(self, scope: impl Into<String>) -> Self {
        self.state.lock().faults.fail_grant_scopes.insert(scope.into());
        self
    }

    /// Returns every call received, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<BrokerCall> {
        self.state.lock().calls.clone()
    }

    /// Returns how many times `connect` was attempted.
    #[must_use]
    pub fn connect_count(&self) -> usize {
        self.state.lock().connects
    }

    /// Returns the ids of all live sessions.
    #[must_use]
    pub fn sessions(&self) -> Vec<SessionId> {
        self.state.lock().sessions.keys().cloned().collect()
    }

    /// Returns the idle timeout a session was created with.
    #[must_use]
    pub fn idle_timeout(&self, sid: &SessionId) -> Option<Duration> {
        self.state.lock().sessions.get(sid).map(|s| s.idle_timeout)
    }

    /// Returns a value stored on a session.
    #[must_use]
    pub fn value(&self, sid: &SessionId, key: &str) -> Option<String> {
        self.state
            .lock()
            .sessions
            .get(sid)
            .and_then(|s| s.values.get(key).cloned())
    }

    /// Returns the grants applied to a session, in order.
    #[must_use]
    pub fn grants(&self, sid: &SessionId) -> Vec<GrantDescriptor> {
        self.state
            .lock()
            .sessions
            .get(sid)
            .map(|s| s.applied.clone())
            .unwrap_or_default()
    }

    /// Checks whether the session may call `function` on `object` in `scope`.
    ///
    /// The scope must match exactly; object and function are matched
    /// against each granted pair as glob patterns.
    #[must_use]
    pub fn access(&self, sid: &SessionId, scope: &str, object: &str, function: &str) -> bool {
        let state = self.state.lock();
        let Some(pairs) = state.sessions.get(sid).and_then(|s| s.acl.get(scope)) else {
            return false;
        };
        pairs
            .iter()
            .any(|(o, f)| matches(o, object) && matches(f, function))
    }
}

impl BrokerConnector for MemoryBroker {
    type Client = MemoryBroker;

    fn connect(&self) -> Result<Self::Client, BrokerError> {
        let mut state = self.state.lock();
        state.connects += 1;
        if state.faults.unreachable {
            return Err(BrokerError::unavailable("memory broker is unreachable"));
        }
        Ok(self.clone())
    }
}

impl SessionBroker for MemoryBroker {
    fn create(
        &self,
        idle_timeout: Duration,
        _call_timeout: Duration,
    ) -> Result<SessionId, BrokerError> {
        let mut state = self.state.lock();
        state.calls.push(BrokerCall::Create { idle_timeout });

        if state.faults.fail_create {
            return Err(BrokerError::call("create", 2));
        }
        if state.faults.empty_session_id {
            return Err(BrokerError::NoSessionId);
        }

        let sid = SessionId::new(uuid::Uuid::new_v4().simple().to_string());
        state.sessions.insert(
            sid.clone(),
            SessionRecord {
                idle_timeout,
                ..SessionRecord::default()
            },
        );
        debug!(sid = %sid, "Created in-memory session");
        Ok(sid)
    }

    fn set(
        &self,
        sid: &SessionId,
        key: &str,
        value: &str,
        _call_timeout: Duration,
    ) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        state.calls.push(BrokerCall::Set {
            sid: sid.clone(),
            key: key.to_string(),
            value: value.to_string(),
        });

        if state.faults.fail_set {
            return Err(BrokerError::call("set", 2));
        }
        let session = state
            .sessions
            .get_mut(sid)
            .ok_or_else(|| BrokerError::call("set", 4))?;
        session.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn grant(
        &self,
        sid: &SessionId,
        grant: &GrantDescriptor,
        _call_timeout: Duration,
    ) -> Result<(), BrokerError> {
        let mut state = self.state.lock();
        state.calls.push(BrokerCall::Grant {
            sid: sid.clone(),
            grant: grant.clone(),
        });

        if state.faults.fail_grant_scopes.contains(&grant.scope) {
            return Err(BrokerError::call("grant", 6));
        }
        let session = state
            .sessions
            .get_mut(sid)
            .ok_or_else(|| BrokerError::call("grant", 4))?;
        session
            .acl
            .entry(grant.scope.clone())
            .or_default()
            .extend(grant.pairs().map(|(o, f)| (o.to_string(), f.to_string())));
        session.applied.push(grant.clone());
        Ok(())
    }
}
