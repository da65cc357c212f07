//! The provisioning flow.

use super::ProvisionError;
use crate::access::find_policy;
use crate::acl::{expand, AclLibrary};
use crate::broker::{BrokerConnector, BrokerError, SessionBroker};
use crate::config::SesameConfig;
use crate::uci::ConfigStore;
use sesame_auth::Authorization;
use sesame_types::SessionId;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Session value key holding the username.
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, Copy)]
enum Stage {
    AuthorizeGate,
    SessionCreate,
    IdentityAttach,
    AclScan,
    Done,
    Abort,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AuthorizeGate => "authorize_gate",
            Self::SessionCreate => "session_create",
            Self::IdentityAttach => "identity_attach",
            Self::AclScan => "acl_scan",
            Self::Done => "done",
            Self::Abort => "abort",
        })
    }
}

/// Where ACL documents live and how long sessions and calls last.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    /// ACL document source.
    pub library: AclLibrary,
    /// Idle timeout passed to `create`.
    pub idle_timeout: Duration,
    /// Timeout of every broker call.
    pub call_timeout: Duration,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self::from(&SesameConfig::default())
    }
}

impl From<&SesameConfig> for ProvisionSettings {
    fn from(config: &SesameConfig) -> Self {
        Self {
            library: AclLibrary::new(&config.paths.acl_dir, config.paths.acl_pattern.as_str()),
            idle_timeout: config.session.idle_timeout(),
            call_timeout: config.session.call_timeout(),
        }
    }
}

/// Outcome of a successful provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// The new session.
    pub sid: SessionId,
    /// Whether the `user` value was stored on the session.
    pub identity_attached: bool,
    /// Grants the broker accepted.
    pub grants_applied: usize,
    /// Grants the broker rejected.
    pub grants_failed: usize,
    /// ACL files that could not be loaded.
    pub documents_skipped: usize,
}

impl ProvisionReport {
    fn new(sid: SessionId) -> Self {
        Self {
            sid,
            identity_attached: false,
            grants_applied: 0,
            grants_failed: 0,
            documents_skipped: 0,
        }
    }
}

/// Creates sessions for users and applies their ACL grants.
///
/// Holds no per-user state: the access policy and the ACL library are read
/// afresh on every call, and each call connects its own broker client.
///
/// # Example
///
/// ```
/// use sesame_runtime::broker::MemoryBroker;
/// use sesame_runtime::provision::{ProvisionError, SessionProvisioner};
/// use sesame_runtime::uci::MemoryConfigStore;
///
/// let broker = MemoryBroker::new();
/// let provisioner = SessionProvisioner::new(MemoryConfigStore::new(), broker.clone());
///
/// assert!(matches!(provisioner.provision("mallory"), Err(ProvisionError::Denied { .. })));
/// assert_eq!(broker.connect_count(), 0);
///
/// let sid = provisioner.setup_session("root").unwrap();
/// assert_eq!(broker.value(&sid, "user").as_deref(), Some("root"));
/// ```
#[derive(Debug)]
pub struct SessionProvisioner<S, C> {
    store: S,
    connector: C,
    settings: ProvisionSettings,
}

impl<S: ConfigStore, C: BrokerConnector> SessionProvisioner<S, C> {
    /// Creates a provisioner with default settings.
    #[must_use]
    pub fn new(store: S, connector: C) -> Self {
        Self {
            store,
            connector,
            settings: ProvisionSettings::default(),
        }
    }

    /// Replaces the settings.
    #[must_use]
    pub fn with_settings(mut self, settings: ProvisionSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the settings in use.
    #[must_use]
    pub fn settings(&self) -> &ProvisionSettings {
        &self.settings
    }

    /// Returns the user's authorization, or `None` if login is denied.
    #[must_use]
    pub fn authorization(&self, user: &str) -> Option<Authorization> {
        Authorization::for_user(user, find_policy(&self.store, user))
    }

    /// Provisions a session for `user`, returning its id.
    ///
    /// Every failure collapses to `None`; see [`provision`](Self::provision)
    /// for the detailed outcome.
    #[must_use]
    pub fn setup_session(&self, user: &str) -> Option<SessionId> {
        self.provision(user).ok().map(|report| report.sid)
    }

    /// Provisions a session for `user`.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::Denied`] if the user has no policy and is not
    ///   the superuser. The broker is not contacted.
    /// - [`ProvisionError::BrokerUnavailable`] if connecting fails.
    /// - [`ProvisionError::SessionCreateFailed`] if no session id came back.
    pub fn provision(&self, user: &str) -> Result<ProvisionReport, ProvisionError> {
        debug!(stage = %Stage::AuthorizeGate, user, "Provisioning");
        let Some(authorization) = self.authorization(user) else {
            debug!(stage = %Stage::Abort, user, "No access policy");
            return Err(ProvisionError::denied(user));
        };

        debug!(
            stage = %Stage::SessionCreate,
            user,
            unrestricted = authorization.is_unrestricted(),
            "Login permitted"
        );
        let client = self.connector.connect().map_err(|e| {
            debug!(stage = %Stage::Abort, user, error = %e, "Broker unavailable");
            ProvisionError::BrokerUnavailable(e)
        })?;
        let sid = self.create_session(&client).map_err(|e| {
            debug!(stage = %Stage::Abort, user, error = %e, "Session not created");
            ProvisionError::SessionCreateFailed(e)
        })?;
        info!(user, sid = %sid, "Session created");

        let mut report = ProvisionReport::new(sid);

        debug!(stage = %Stage::IdentityAttach, sid = %report.sid, "Attaching identity");
        match client.set(&report.sid, USER_KEY, user, self.settings.call_timeout) {
            Ok(()) => report.identity_attached = true,
            Err(e) => warn!(sid = %report.sid, error = %e, "Failed to attach user to session"),
        }

        debug!(
            stage = %Stage::AclScan,
            sid = %report.sid,
            dir = %self.settings.library.dir().display(),
            "Scanning ACL files"
        );
        self.apply_acls(&client, &authorization, &mut report);

        debug!(
            stage = %Stage::Done,
            sid = %report.sid,
            applied = report.grants_applied,
            failed = report.grants_failed,
            skipped = report.documents_skipped,
            "Provisioning finished"
        );
        Ok(report)
    }

    fn create_session(&self, client: &C::Client) -> Result<SessionId, BrokerError> {
        let sid = client.create(self.settings.idle_timeout, self.settings.call_timeout)?;
        if sid.is_empty() {
            return Err(BrokerError::NoSessionId);
        }
        Ok(sid)
    }

    fn apply_acls(
        &self,
        client: &C::Client,
        authorization: &Authorization,
        report: &mut ProvisionReport,
    ) {
        let documents = match self.settings.library.load() {
            Ok(documents) => documents,
            Err(e) => {
                warn!(error = %e, "Cannot scan ACL directory");
                return;
            }
        };

        for loaded in documents {
            let loaded = match loaded {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!(error = %e, "Skipping ACL file");
                    report.documents_skipped += 1;
                    continue;
                }
            };
            debug!(path = %loaded.path.display(), "Expanding ACL file");

            for grant in expand(&loaded.document, |p, g| authorization.allows(p, g)) {
                match client.grant(&report.sid, &grant, self.settings.call_timeout) {
                    Ok(()) => report.grants_applied += 1,
                    Err(e) => {
                        warn!(sid = %report.sid, grant = %grant, error = %e, "Grant failed");
                        report.grants_failed += 1;
                    }
                }
            }
        }
    }
}
