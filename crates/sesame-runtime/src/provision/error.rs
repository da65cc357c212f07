//! Provisioning errors.

use crate::broker::BrokerError;
use sesame_types::ErrorCode;
use thiserror::Error;

/// Reason no session was provisioned.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// User has no access policy and is not the superuser.
    #[error("login denied for user '{user}'")]
    Denied { user: String },

    /// Broker connection failed.
    #[error("session broker unavailable: {0}")]
    BrokerUnavailable(#[source] BrokerError),

    /// Broker did not create a session.
    #[error("session creation failed: {0}")]
    SessionCreateFailed(#[source] BrokerError),
}

impl ProvisionError {
    /// Creates a denied error.
    pub fn denied(user: impl Into<String>) -> Self {
        Self::Denied { user: user.into() }
    }
}

impl ErrorCode for ProvisionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Denied { .. } => "PROVISION_DENIED",
            Self::BrokerUnavailable(_) => "PROVISION_BROKER_UNAVAILABLE",
            Self::SessionCreateFailed(_) => "PROVISION_SESSION_CREATE_FAILED",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Denied { .. } => false,
            Self::BrokerUnavailable(e) | Self::SessionCreateFailed(e) => e.is_recoverable(),
        }
    }
}
