//! Broker errors.

use sesame_types::ErrorCode;
use thiserror::Error;

/// A broker connection or call failed.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Broker could not be reached.
    #[error("session broker unavailable: {0}")]
    Unavailable(String),

    /// Call did not complete in time.
    #[error("session.{method} timed out")]
    Timeout { method: String },

    /// Broker rejected the call.
    #[error("session.{method} failed with status {status}")]
    Call { method: String, status: i32 },

    /// `create` replied without a session id.
    #[error("session.create returned no session id")]
    NoSessionId,

    /// Reply was not the expected JSON.
    #[error("invalid reply from session.{method}: {source}")]
    InvalidReply {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// Local I/O failure talking to the broker.
    #[error("broker I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrokerError {
    /// Creates an unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Creates a timeout error.
    pub fn timeout(method: impl Into<String>) -> Self {
        Self::Timeout {
            method: method.into(),
        }
    }

    /// Creates a call error.
    pub fn call(method: impl Into<String>, status: i32) -> Self {
        Self::Call {
            method: method.into(),
            status,
        }
    }

    /// Creates an invalid reply error.
    pub fn invalid_reply(method: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidReply {
            method: method.into(),
            source,
        }
    }
}

impl ErrorCode for BrokerError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "BROKER_UNAVAILABLE",
            Self::Timeout { .. } => "BROKER_TIMEOUT",
            Self::Call { .. } => "BROKER_CALL",
            Self::NoSessionId => "BROKER_NO_SESSION_ID",
            Self::InvalidReply { .. } => "BROKER_INVALID_REPLY",
            Self::Io(_) => "BROKER_IO",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout { .. } | Self::Io(_))
    }
}
