//! Authorization errors.

use sesame_types::ErrorCode;
use thiserror::Error;

/// Errors raised while interpreting access-control input.
///
/// Matching itself never fails; only parsing user-supplied names does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A permission name other than `read` or `write` was supplied.
    #[error("unknown permission '{0}', expected 'read' or 'write'")]
    UnknownPermission(String),
}

impl AuthError {
    /// Creates an unknown permission error.
    pub fn unknown_permission(name: impl Into<String>) -> Self {
        Self::UnknownPermission(name.into())
    }
}

impl ErrorCode for AuthError {
    fn code(&self) -> &'static str {
        match self {
            Self::UnknownPermission(_) => "AUTH_UNKNOWN_PERMISSION",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
