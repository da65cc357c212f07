//! Machine-readable error codes.
//!
//! Every sesame error enum implements [`ErrorCode`] so that the CLI and
//! log output can report a stable code next to the human message.
//!
//! # Example
//!
//! ```
//! use sesame_types::ErrorCode;
//!
//! #[derive(Debug)]
//! enum LoginError {
//!     Denied,
//!     BrokerTimeout,
//! }
//!
//! impl ErrorCode for LoginError {
//!     fn code(&self) -> &'static str {
//!         match self {
//!             Self::Denied => "LOGIN_DENIED",
//!             Self::BrokerTimeout => "LOGIN_BROKER_TIMEOUT",
//!         }
//!     }
//!
//!     fn is_recoverable(&self) -> bool {
//!         matches!(self, Self::BrokerTimeout)
//!     }
//! }
//!
//! let err = LoginError::BrokerTimeout;
//! assert_eq!(err.code(), "LOGIN_BROKER_TIMEOUT");
//! assert!(err.is_recoverable());
//! ```

/// Unified error code interface for sesame errors.
///
/// # Code Format
///
/// - **UPPER_SNAKE_CASE**, e.g. `"BROKER_TIMEOUT"`
/// - **Prefixed by domain**: `PROVISION_`, `BROKER_`, `ACL_`, `STORE_`, `CONFIG_`
/// - **Stable**: codes are part of the CLI output contract
///
/// # Recoverability
///
/// An error is recoverable when repeating the operation later may
/// succeed (broker restarts, timeouts). Denied logins and malformed
/// documents are not recoverable without an operator changing state.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;

    /// Returns whether the error is recoverable.
    fn is_recoverable(&self) -> bool;
}

/// Validates that an error code follows the sesame conventions.
///
/// # Panics
///
/// Panics with a descriptive message if the code is empty, lacks the
/// expected prefix, or is not UPPER_SNAKE_CASE. Intended for tests.
///
/// # Example
///
/// ```
/// use sesame_types::{ErrorCode, assert_error_code};
///
/// #[derive(Debug)]
/// enum MyError { Timeout }
///
/// impl ErrorCode for MyError {
///     fn code(&self) -> &'static str { "MY_TIMEOUT" }
///     fn is_recoverable(&self) -> bool { true }
/// }
///
/// assert_error_code(&MyError::Timeout, "MY_");
/// ```
pub fn assert_error_code<E: ErrorCode>(err: &E, expected_prefix: &str) {
    let code = err.code();

    assert!(!code.is_empty(), "Error code must not be empty");
    assert!(
        code.starts_with(expected_prefix),
        "Error code '{code}' must start with prefix '{expected_prefix}'"
    );
    assert!(
        is_upper_snake_case(code),
        "Error code '{code}' must be UPPER_SNAKE_CASE"
    );
}

/// Validates every error in `errors`; see [`assert_error_code`].
pub fn assert_error_codes<E: ErrorCode>(errors: &[E], expected_prefix: &str) {
    for err in errors {
        assert_error_code(err, expected_prefix);
    }
}

fn is_upper_snake_case(s: &str) -> bool {
    if s.is_empty() || s.starts_with('_') || s.ends_with('_') || s.contains("__") {
        return false;
    }

    s.chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}
