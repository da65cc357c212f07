//! Core types for sesame.
//!
//! This crate holds the small set of types shared by every other
//! sesame crate:
//!
//! - [`SessionId`]: opaque handle returned by a session broker
//! - [`ErrorCode`]: machine-readable error codes for all error enums
//!
//! # Crate Architecture
//!
//! ```text
//! sesame-types   : SessionId, ErrorCode   ◄── HERE
//!     ↑
//! sesame-auth    : GroupMatcher, AccessPolicy, PermissionResolver
//!     ↑
//! sesame-runtime : config, UCI store, ACL expansion, brokers, provisioner
//!     ↑
//! sesame-cli     : `sesame` binary
//! ```

pub mod error;
pub mod id;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::SessionId;
