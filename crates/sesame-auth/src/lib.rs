//! Access decisions for sesame.
//!
//! This crate answers one question: may this user hold `read` or
//! `write` access to an ACL group? It knows nothing about brokers,
//! files or configuration stores.
//!
//! # Decision Model
//!
//! ```text
//! AccessPolicy (user → permission lists of group patterns)
//!     │
//!     ├── GroupPattern      shell-glob match on the group name
//!     ├── is_authorized     direct match, then write-implies-read
//!     └── Authorization     Unrestricted (superuser) | Policy(AccessPolicy)
//! ```
//!
//! | Type | Controls |
//! |------|----------|
//! | [`GroupPattern`] | Which group names a policy entry covers |
//! | [`Permission`] | Level requested (read / write) |
//! | [`AccessPolicy`] | Per-user permission lists |
//! | [`Authorization`] | The decision function handed to ACL expansion |
//!
//! # Example
//!
//! ```
//! use sesame_auth::{AccessPolicy, Authorization, Permission};
//!
//! let policy = AccessPolicy::new("admin", "alice")
//!     .with_list("write", ["net-*"]);
//!
//! let auth = Authorization::for_user("alice", Some(policy)).unwrap();
//! assert!(auth.allows(Permission::Write, "net-wireless"));
//! assert!(auth.allows(Permission::Read, "net-wireless"));
//! assert!(!auth.allows(Permission::Read, "system"));
//! ```

pub mod error;
pub mod matcher;
pub mod permission;
pub mod policy;
pub mod resolver;

pub use error::AuthError;
pub use matcher::{matches, GroupPattern};
pub use permission::Permission;
pub use policy::{AccessPolicy, PermissionList};
pub use resolver::{is_authorized, Authorization, SUPERUSER};
