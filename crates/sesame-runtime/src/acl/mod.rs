//! ACL documents and their expansion into grants.
//!
//! An ACL document declares, per group, which scopes and objects a
//! `read` or `write` level unlocks:
//!
//! ```json
//! {
//!     "network": {
//!         "description": "Network configuration",
//!         "read":  { "uci": ["network", "wireless"] },
//!         "write": { "ubus": { "network.interface": ["up", "down"] } }
//!     }
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! AclLibrary (dir/*.json)  → AclDocument  → expand(authorize) → Vec<GrantDescriptor>
//!    per-file errors skipped    ScopeBlock::{Objects, Flat, Unrecognized}
//! ```

mod document;
mod error;
mod expander;
mod grant;
mod library;

pub use document::{AclDocument, AclGroup, PermissionBlock, ScopeBlock};
pub use error::{DocumentError, LibraryError};
pub use expander::expand;
pub use grant::{GrantDescriptor, LUCI_IO_SCOPE, UBUS_SCOPE, UCI_SCOPE, UI_SCOPE};
pub use library::{AclLibrary, GroupSummary, LoadedDocument};

/// Default directory of ACL documents.
pub const DEFAULT_ACL_DIR: &str = "/usr/share/luci2/acl.d";

/// Default file pattern inside the ACL directory.
pub const DEFAULT_ACL_PATTERN: &str = "*.json";
