//! Permission levels.

use crate::AuthError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access level carried by ACL permission blocks and policy lists.
///
/// Only `read` and `write` exist. Any other block or list name is
/// ignored by the callers, so [`Permission::from_name`] returns `None`
/// rather than an error.
///
/// # Example
///
/// ```
/// use sesame_auth::Permission;
///
/// assert_eq!(Permission::from_name("write"), Some(Permission::Write));
/// assert_eq!(Permission::from_name("description"), None);
/// assert_eq!(Permission::Read.implied_by(), Some(Permission::Write));
/// assert_eq!(Permission::Write.implied_by(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read-only access.
    Read,
    /// Read-write access.
    Write,
}

impl Permission {
    /// Both levels, in document order.
    pub const ALL: [Permission; 2] = [Permission::Read, Permission::Write];

    /// Returns the wire name (`"read"` / `"write"`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }

    /// Maps an exact block or list name to a permission.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            _ => None,
        }
    }

    /// Returns the stronger level whose grant also satisfies this one.
    ///
    /// Write satisfies read. Nothing satisfies write except write.
    #[must_use]
    pub fn implied_by(self) -> Option<Self> {
        match self {
            Self::Read => Some(Self::Write),
            Self::Write => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| AuthError::unknown_permission(s))
    }
}
