//! Per-user access policy.
//!
//! An [`AccessPolicy`] is the in-memory form of one `access` section of
//! the configuration store:
//!
//! ```text
//! config access 'operators'
//!     option user 'alice'
//!     list read 'status-*'
//!     list write 'network'
//! ```
//!
//! The policy is a read-only snapshot taken for a single login. It is
//! never cached between logins.

use crate::{GroupPattern, Permission};

/// One list option of an access section: a name and its group patterns.
///
/// The name is kept verbatim. Lists named anything other than `read`
/// or `write` are carried along but never consulted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionList {
    name: String,
    patterns: Vec<GroupPattern>,
}

impl PermissionList {
    /// Creates a list from its option name and pattern values.
    #[must_use]
    pub fn new<I, P>(name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<GroupPattern>,
    {
        Self {
            name: name.into(),
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the option name (e.g. `"read"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the patterns in configuration order.
    #[must_use]
    pub fn patterns(&self) -> &[GroupPattern] {
        &self.patterns
    }

    /// Returns `true` if any pattern matches `group`.
    #[must_use]
    pub fn matches(&self, group: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(group))
    }
}

/// Access policy bound to exactly one user.
///
/// # Example
///
/// ```
/// use sesame_auth::{AccessPolicy, Permission};
///
/// let policy = AccessPolicy::new("ops", "alice")
///     .with_list("read", ["status-*"])
///     .with_list("write", ["network"]);
///
/// assert_eq!(policy.user(), "alice");
/// assert!(policy.grants_directly(Permission::Read, "status-syslog"));
/// assert!(!policy.grants_directly(Permission::Read, "network"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    section: String,
    user: String,
    lists: Vec<PermissionList>,
}

impl AccessPolicy {
    /// Creates an empty policy for `user`, read from section `section`.
    #[must_use]
    pub fn new(section: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            user: user.into(),
            lists: Vec::new(),
        }
    }

    /// Appends a permission list.
    #[must_use]
    pub fn with_list<I, P>(mut self, name: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<GroupPattern>,
    {
        self.push_list(PermissionList::new(name, patterns));
        self
    }

    /// Appends a permission list in place.
    pub fn push_list(&mut self, list: PermissionList) {
        self.lists.push(list);
    }

    /// Returns the configuration section name this policy came from.
    #[must_use]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Returns the user this policy is bound to.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns all lists, including ones with unrecognized names.
    #[must_use]
    pub fn lists(&self) -> &[PermissionList] {
        &self.lists
    }

    /// Checks only the lists named exactly `permission`, without inheritance.
    #[must_use]
    pub fn grants_directly(&self, permission: Permission, group: &str) -> bool {
        self.lists
            .iter()
            .filter(|list| list.name() == permission.as_str())
            .any(|list| list.matches(group))
    }
}
