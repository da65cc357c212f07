//! Permission resolution.
//!
//! [`is_authorized`] applies the one inheritance rule of the model: a
//! group granted `write` is implicitly granted `read`. The fallback is a
//! single step; `write` never falls back to anything.
//!
//! [`Authorization`] is the decision the provisioner passes to ACL
//! expansion. It also encodes the login gate, including the superuser
//! escape hatch.

use crate::{AccessPolicy, Permission};

/// User name that may log in without an access section.
///
/// Without a section the superuser is unrestricted. With a section,
/// the section applies like for any other user.
pub const SUPERUSER: &str = "root";

/// Decides whether `policy` authorizes `permission` on `group`.
///
/// # Example
///
/// ```
/// use sesame_auth::{is_authorized, AccessPolicy, Permission};
///
/// let policy = AccessPolicy::new("s", "alice").with_list("write", ["admins"]);
/// assert!(is_authorized(&policy, Permission::Write, "admins"));
/// assert!(is_authorized(&policy, Permission::Read, "admins"));
///
/// let reader = AccessPolicy::new("s", "bob").with_list("read", ["admins"]);
/// assert!(!is_authorized(&reader, Permission::Write, "admins"));
/// ```
#[must_use]
pub fn is_authorized(policy: &AccessPolicy, permission: Permission, group: &str) -> bool {
    if policy.grants_directly(permission, group) {
        return true;
    }

    match permission.implied_by() {
        Some(stronger) => policy.grants_directly(stronger, group),
        None => false,
    }
}

/// Authorization in force for one login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Superuser without an access section: every group, every level.
    Unrestricted,
    /// Decisions come from the user's access section.
    Policy(AccessPolicy),
}

impl Authorization {
    /// Applies the login gate.
    ///
    /// Returns `None` when the user has no policy and is not the
    /// superuser, meaning the login is denied.
    ///
    /// # Example
    ///
    /// ```
    /// use sesame_auth::{AccessPolicy, Authorization};
    ///
    /// assert_eq!(Authorization::for_user("root", None), Some(Authorization::Unrestricted));
    /// assert_eq!(Authorization::for_user("guest", None), None);
    ///
    /// let policy = AccessPolicy::new("s", "root");
    /// assert!(matches!(
    ///     Authorization::for_user("root", Some(policy)),
    ///     Some(Authorization::Policy(_))
    /// ));
    /// ```
    #[must_use]
    pub fn for_user(user: &str, policy: Option<AccessPolicy>) -> Option<Self> {
        match policy {
            Some(policy) => Some(Self::Policy(policy)),
            None if user == SUPERUSER => Some(Self::Unrestricted),
            None => None,
        }
    }

    /// Returns `true` if `permission` on `group` is authorized.
    #[must_use]
    pub fn allows(&self, permission: Permission, group: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Policy(policy) => is_authorized(policy, permission, group),
        }
    }

    /// Returns `true` for the superuser bypass.
    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Returns the bound policy, if any.
    #[must_use]
    pub fn policy(&self) -> Option<&AccessPolicy> {
        match self {
            Self::Unrestricted => None,
            Self::Policy(policy) => Some(policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer() -> AccessPolicy {
        AccessPolicy::new("s", "alice").with_list("write", ["admins"])
    }

    fn reader() -> AccessPolicy {
        AccessPolicy::new("s", "bob").with_list("read", ["admins"])
    }

    #[test]
    fn write_implies_read() {
        assert!(is_authorized(&writer(), Permission::Read, "admins"));
    }

    #[test]
    fn read_does_not_imply_write() {
        assert!(is_authorized(&reader(), Permission::Read, "admins"));
        assert!(!is_authorized(&reader(), Permission::Write, "admins"));
    }

    #[test]
    fn unmatched_group_denied_at_both_levels() {
        let policy = writer();
        assert!(!is_authorized(&policy, Permission::Read, "ops"));
        assert!(!is_authorized(&policy, Permission::Write, "ops"));
    }

    #[test]
    fn glob_patterns_participate_in_inheritance() {
        let policy = AccessPolicy::new("s", "carol").with_list("write", ["net-*"]);
        assert!(is_authorized(&policy, Permission::Read, "net-dhcp"));
        assert!(!is_authorized(&policy, Permission::Read, "system"));
    }

    #[test]
    fn gate_denies_unknown_user_without_policy() {
        assert_eq!(Authorization::for_user("guest", None), None);
        assert_eq!(Authorization::for_user("Root", None), None);
    }

    #[test]
    fn superuser_without_policy_is_unrestricted() {
        let auth = Authorization::for_user(SUPERUSER, None).unwrap();
        assert!(auth.is_unrestricted());
        assert!(auth.allows(Permission::Write, "anything"));
        assert!(auth.policy().is_none());
    }

    #[test]
    fn superuser_with_policy_is_restricted() {
        let policy = AccessPolicy::new("s", "root").with_list("read", ["status"]);
        let auth = Authorization::for_user(SUPERUSER, Some(policy)).unwrap();
        assert!(!auth.is_unrestricted());
        assert!(auth.allows(Permission::Read, "status"));
        assert!(!auth.allows(Permission::Write, "status"));
        assert_eq!(auth.policy().map(AccessPolicy::user), Some("root"));
    }
}
