//! Access policy lookup.
//!
//! Finds the `access` section of the `luci` package bound to a user and
//! turns it into an [`AccessPolicy`]. Every failure mode here is an
//! *absent* policy: a missing package, an unreadable package, no
//! matching section. Sections whose `user` option is missing or is a
//! list are skipped.

use crate::uci::{ConfigStore, OptionValue, UciSection};
use sesame_auth::{AccessPolicy, PermissionList};
use tracing::{debug, warn};

/// Package holding access sections.
pub const ACCESS_PACKAGE: &str = "luci";

/// Section type of access sections.
pub const ACCESS_SECTION_TYPE: &str = "access";

/// Option naming the user a section is bound to.
pub const USER_OPTION: &str = "user";

/// Returns the first access section bound to `user`, if any.
///
/// # Example
///
/// ```
/// use sesame_runtime::access::find_policy;
/// use sesame_runtime::uci::MemoryConfigStore;
///
/// let store = MemoryConfigStore::new().with_text("luci", "
/// config access 'ops'
///     option user 'alice'
///     list read 'status-*'
/// ").unwrap();
///
/// let policy = find_policy(&store, "alice").unwrap();
/// assert_eq!(policy.section(), "ops");
/// assert!(find_policy(&store, "mallory").is_none());
/// ```
pub fn find_policy<S: ConfigStore + ?Sized>(store: &S, user: &str) -> Option<AccessPolicy> {
    let package = match store.load_package(ACCESS_PACKAGE) {
        Ok(Some(package)) => package,
        Ok(None) => {
            debug!(package = ACCESS_PACKAGE, "No access package configured");
            return None;
        }
        Err(e) => {
            warn!(package = ACCESS_PACKAGE, error = %e, "Failed to load access package");
            return None;
        }
    };

    let section = package
        .sections_of_type(ACCESS_SECTION_TYPE)
        .find(|section| bound_user(section) == Some(user))?;

    debug!(user, section = section.name(), "Found access section");
    Some(to_policy(section, user))
}

fn bound_user(section: &UciSection) -> Option<&str> {
    match section.option(USER_OPTION) {
        Some(OptionValue::Scalar(user)) => Some(user),
        Some(OptionValue::List(_)) => {
            debug!(section = section.name(), "Skipping access section with list-valued user");
            None
        }
        None => None,
    }
}

fn to_policy(section: &UciSection, user: &str) -> AccessPolicy {
    let mut policy = AccessPolicy::new(section.name(), user);
    for (name, values) in section.lists() {
        policy.push_list(PermissionList::new(name, values.iter().map(String::as_str)));
    }
    policy
}
