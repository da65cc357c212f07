//! Grant descriptors: the unit submitted to a session broker.

use sesame_auth::Permission;
use sesame_types::SessionId;
use serde::{Deserialize, Serialize};

/// Scope of object-style (RPC object → methods) grants.
pub const UBUS_SCOPE: &str = "ubus";

/// Scope of flat configuration-package grants.
pub const UCI_SCOPE: &str = "uci";

/// Scope of flat file-I/O helper grants.
pub const LUCI_IO_SCOPE: &str = "luci-io";

/// Pseudo-scope recording which (group, level) pairs the UI may show.
pub const UI_SCOPE: &str = "luci-ui";

/// One grant call: a scope and an ordered list of `[object, sub]` pairs.
///
/// The session id is supplied at submission time, see
/// [`to_request`](Self::to_request).
///
/// # Example
///
/// ```
/// use sesame_runtime::acl::GrantDescriptor;
/// use sesame_auth::Permission;
///
/// let ui = GrantDescriptor::ui("admins", Permission::Write);
/// assert_eq!(ui.scope, "luci-ui");
/// assert_eq!(ui.objects, vec![["admins".to_string(), "write".to_string()]]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GrantDescriptor {
    /// Scope name (`ubus`, `uci`, `luci-io`, `luci-ui`).
    pub scope: String,
    /// Object / sub-object pairs in document order.
    pub objects: Vec<[String; 2]>,
}

impl GrantDescriptor {
    /// Creates an empty descriptor for `scope`.
    #[must_use]
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            objects: Vec::new(),
        }
    }

    /// Appends one pair.
    pub fn push(&mut self, object: impl Into<String>, sub: impl Into<String>) {
        self.objects.push([object.into(), sub.into()]);
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, object: impl Into<String>, sub: impl Into<String>) -> Self {
        self.push(object, sub);
        self
    }

    /// The companion UI-visibility grant for a processed permission block.
    #[must_use]
    pub fn ui(group: &str, permission: Permission) -> Self {
        Self::new(UI_SCOPE).with(group, permission.as_str())
    }

    /// Iterates the pairs as string slices.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.objects.iter().map(|[a, b]| (a.as_str(), b.as_str()))
    }

    /// Builds the broker request body for `sid`.
    ///
    /// ```json
    /// {"sid": "...", "scope": "ubus", "objects": [["system", "reboot"]]}
    /// ```
    #[must_use]
    pub fn to_request(&self, sid: &SessionId) -> serde_json::Value {
        serde_json::json!({
            "sid": sid,
            "scope": self.scope,
            "objects": self.objects,
        })
    }
}

impl std::fmt::Display for GrantDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scope)?;
        for (object, sub) in self.pairs() {
            write!(f, " [{object}, {sub}]")?;
        }
        Ok(())
    }
}
