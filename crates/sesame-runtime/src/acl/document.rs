//! In-memory form of one ACL document.

use super::grant::{GrantDescriptor, LUCI_IO_SCOPE, UBUS_SCOPE, UCI_SCOPE};
use sesame_auth::Permission;
use serde_json::{Map, Value};

/// One scope entry of a permission block.
///
/// The variant is chosen from both the key and the value's shape, so
/// `"ubus": [...]` and `"uci": {...}` are [`Unrecognized`](Self::Unrecognized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeBlock {
    /// `"ubus": { "<object>": ["<method>", ...] }`
    Objects {
        /// Object name with its method names. Non-list entries are dropped.
        objects: Vec<(String, Vec<String>)>,
    },
    /// `"uci" | "luci-io": ["<name>", ...]`
    Flat {
        /// `uci` or `luci-io`.
        scope: String,
        /// Object names. Non-string entries are dropped.
        names: Vec<String>,
    },
    /// Any other key or shape; skipped during expansion.
    Unrecognized {
        /// The key as written.
        scope: String,
    },
}

impl ScopeBlock {
    /// Classifies one `scope: value` entry.
    #[must_use]
    pub fn classify(scope: &str, value: &Value) -> Self {
        match (scope, value) {
            (UBUS_SCOPE, Value::Object(entries)) => Self::Objects {
                objects: entries
                    .iter()
                    .filter_map(|(object, methods)| {
                        methods
                            .as_array()
                            .map(|methods| (object.clone(), strings(methods)))
                    })
                    .collect(),
            },
            (UCI_SCOPE | LUCI_IO_SCOPE, Value::Array(names)) => Self::Flat {
                scope: scope.to_string(),
                names: strings(names),
            },
            _ => Self::Unrecognized {
                scope: scope.to_string(),
            },
        }
    }

    /// Returns the scope key.
    #[must_use]
    pub fn scope(&self) -> &str {
        match self {
            Self::Objects { .. } => UBUS_SCOPE,
            Self::Flat { scope, .. } | Self::Unrecognized { scope } => scope,
        }
    }

    /// Builds the grant for this scope under `permission`.
    ///
    /// Object-style scopes pair each object with each method. Flat
    /// scopes pair each name with the permission name itself. Returns
    /// `None` for unrecognized scopes.
    #[must_use]
    pub fn to_grant(&self, permission: Permission) -> Option<GrantDescriptor> {
        match self {
            Self::Objects { objects } => {
                let mut grant = GrantDescriptor::new(UBUS_SCOPE);
                for (object, methods) in objects {
                    for method in methods {
                        grant.push(object.as_str(), method.as_str());
                    }
                }
                Some(grant)
            }
            Self::Flat { scope, names } => {
                let mut grant = GrantDescriptor::new(scope.as_str());
                for name in names {
                    grant.push(name.as_str(), permission.as_str());
                }
                Some(grant)
            }
            Self::Unrecognized { .. } => None,
        }
    }
}

/// A `read` or `write` block of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionBlock {
    /// Level this block grants.
    pub permission: Permission,
    /// Scope entries in document order.
    pub scopes: Vec<ScopeBlock>,
}

/// One top-level group of an ACL document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclGroup {
    /// Group name, matched against policy patterns.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Permission blocks in document order.
    pub blocks: Vec<PermissionBlock>,
}

/// A parsed ACL document.
///
/// Keys other than `read` and `write` inside a group are ignored
/// (apart from `description`), as are permission values that are not
/// objects and groups that are not objects.
///
/// # Example
///
/// ```
/// use sesame_runtime::acl::{AclDocument, ScopeBlock};
///
/// let doc = AclDocument::from_json_str(r#"{
///     "ops": { "read": { "uci": ["network"], "future": 1 } }
/// }"#).unwrap();
///
/// let block = &doc.groups()[0].blocks[0];
/// assert!(matches!(block.scopes[0], ScopeBlock::Flat { .. }));
/// assert!(matches!(block.scopes[1], ScopeBlock::Unrecognized { .. }));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclDocument {
    groups: Vec<AclGroup>,
}

impl AclDocument {
    /// Builds a document from a top-level JSON object.
    #[must_use]
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let groups = map
            .iter()
            .filter_map(|(name, group)| group.as_object().map(|g| parse_group(name, g)))
            .collect();
        Self { groups }
    }

    /// Builds a document from any JSON value; `None` unless it is an object.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_map)
    }

    /// Parses JSON text.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for invalid text. A valid non-object
    /// document yields an empty document from this helper; file loading
    /// reports that case separately.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value).unwrap_or_default())
    }

    /// Returns the groups in document order.
    #[must_use]
    pub fn groups(&self) -> &[AclGroup] {
        &self.groups
    }

    /// Returns `true` if the document declares no groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn parse_group(name: &str, group: &Map<String, Value>) -> AclGroup {
    let description = group
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string);

    let blocks = group
        .iter()
        .filter_map(|(key, value)| {
            let permission = Permission::from_name(key)?;
            let scopes = value.as_object()?;
            Some(PermissionBlock {
                permission,
                scopes: scopes
                    .iter()
                    .map(|(scope, value)| ScopeBlock::classify(scope, value))
                    .collect(),
            })
        })
        .collect();

    AclGroup {
        name: name.to_string(),
        description,
        blocks,
    }
}

fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ubus_table_is_object_style() {
        let block = ScopeBlock::classify(
            "ubus",
            &json!({ "system": ["reboot", 5, "info"], "bad": "not-a-list" }),
        );
        assert_eq!(
            block,
            ScopeBlock::Objects {
                objects: vec![(
                    "system".to_string(),
                    vec!["reboot".to_string(), "info".to_string()]
                )],
            }
        );
    }

    #[test]
    fn flat_scopes_need_lists() {
        let uci = ScopeBlock::classify("uci", &json!(["network", null, "wireless"]));
        assert_eq!(
            uci,
            ScopeBlock::Flat {
                scope: "uci".to_string(),
                names: vec!["network".to_string(), "wireless".to_string()],
            }
        );

        let io = ScopeBlock::classify("luci-io", &json!(["upload"]));
        assert_eq!(io.scope(), "luci-io");
        assert!(matches!(io, ScopeBlock::Flat { .. }));
    }

    #[test]
    fn wrong_shapes_are_unrecognized() {
        assert!(matches!(
            ScopeBlock::classify("ubus", &json!(["system"])),
            ScopeBlock::Unrecognized { .. }
        ));
        assert!(matches!(
            ScopeBlock::classify("uci", &json!({ "network": ["x"] })),
            ScopeBlock::Unrecognized { .. }
        ));
        assert!(matches!(
            ScopeBlock::classify("cgi-io", &json!(["upload"])),
            ScopeBlock::Unrecognized { .. }
        ));
    }

    #[test]
    fn flat_grant_carries_permission_name() {
        let block = ScopeBlock::classify("uci", &json!(["network"]));
        let grant = block.to_grant(Permission::Write).unwrap();
        assert_eq!(grant, GrantDescriptor::new("uci").with("network", "write"));
    }

    #[test]
    fn empty_ubus_table_still_yields_a_grant() {
        let block = ScopeBlock::classify("ubus", &json!({}));
        let grant = block.to_grant(Permission::Read).unwrap();
        assert_eq!(grant.scope, "ubus");
        assert!(grant.objects.is_empty());
    }

    #[test]
    fn groups_keep_document_order_and_skip_noise() {
        let doc = AclDocument::from_value(&json!({
            "zeta": { "description": "Last letter", "write": { "uci": ["a"] } },
            "alpha": { "read": { "uci": ["b"] }, "exec": { "uci": ["c"] }, "write": ["x"] },
            "scalar": "ignored"
        }))
        .unwrap();

        let names: Vec<&str> = doc.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(doc.groups()[0].description.as_deref(), Some("Last letter"));

        let alpha = &doc.groups()[1];
        assert_eq!(alpha.blocks.len(), 1);
        assert_eq!(alpha.blocks[0].permission, Permission::Read);
    }

    #[test]
    fn non_object_document() {
        assert!(AclDocument::from_value(&json!([1, 2])).is_none());
        assert!(AclDocument::from_json_str("[1, 2]").unwrap().is_empty());
        assert!(AclDocument::from_json_str("{").is_err());
    }
}
