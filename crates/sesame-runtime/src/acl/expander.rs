//! ACL document expansion.

use super::{AclDocument, GrantDescriptor};
use sesame_auth::Permission;
use tracing::trace;

/// Expands one document into the grants `authorize` permits.
///
/// For every group and every `read`/`write` block:
///
/// 1. If `authorize(permission, group)` is false the whole block is
///    skipped.
/// 2. Each recognized scope yields one [`GrantDescriptor`]; unrecognized
///    scopes are ignored.
/// 3. If at least one scope was recognized, one companion
///    `luci-ui [group, permission]` grant follows the block's scope grants.
///
/// Output order is group order, then block order, then scope order.
/// The result depends only on its inputs, so repeated runs over the same
/// document and authorization are identical.
///
/// # Example
///
/// ```
/// use sesame_runtime::acl::{expand, AclDocument, GrantDescriptor};
///
/// let doc = AclDocument::from_json_str(
///     r#"{"admins": {"write": {"ubus": {"system": ["reboot", "info"]}}}}"#,
/// ).unwrap();
///
/// let grants = expand(&doc, |_, group| group == "admins");
/// assert_eq!(grants, vec![
///     GrantDescriptor::new("ubus").with("system", "reboot").with("system", "info"),
///     GrantDescriptor::new("luci-ui").with("admins", "write"),
/// ]);
/// ```
pub fn expand<F>(document: &AclDocument, authorize: F) -> Vec<GrantDescriptor>
where
    F: Fn(Permission, &str) -> bool,
{
    let mut grants = Vec::new();

    for group in document.groups() {
        for block in &group.blocks {
            if !authorize(block.permission, &group.name) {
                trace!(group = %group.name, permission = %block.permission, "Block not authorized");
                continue;
            }

            let before = grants.len();
            grants.extend(
                block
                    .scopes
                    .iter()
                    .filter_map(|scope| scope.to_grant(block.permission)),
            );

            if grants.len() > before {
                grants.push(GrantDescriptor::ui(&group.name, block.permission));
            }
        }
    }

    grants
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesame_auth::{is_authorized, AccessPolicy};

    fn doc(text: &str) -> AclDocument {
        AclDocument::from_json_str(text).unwrap()
    }

    #[test]
    fn object_style_scope() {
        let policy = AccessPolicy::new("s", "alice").with_list("write", ["admins"]);
        let grants = expand(
            &doc(r#"{"admins": {"write": {"ubus": {"system": ["reboot","info"]}}}}"#),
            |p, g| is_authorized(&policy, p, g),
        );

        assert_eq!(
            grants,
            vec![
                GrantDescriptor::new("ubus")
                    .with("system", "reboot")
                    .with("system", "info"),
                GrantDescriptor::new("luci-ui").with("admins", "write"),
            ]
        );
    }

    #[test]
    fn flat_list_scope() {
        let grants = expand(
            &doc(r#"{"ops": {"read": {"uci": ["network","wireless"]}}}"#),
            |_, _| true,
        );

        assert_eq!(
            grants,
            vec![
                GrantDescriptor::new("uci")
                    .with("network", "read")
                    .with("wireless", "read"),
                GrantDescriptor::new("luci-ui").with("ops", "read"),
            ]
        );
    }

    #[test]
    fn unauthorized_block_skipped_entirely() {
        let policy = AccessPolicy::new("s", "bob").with_list("read", ["ops"]);
        let grants = expand(
            &doc(
                r#"{"ops": {
                    "read":  {"uci": ["network"]},
                    "write": {"uci": ["network"], "ubus": {"network": ["restart"]}}
                }}"#,
            ),
            |p, g| is_authorized(&policy, p, g),
        );

        assert_eq!(
            grants,
            vec![
                GrantDescriptor::new("uci").with("network", "read"),
                GrantDescriptor::new("luci-ui").with("ops", "read"),
            ]
        );
    }

    #[test]
    fn one_ui_grant_per_block_with_several_scopes() {
        let grants = expand(
            &doc(
                r#"{"sys": {"write": {
                    "ubus": {"system": ["reboot"]},
                    "uci": ["system"],
                    "luci-io": ["backup"]
                }}}"#,
            ),
            |_, _| true,
        );

        let scopes: Vec<&str> = grants.iter().map(|g| g.scope.as_str()).collect();
        assert_eq!(scopes, vec!["ubus", "uci", "luci-io", "luci-ui"]);
        assert_eq!(grants[2], GrantDescriptor::new("luci-io").with("backup", "write"));
    }

    #[test]
    fn block_with_only_unrecognized_scopes_emits_nothing() {
        let grants = expand(
            &doc(r#"{"x": {"read": {"cgi-io": ["upload"], "ubus": ["wrong-shape"]}}}"#),
            |_, _| true,
        );
        assert!(grants.is_empty());
    }

    #[test]
    fn expansion_is_repeatable() {
        let document = doc(
            r#"{
                "a": {"read": {"uci": ["x"]}, "write": {"ubus": {"o": ["m"]}}},
                "b": {"read": {"luci-io": ["y"]}}
            }"#,
        );
        let policy = AccessPolicy::new("s", "u").with_list("write", ["a"]).with_list("read", ["b"]);
        let authorize = |p, g: &str| is_authorized(&policy, p, g);

        let mut first = expand(&document, authorize);
        let mut second = expand(&document, authorize);
        assert_eq!(first, second);

        first.sort();
        second.sort();
        assert_eq!(first, second);
        assert_eq!(first.len(), 6);
    }
}
