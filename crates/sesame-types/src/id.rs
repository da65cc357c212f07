//! Identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque session handle issued by a session broker.
///
/// The provisioner never interprets the contents; it only passes the
/// id back to the broker when writing metadata and grants.
///
/// # Example
///
/// ```
/// use sesame_types::SessionId;
///
/// let sid = SessionId::new("5c1f0f6a2b8e4d6c9f1a2b3c4d5e6f70");
/// assert_eq!(sid.as_str(), "5c1f0f6a2b8e4d6c9f1a2b3c4d5e6f70");
/// assert!(!sid.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Wraps a broker-issued id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the broker handed back an empty id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the id and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_raw_id() {
        let sid = SessionId::new("abc123");
        assert_eq!(sid.to_string(), "abc123");
    }

    #[test]
    fn empty_id_detected() {
        assert!(SessionId::new("").is_empty());
        assert!(!SessionId::from("x").is_empty());
    }

    #[test]
    fn serializes_as_plain_string() {
        let sid = SessionId::new("abc123");
        let json = serde_json::to_string(&sid).unwrap();
        assert_eq!(json, "\"abc123\"");

        let parsed: SessionId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sid);
    }
}
