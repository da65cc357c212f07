//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use crate::acl::{DEFAULT_ACL_DIR, DEFAULT_ACL_PATTERN};
use crate::uci::DEFAULT_UCI_DIR;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure, after merging all layers.
///
/// # Example
///
/// ```
/// use sesame_runtime::config::SesameConfig;
///
/// let config = SesameConfig::from_toml("[session]\ntimeout_secs = 600").unwrap();
/// assert_eq!(config.session.timeout_secs, 600);
/// assert_eq!(config.session.call_timeout_ms, 500);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SesameConfig {
    /// Filesystem locations.
    pub paths: PathsConfig,

    /// Session parameters.
    pub session: SessionConfig,

    /// Broker client settings.
    pub broker: BrokerConfig,
}

impl SesameConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they
    /// differ from the default.
    pub fn merge(&mut self, other: &Self) {
        self.paths.merge(&other.paths);
        self.session.merge(&other.session);
        self.broker.merge(&other.broker);
    }
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of ACL documents.
    pub acl_dir: PathBuf,

    /// File pattern inside `acl_dir`.
    pub acl_pattern: String,

    /// Directory of UCI packages.
    pub uci_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            acl_dir: PathBuf::from(DEFAULT_ACL_DIR),
            acl_pattern: DEFAULT_ACL_PATTERN.into(),
            uci_dir: PathBuf::from(DEFAULT_UCI_DIR),
        }
    }
}

impl PathsConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.acl_dir != default.acl_dir {
            self.acl_dir = other.acl_dir.clone();
        }
        if other.acl_pattern != default.acl_pattern {
            self.acl_pattern = other.acl_pattern.clone();
        }
        if other.uci_dir != default.uci_dir {
            self.uci_dir = other.uci_dir.clone();
        }
    }
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Idle timeout of created sessions, in seconds.
    pub timeout_secs: u64,

    /// Per-call broker timeout, in milliseconds.
    pub call_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 3600,
            call_timeout_ms: 500,
        }
    }
}

impl SessionConfig {
    /// Idle timeout as a [`Duration`].
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Call timeout as a [`Duration`].
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.timeout_secs != default.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
        if other.call_timeout_ms != default.call_timeout_ms {
            self.call_timeout_ms = other.call_timeout_ms;
        }
    }
}

/// Broker configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrokerConfig {
    /// `ubus` executable, looked up in `PATH` when relative.
    pub ubus_path: PathBuf,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            ubus_path: PathBuf::from("ubus"),
        }
    }
}

impl BrokerConfig {
    fn merge(&mut self, other: &Self) {
        if other.ubus_path != Self::default().ubus_path {
            self.ubus_path = other.ubus_path.clone();
        }
    }
}
