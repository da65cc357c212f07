//! Configuration with layered overrides.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌──────────────────────────────────────────┐
//! │  1. CLI flags (applied by the caller)    │
//! ├──────────────────────────────────────────┤
//! │  2. Environment variables (SESAME_*)     │
//! ├──────────────────────────────────────────┤
//! │  3. Explicit file (--config)             │
//! ├──────────────────────────────────────────┤
//! │  4. System file (/etc/sesame/config.toml)│
//! ├──────────────────────────────────────────┤
//! │  5. Default values                       │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `SESAME_ACL_DIR` | `paths.acl_dir` | PathBuf |
//! | `SESAME_UCI_DIR` | `paths.uci_dir` | PathBuf |
//! | `SESAME_SESSION_TIMEOUT` | `session.timeout_secs` | u64 |
//! | `SESAME_CALL_TIMEOUT_MS` | `session.call_timeout_ms` | u64 |
//! | `SESAME_UBUS_PATH` | `broker.ubus_path` | PathBuf |
//!
//! # Example Configuration
//!
//! ```toml
//! [paths]
//! acl_dir = "/usr/share/luci2/acl.d"
//! acl_pattern = "*.json"
//! uci_dir = "/etc/config"
//!
//! [session]
//! timeout_secs = 3600
//! call_timeout_ms = 500
//!
//! [broker]
//! ubus_path = "ubus"
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use types::{BrokerConfig, PathsConfig, SesameConfig, SessionConfig};

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/sesame/config.toml";
