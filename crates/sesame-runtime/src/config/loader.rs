//! Configuration loader with hierarchical merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. System config (`/etc/sesame/config.toml`)
//! 3. Explicit config file (`--config`)
//! 4. Environment variables (`SESAME_*`)
//!
//! Each layer overrides the previous.

use super::{ConfigError, SesameConfig, SYSTEM_CONFIG_PATH};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Helper macro for parsing integer environment variables.
macro_rules! parse_env_u64 {
    ($field:expr, $var:literal) => {
        if let Ok(val) = std::env::var($var) {
            $field = val
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_env_var($var, "expected non-negative integer"))?;
        }
    };
}

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use sesame_runtime::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_config_file("/tmp/sesame.toml")
///     .skip_env_vars()
///     .load()?;
/// # Ok::<(), sesame_runtime::config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// System config path (defaults to `/etc/sesame/config.toml`).
    system_config_path: Option<PathBuf>,

    /// Explicit config file, layered over the system one.
    config_file: Option<PathBuf>,

    /// Skip environment variable loading.
    skip_env: bool,

    /// Skip system config loading.
    skip_system: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            system_config_path: None,
            config_file: None,
            skip_env: false,
            skip_system: false,
        }
    }

    /// Sets a custom system config path.
    #[must_use]
    pub fn with_system_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.system_config_path = Some(path.into());
        self
    }

    /// Sets an explicit config file.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips system config loading.
    #[must_use]
    pub fn skip_system_config(mut self) -> Self {
        self.skip_system = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any config file exists but cannot be parsed,
    /// or an environment variable holds an invalid value.
    /// Missing config files are silently ignored.
    pub fn load(&self) -> Result<SesameConfig, ConfigError> {
        let mut config = SesameConfig::default();

        // Layer 1: System config
        if !self.skip_system {
            let system_path = self
                .system_config_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(SYSTEM_CONFIG_PATH));

            if let Some(system_config) = self.load_file(&system_path)? {
                debug!(path = %system_path.display(), "Loaded system config");
                config.merge(&system_config);
            }
        }

        // Layer 2: Explicit file
        if let Some(ref path) = self.config_file {
            if let Some(file_config) = self.load_file(path)? {
                debug!(path = %path.display(), "Loaded config file");
                config.merge(&file_config);
            }
        }

        // Layer 3: Environment variables
        if !self.skip_env {
            self.apply_env_vars(&mut config)?;
        }

        Ok(config)
    }

    /// Loads a config file, returning None if it doesn't exist.
    fn load_file(&self, path: &Path) -> Result<Option<SesameConfig>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

        let config =
            SesameConfig::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

        Ok(Some(config))
    }

    /// Applies environment variable overrides.
    fn apply_env_vars(&self, config: &mut SesameConfig) -> Result<(), ConfigError> {
        parse_env_u64!(config.session.timeout_secs, "SESAME_SESSION_TIMEOUT");
        parse_env_u64!(config.session.call_timeout_ms, "SESAME_CALL_TIMEOUT_MS");

        if let Ok(val) = std::env::var("SESAME_ACL_DIR") {
            config.paths.acl_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("SESAME_UCI_DIR") {
            config.paths.uci_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("SESAME_UBUS_PATH") {
            config.broker.ubus_path = PathBuf::from(val);
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
