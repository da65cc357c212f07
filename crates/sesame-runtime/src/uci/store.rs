//! Configuration store implementations.

use super::{parse_package, StoreError, UciPackage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read access to a hierarchical configuration store.
///
/// # Contract
///
/// - `Ok(None)`: the package does not exist (fresh install). This is a
///   normal outcome, not an error.
/// - `Ok(Some(_))`: a snapshot of the package as of this call.
/// - `Err(_)`: the package exists but could not be loaded.
///
/// Implementations must be `Send + Sync` so one store can serve
/// concurrent logins.
pub trait ConfigStore: Send + Sync {
    /// Loads one package by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the package exists but is unreadable
    /// or malformed.
    fn load_package(&self, name: &str) -> Result<Option<UciPackage>, StoreError>;
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn load_package(&self, name: &str) -> Result<Option<UciPackage>, StoreError> {
        (**self).load_package(name)
    }
}

/// Store backed by UCI text files, one file per package.
///
/// # Example
///
/// ```no_run
/// use sesame_runtime::uci::{ConfigStore, UciFileStore};
///
/// let store = UciFileStore::new("/etc/config");
/// if let Some(luci) = store.load_package("luci")? {
///     println!("{} sections", luci.sections().len());
/// }
/// # Ok::<(), sesame_runtime::uci::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct UciFileStore {
    dir: PathBuf,
}

impl UciFileStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the configuration directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ConfigStore for UciFileStore {
    fn load_package(&self, name: &str) -> Result<Option<UciPackage>, StoreError> {
        if !is_valid_package_name(name) {
            return Err(StoreError::invalid_name(name));
        }

        let path = self.dir.join(name);
        if !path.exists() {
            debug!(path = %path.display(), "Config package not found");
            return Ok(None);
        }

        let text = std::fs::read_to_string(&path).map_err(|e| StoreError::read(&path, e))?;
        let package = parse_package(name, &text)?;

        debug!(
            path = %path.display(),
            sections = package.sections().len(),
            "Loaded config package"
        );
        Ok(Some(package))
    }
}

/// In-process store holding pre-built packages.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    packages: HashMap<String, UciPackage>,
}

impl MemoryConfigStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a package.
    #[must_use]
    pub fn with_package(mut self, package: UciPackage) -> Self {
        self.insert(package);
        self
    }

    /// Parses `text` as package `name` and adds it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`] if the text is malformed.
    pub fn with_text(self, name: &str, text: &str) -> Result<Self, StoreError> {
        Ok(self.with_package(parse_package(name, text)?))
    }

    /// Adds or replaces a package in place.
    pub fn insert(&mut self, package: UciPackage) {
        self.packages.insert(package.name().to_string(), package);
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load_package(&self, name: &str) -> Result<Option<UciPackage>, StoreError> {
        Ok(self.packages.get(name).cloned())
    }
}

fn is_valid_package_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
