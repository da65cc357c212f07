//! ACL document library on disk.

use super::{AclDocument, DocumentError, LibraryError, DEFAULT_ACL_DIR, DEFAULT_ACL_PATTERN};
use sesame_auth::Permission;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A document together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// Source file.
    pub path: PathBuf,
    /// Parsed content.
    pub document: AclDocument,
}

/// Directory of ACL documents, read afresh on every call.
///
/// # Example
///
/// ```no_run
/// use sesame_runtime::acl::AclLibrary;
///
/// let library = AclLibrary::new("/usr/share/luci2/acl.d", "*.json");
/// for loaded in library.load()? {
///     match loaded {
///         Ok(doc) => println!("{}: {} groups", doc.path.display(), doc.document.groups().len()),
///         Err(e) => eprintln!("skipped: {e}"),
///     }
/// }
/// # Ok::<(), sesame_runtime::acl::LibraryError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AclLibrary {
    dir: PathBuf,
    pattern: String,
}

impl AclLibrary {
    /// Creates a library over `dir`, selecting files by `pattern`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// Returns the ACL directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Lists matching files in sorted order.
    ///
    /// A missing directory yields an empty list. Hidden files are skipped
    /// unless the pattern itself starts with a dot. Entries the glob walker
    /// cannot read are logged and left out.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError::Pattern`] if the file pattern is invalid.
    pub fn paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        let full = format!(
            "{}/{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            self.pattern
        );

        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::new()
        };
        let entries = glob::glob_with(&full, options).map_err(|source| LibraryError::Pattern {
            pattern: self.pattern.clone(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(error = %e, "Unreadable ACL directory entry");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        debug!(dir = %self.dir.display(), count = paths.len(), "Listed ACL files");
        Ok(paths)
    }

    /// Loads every matching file. Each file succeeds or fails on its own.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] only if the directory scan cannot start.
    pub fn load(&self) -> Result<Vec<Result<LoadedDocument, DocumentError>>, LibraryError> {
        Ok(self
            .paths()?
            .into_iter()
            .map(|path| {
                Self::load_file(&path).map(|document| LoadedDocument { path, document })
            })
            .collect())
    }

    /// Reads and parses one file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError`] if the file is unreadable, not JSON, or
    /// not a JSON object.
    pub fn load_file(path: &Path) -> Result<AclDocument, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|e| DocumentError::read(path, e))?;
        let value: serde_json::Value =
            serde_json::from_str(&text).map_err(|e| DocumentError::parse(path, e))?;
        AclDocument::from_value(&value).ok_or_else(|| DocumentError::not_an_object(path))
    }

    /// Merges every loadable document into a per-group summary.
    ///
    /// Groups appear in first-seen order. The first non-empty
    /// description wins; permission levels accumulate across files.
    /// Unloadable files are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LibraryError`] if the directory scan cannot start.
    pub fn catalog(&self) -> Result<Vec<GroupSummary>, LibraryError> {
        let mut summaries: Vec<GroupSummary> = Vec::new();

        for loaded in self.load()? {
            let loaded = match loaded {
                Ok(loaded) => loaded,
                Err(e) => {
                    warn!(error = %e, "Skipping ACL file");
                    continue;
                }
            };

            for group in loaded.document.groups() {
                let index = match summaries.iter().position(|s| s.name == group.name) {
                    Some(index) => index,
                    None => {
                        summaries.push(GroupSummary::new(&group.name));
                        summaries.len() - 1
                    }
                };
                let summary = &mut summaries[index];

                if summary.description.is_none() {
                    summary.description = group.description.clone().filter(|d| !d.is_empty());
                }
                for block in &group.blocks {
                    if !summary.permissions.contains(&block.permission) {
                        summary.permissions.push(block.permission);
                    }
                }
            }
        }

        for summary in &mut summaries {
            summary.permissions.sort();
        }
        Ok(summaries)
    }
}

impl Default for AclLibrary {
    fn default() -> Self {
        Self::new(DEFAULT_ACL_DIR, DEFAULT_ACL_PATTERN)
    }
}

/// One group as seen across the whole library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// Group name.
    pub name: String,
    /// First non-empty description found.
    pub description: Option<String>,
    /// Levels declared anywhere in the library, sorted.
    pub permissions: Vec<Permission>,
}

impl GroupSummary {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            permissions: Vec::new(),
        }
    }
}
