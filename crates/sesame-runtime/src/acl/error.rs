//! ACL loading errors.

use sesame_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// A single ACL document that could not be used.
///
/// Recovered locally: the file is skipped and the scan continues.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// File could not be read.
    #[error("failed to read ACL file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid JSON.
    #[error("failed to parse ACL file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Top-level JSON value is not an object.
    #[error("ACL file '{path}' is not a JSON object")]
    NotAnObject { path: PathBuf },
}

impl DocumentError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    /// Creates a not-an-object error.
    pub fn not_an_object(path: impl Into<PathBuf>) -> Self {
        Self::NotAnObject { path: path.into() }
    }

    /// Returns the offending file.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::NotAnObject { path } => {
                path
            }
        }
    }
}

impl ErrorCode for DocumentError {
    fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "ACL_READ",
            Self::Parse { .. } => "ACL_PARSE",
            Self::NotAnObject { .. } => "ACL_NOT_AN_OBJECT",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}

/// The ACL directory scan itself could not run.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Configured file pattern is not a valid glob.
    #[error("invalid ACL file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}

impl ErrorCode for LibraryError {
    fn code(&self) -> &'static str {
        match self {
            Self::Pattern { .. } => "ACL_PATTERN",
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
