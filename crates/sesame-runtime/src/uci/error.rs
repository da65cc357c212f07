//! Configuration store errors.

use sesame_types::ErrorCode;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a configuration package.
///
/// A *missing* package is not an error; stores report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Package name contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid package name '{0}'")]
    InvalidName(String),

    /// Package file exists but could not be read.
    #[error("failed to read package file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Package text is malformed.
    #[error("parse error in package '{package}' line {line}: {message}")]
    Parse {
        package: String,
        line: usize,
        message: String,
    },
}

impl StoreError {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }

    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error.
    pub fn parse(package: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            package: package.into(),
            line,
            message: message.into(),
        }
    }
}

impl ErrorCode for StoreError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "STORE_INVALID_NAME",
            Self::Read { .. } => "STORE_READ",
            Self::Parse { .. } => "STORE_PARSE",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}
