//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during scanning and hashing.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// The warning kind this error degrades to when tolerated mid-scan.
    pub fn warning_kind(&self) -> WarningKind {
        match self {
            Self::PermissionDenied { .. } => WarningKind::PermissionDenied,
            Self::NotFound { .. } => WarningKind::NotFound,
            _ => WarningKind::ReadError,
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Path disappeared or never existed.
    NotFound,
    /// Symbolic link target does not exist.
    BrokenSymlink,
    /// Error reading file/directory.
    ReadError,
    /// Error reading metadata.
    MetadataError,
}

/// Non-fatal warning encountered during scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a broken symlink warning.
    pub fn broken_symlink(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Broken symlink: {}", path.display()),
            path,
            kind: WarningKind::BrokenSymlink,
        }
    }

    /// Create a missing scan root warning.
    pub fn missing_root(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("Not a readable directory: {}", path.display()),
            path,
            kind: WarningKind::NotFound,
        }
    }
}

impl From<ScanError> for ScanWarning {
    fn from(err: ScanError) -> Self {
        let kind = err.warning_kind();
        let path = match &err {
            ScanError::PermissionDenied { path }
            | ScanError::NotFound { path }
            | ScanError::Io { path, .. } => path.clone(),
            ScanError::InvalidConfig { .. } => PathBuf::new(),
        };
        Self::new(path, err.to_string(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_io() {
        let err = ScanError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, ScanError::PermissionDenied { .. }));
    }

    #[test]
    fn test_warning_from_error() {
        let err = ScanError::io(
            "/gone",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        let warning = ScanWarning::from(err);
        assert_eq!(warning.kind, WarningKind::NotFound);
        assert_eq!(warning.path, PathBuf::from("/gone"));
        assert!(warning.message.contains("/gone"));
    }
}
