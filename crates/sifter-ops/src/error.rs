//! Error types for deletion.

use std::path::PathBuf;

use thiserror::Error;

/// A single item that could not be removed during a recursive deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedItem {
    /// The path that could not be removed.
    pub path: PathBuf,
    /// A human-readable error message.
    pub message: String,
}

impl FailedItem {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FailedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// Errors that can occur while deleting files and directories.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory operation was requested on something else.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Some items of a recursive deletion could not be removed.
    #[error("Deleted {deleted} items, {} failed under {path}", failures.len())]
    Incomplete {
        path: PathBuf,
        deleted: u64,
        failures: Vec<FailedItem>,
    },
}

impl DeleteError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }

    /// The path the error refers to.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::PermissionDenied { path }
            | Self::Io { path, .. }
            | Self::NotADirectory { path }
            | Self::Incomplete { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_classification() {
        let err = DeleteError::io("/x", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, DeleteError::NotFound { .. }));

        let err = DeleteError::io("/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, DeleteError::PermissionDenied { .. }));

        let err = DeleteError::io("/x", io::Error::other("boom"));
        assert!(matches!(err, DeleteError::Io { .. }));
        assert_eq!(err.path(), std::path::Path::new("/x"));
    }

    #[test]
    fn test_incomplete_message() {
        let err = DeleteError::Incomplete {
            path: PathBuf::from("/data"),
            deleted: 3,
            failures: vec![FailedItem::new("/data/a", "busy")],
        };
        assert_eq!(err.to_string(), "Deleted 3 items, 1 failed under /data");
    }
}
