//! Progress and result types for deletions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Progress of an ongoing recursive deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionProgress {
    /// Total items to delete, counted up front (root included).
    pub total: u64,
    /// Items deleted so far.
    pub deleted: u64,
    /// Items that failed to delete.
    pub failed: u64,
    /// Bytes freed so far.
    pub bytes_freed: u64,
    /// Item most recently processed.
    pub current: Option<PathBuf>,
}

impl DeletionProgress {
    /// Create new deletion progress.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Get completion percentage.
    pub fn percentage(&self) -> u16 {
        if self.total > 0 {
            let done = (self.deleted + self.failed).min(self.total);
            (done as f64 / self.total as f64 * 100.0) as u16
        } else {
            0
        }
    }

    pub(crate) fn record(&mut self, path: PathBuf, bytes: u64, ok: bool) {
        if ok {
            self.deleted += 1;
            self.bytes_freed += bytes;
        } else {
            self.failed += 1;
        }
        self.current = Some(path);
    }
}

/// Result of a completed deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionSummary {
    /// The path that was removed.
    pub path: PathBuf,
    /// Number of items removed, root included.
    pub deleted: u64,
    /// Bytes of regular file content freed.
    pub bytes_freed: u64,
}

impl DeletionSummary {
    /// Get a human-readable summary of the deletion.
    pub fn message(&self) -> String {
        if self.deleted == 1 {
            format!("Deleted {}", self.path.display())
        } else {
            format!("Deleted {} ({} items)", self.path.display(), self.deleted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage() {
        let mut progress = DeletionProgress::new(4);
        assert_eq!(progress.percentage(), 0);

        progress.record(PathBuf::from("/a"), 10, true);
        progress.record(PathBuf::from("/b"), 10, false);
        assert_eq!(progress.percentage(), 50);
        assert_eq!(progress.bytes_freed, 10);
        assert_eq!(progress.current, Some(PathBuf::from("/b")));

        assert_eq!(DeletionProgress::new(0).percentage(), 0);
    }

    #[test]
    fn test_summary_message() {
        let single = DeletionSummary {
            path: PathBuf::from("/tmp/x"),
            deleted: 1,
            bytes_freed: 3,
        };
        assert_eq!(single.message(), "Deleted /tmp/x");

        let tree = DeletionSummary {
            deleted: 5,
            ..single
        };
        assert_eq!(tree.message(), "Deleted /tmp/x (5 items)");
    }
}
