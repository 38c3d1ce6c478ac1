//! Scan result container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::ScanWarning;

/// Summary statistics for a scan pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of non-directory entries.
    pub total_files: u64,
    /// Number of directory entries (the synthetic parent is not counted).
    pub total_dirs: u64,
    /// Sum of all file sizes.
    pub total_size: u64,
    /// Files that received a content hash.
    pub hashed_files: u64,
    /// Zero-byte files.
    pub empty_files: u64,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with an entry.
    pub fn record(&mut self, entry: &Entry) {
        if entry.is_parent() {
            return;
        }
        if entry.is_dir() {
            self.total_dirs += 1;
            return;
        }
        self.total_files += 1;
        self.total_size += entry.size();
        if entry.hash().is_some() {
            self.hashed_files += 1;
        }
        if entry.is_empty_file() {
            self.empty_files += 1;
        }
    }

    /// Total number of entries recorded.
    pub fn total_items(&self) -> u64 {
        self.total_files + self.total_dirs
    }
}

/// Ordered result of one scan pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanListing {
    /// Entries in listing order.
    pub entries: Vec<Entry>,

    /// Root path that was scanned.
    pub root_path: PathBuf,

    /// When this scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Summary statistics.
    pub stats: ScanStats,

    /// Warnings encountered during scan.
    pub warnings: Vec<ScanWarning>,
}

impl ScanListing {
    /// Create a new listing.
    pub fn new(
        entries: Vec<Entry>,
        root_path: PathBuf,
        stats: ScanStats,
        scan_duration: Duration,
        warnings: Vec<ScanWarning>,
    ) -> Self {
        Self {
            entries,
            root_path,
            scanned_at: SystemTime::now(),
            scan_duration,
            stats,
            warnings,
        }
    }

    /// Create an empty listing, e.g. for a root that cannot be read.
    pub fn empty(root_path: PathBuf, warnings: Vec<ScanWarning>) -> Self {
        Self::new(
            Vec::new(),
            root_path,
            ScanStats::new(),
            Duration::ZERO,
            warnings,
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Take ownership of the entries.
    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
