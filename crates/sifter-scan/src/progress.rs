//! Scan progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Entries processed so far (files and directories).
    pub items_scanned: u64,
    /// Files hashed so far.
    pub files_hashed: u64,
    /// Bytes hashed so far.
    pub bytes_hashed: u64,
    /// Most recently processed path.
    pub current_path: PathBuf,
    /// Number of warnings encountered.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
    /// Set on the final report of a pass.
    pub finished: bool,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            items_scanned: 0,
            files_hashed: 0,
            bytes_hashed: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
            finished: false,
        }
    }

    /// Hashing throughput in bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.bytes_hashed as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal progress tracker with timing and throttling.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    interval: u64,
    items_scanned: u64,
    files_hashed: u64,
    bytes_hashed: u64,
    errors_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new(interval: u64) -> Self {
        Self {
            start_time: Instant::now(),
            interval: interval.max(1),
            items_scanned: 0,
            files_hashed: 0,
            bytes_hashed: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
        }
    }

    /// Record one processed entry. Returns `true` when a report is due.
    pub fn record_item(&mut self, path: PathBuf) -> bool {
        self.items_scanned += 1;
        self.current_path = path;
        self.items_scanned % self.interval == 0
    }

    pub fn record_hash(&mut self, size: u64) {
        self.files_hashed += 1;
        self.bytes_hashed += size;
    }

    pub fn record_error(&mut self) {
        self.errors_count += 1;
    }

    pub fn items_scanned(&self) -> u64 {
        self.items_scanned
    }

    pub fn snapshot(&self, finished: bool) -> ScanProgress {
        ScanProgress {
            items_scanned: self.items_scanned,
            files_hashed: self.files_hashed,
            bytes_hashed: self.bytes_hashed,
            current_path: self.current_path.clone(),
            errors_count: self.errors_count,
            elapsed: self.start_time.elapsed(),
            finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_throttles() {
        let mut tracker = ProgressTracker::new(3);
        let due: Vec<bool> = (0..7)
            .map(|i| tracker.record_item(PathBuf::from(format!("/f{i}"))))
            .collect();
        assert_eq!(due, vec![false, false, true, false, false, true, false]);
        assert_eq!(tracker.items_scanned(), 7);
    }

    #[test]
    fn test_snapshot() {
        let mut tracker = ProgressTracker::new(10);
        tracker.record_item(PathBuf::from("/a"));
        tracker.record_hash(512);
        tracker.record_error();

        let snap = tracker.snapshot(true);
        assert_eq!(snap.items_scanned, 1);
        assert_eq!(snap.files_hashed, 1);
        assert_eq!(snap.bytes_hashed, 512);
        assert_eq!(snap.errors_count, 1);
        assert_eq!(snap.current_path, PathBuf::from("/a"));
        assert!(snap.finished);
    }

    #[test]
    fn test_bytes_per_second() {
        let mut progress = ScanProgress::new();
        progress.bytes_hashed = 4096;
        assert_eq!(progress.bytes_per_second(), 0.0);

        progress.elapsed = Duration::from_secs(2);
        assert_eq!(progress.bytes_per_second(), 2048.0);
    }
}
