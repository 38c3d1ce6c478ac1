//! JWalk-based directory scanner.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use globset::GlobSet;
use jwalk::{Parallelism, WalkDir};
use tokio::sync::broadcast;

use sifter_core::{
    Entry, ScanConfig, ScanError, ScanListing, ScanStats, ScanWarning, WarningKind, sort_entries,
};

use crate::hasher::{ContentHasher, Fnv1aHasher};
use crate::progress::{ProgressTracker, ScanProgress};

/// Scanner producing a sorted, hashed entry list for a directory.
///
/// Scanning is synchronous and single-threaded. Progress can be observed
/// either through the callback passed to [`DirectoryScanner::scan_with_progress`]
/// or by subscribing to the broadcast channel from another thread.
pub struct DirectoryScanner<H = Fnv1aHasher> {
    hasher: H,
    progress_tx: broadcast::Sender<ScanProgress>,
}

impl DirectoryScanner<Fnv1aHasher> {
    /// Create a new scanner using the FNV-1a hasher.
    pub fn new() -> Self {
        Self::with_hasher(Fnv1aHasher::new())
    }
}

impl Default for DirectoryScanner<Fnv1aHasher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ContentHasher> DirectoryScanner<H> {
    /// Create a scanner with a custom content hasher.
    pub fn with_hasher(hasher: H) -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            hasher,
            progress_tx,
        }
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Perform a scan without a progress callback.
    pub fn scan(&self, config: &ScanConfig) -> ScanListing {
        self.scan_with_progress(config, |_| {})
    }

    /// Perform a scan, calling `on_progress` with the running item count.
    ///
    /// The callback fires every `effective_progress_interval()` items and
    /// once more with the final count. Partial failures are recorded as
    /// warnings; an unreadable root yields an empty listing.
    pub fn scan_with_progress<F>(&self, config: &ScanConfig, mut on_progress: F) -> ScanListing
    where
        F: FnMut(u64),
    {
        let start = Instant::now();
        let root = config.root.as_path();

        match fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                tracing::warn!(root = %root.display(), "scan root is not a directory");
                return ScanListing::empty(
                    root.to_path_buf(),
                    vec![ScanWarning::missing_root(root)],
                );
            }
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "scan root unreadable");
                let warning = ScanWarning::from(ScanError::io(root, err));
                return ScanListing::empty(root.to_path_buf(), vec![warning]);
            }
        }

        let mut entries = Vec::new();
        let mut stats = ScanStats::new();
        let mut warnings = Vec::new();
        let mut tracker = ProgressTracker::new(config.effective_progress_interval());

        if config.wants_parent_entry() {
            if let Some(parent) = parent_of(root) {
                entries.push(Entry::parent(parent));
            }
        }

        let walker = self.build_walker(config);

        for entry_result in walker {
            let dir_entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    let kind = match err.io_error().map(std::io::Error::kind) {
                        Some(std::io::ErrorKind::PermissionDenied) => WarningKind::PermissionDenied,
                        Some(std::io::ErrorKind::NotFound) => WarningKind::NotFound,
                        _ => WarningKind::ReadError,
                    };
                    tracing::debug!(
                        path = %path.display(),
                        error = %err,
                        "skipping unreadable entry"
                    );
                    warnings.push(ScanWarning::new(path, err.to_string(), kind));
                    tracker.record_error();
                    continue;
                }
            };

            let path = dir_entry.path();
            let file_type = dir_entry.file_type();

            let (is_dir, size) = if file_type.is_symlink() {
                match fs::metadata(&path) {
                    Ok(target) if target.is_dir() => (true, 0),
                    Ok(target) => (false, target.len()),
                    Err(_) => {
                        warnings.push(ScanWarning::broken_symlink(&path));
                        tracker.record_error();
                        (false, 0)
                    }
                }
            } else if file_type.is_dir() {
                (true, 0)
            } else {
                match dir_entry.metadata() {
                    Ok(meta) => (false, meta.len()),
                    Err(err) => {
                        warnings.push(ScanWarning::new(
                            &path,
                            err.to_string(),
                            WarningKind::MetadataError,
                        ));
                        tracker.record_error();
                        (false, 0)
                    }
                }
            };

            let mut entry = if is_dir {
                Entry::directory(&path)
            } else {
                Entry::file(&path, size)
            };

            if config.compute_hashes && entry.needs_hash() {
                match self.hasher.hash_file(&path) {
                    Ok(hash) => {
                        entry.set_hash(Some(hash));
                        tracker.record_hash(size);
                    }
                    Err(err) => {
                        tracing::debug!(path = %path.display(), error = %err, "hashing failed");
                        warnings.push(ScanWarning::from(err));
                        tracker.record_error();
                    }
                }
            }

            stats.record(&entry);
            entries.push(entry);

            if tracker.record_item(path) {
                on_progress(tracker.items_scanned());
                let _ = self.progress_tx.send(tracker.snapshot(false));
            }
        }

        on_progress(tracker.items_scanned());
        let _ = self.progress_tx.send(tracker.snapshot(true));

        sort_entries(&mut entries);

        let scan_duration = start.elapsed();
        tracing::debug!(
            root = %root.display(),
            entries = entries.len(),
            hashed = stats.hashed_files,
            warnings = warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "scan finished"
        );

        ScanListing::new(entries, root.to_path_buf(), stats, scan_duration, warnings)
    }

    /// Configure the walker for the requested depth and filters.
    fn build_walker(&self, config: &ScanConfig) -> WalkDir {
        let max_depth = if config.recursive { usize::MAX } else { 1 };

        let walker = WalkDir::new(&config.root)
            .parallelism(Parallelism::Serial)
            .skip_hidden(!config.include_hidden)
            .follow_links(config.follow_symlinks)
            .min_depth(1)
            .max_depth(max_depth);

        let matcher = match config.ignore_matcher() {
            Ok(m) => m,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring invalid ignore patterns");
                GlobSet::empty()
            }
        };
        if matcher.is_empty() {
            return walker;
        }

        let matcher = Arc::new(matcher);
        walker.process_read_dir(move |_depth, _path, _state, children| {
            children.retain(|child| match child {
                Ok(e) => !matcher.is_match(e.file_name()),
                Err(_) => true,
            });
        })
    }
}

/// Parent of the scan root, if it has a non-empty one.
fn parent_of(root: &Path) -> Option<PathBuf> {
    root.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

/// Scan `root` with the default hasher and return just the entries.
///
/// Convenience wrapper for callers that do not need warnings or stats.
pub fn scan_directory(
    root: impl Into<PathBuf>,
    recursive: bool,
    include_parent: bool,
    progress: Option<&mut dyn FnMut(u64)>,
) -> Vec<Entry> {
    let mut config = ScanConfig::new(root);
    config.recursive = recursive;
    config.include_parent = include_parent;

    let scanner = DirectoryScanner::new();
    let listing = match progress {
        Some(callback) => scanner.scan_with_progress(&config, callback),
        None => scanner.scan(&config),
    };
    listing.into_entries()
}
