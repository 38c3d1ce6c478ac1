//! Directory scanning engine for sifter.
//!
//! This crate walks a directory (optionally recursively) with jwalk,
//! builds one [`Entry`] per filesystem node, hashes every non-empty file
//! with FNV-1a and returns the entries in listing order.
//!
//! # Example
//!
//! ```rust,no_run
//! use sifter_scan::{DirectoryScanner, ScanConfig};
//!
//! let config = ScanConfig::recursive("/path/to/scan");
//! let listing = DirectoryScanner::new().scan(&config);
//!
//! println!("{} entries, {} bytes", listing.len(), listing.stats.total_size);
//! ```
//!
//! # Progress Monitoring
//!
//! Scans run synchronously. A UI running the scan on a worker thread can
//! either pass a callback or subscribe to progress snapshots:
//!
//! ```rust,no_run
//! use sifter_scan::{DirectoryScanner, ScanConfig};
//!
//! let scanner = DirectoryScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! let listing = scanner.scan_with_progress(&ScanConfig::recursive("."), |count| {
//!     eprintln!("{count} items");
//! });
//! while let Ok(progress) = progress_rx.try_recv() {
//!     println!("hashed {} files", progress.files_hashed);
//! }
//! # drop(listing);
//! ```

mod hasher;
mod progress;
mod scanner;

pub use hasher::{ContentHasher, FNV_OFFSET_BASIS, FNV_PRIME, Fnv1a, Fnv1aHasher};
pub use progress::ScanProgress;
pub use scanner::{DirectoryScanner, scan_directory};

// Re-export core types for convenience
pub use sifter_core::{
    ContentHash, Entry, ScanConfig, ScanError, ScanListing, ScanStats, ScanWarning, WarningKind,
};
