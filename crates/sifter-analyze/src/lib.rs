//! Analysis algorithms for sifter.
//!
//! This crate works on entries produced by `sifter-scan`:
//!
//! - **Duplicate detection** - group entries by FNV-1a content hash and
//!   account for reclaimable space
//! - **Empty files** - list zero-byte files, which hashing skips
//!
//! # Duplicate Detection
//!
//! ```rust,ignore
//! use sifter_analyze::{DuplicateFinder, DuplicateReport};
//! use sifter_scan::{DirectoryScanner, ScanConfig};
//!
//! let mut entries = DirectoryScanner::new()
//!     .scan(&ScanConfig::recursive("/path/to/scan"))
//!     .into_entries();
//!
//! let report = DuplicateReport::new(DuplicateFinder::new().find_duplicates(&mut entries));
//!
//! println!("Found {} duplicate groups", report.group_count);
//! println!("Wasted space: {} bytes", report.total_wasted_space);
//! for group in &report.groups {
//!     for path in group.paths(&entries) {
//!         println!("  {}", path.display());
//!     }
//! }
//! ```

mod duplicates;
mod empty;

pub use duplicates::{DuplicateFinder, DuplicateGroup, DuplicateReport, calculate_wasted_space};
pub use empty::find_empty_files;

// Re-export core types
pub use sifter_core::{ContentHash, Entry};
