//! Core types for sifter.
//!
//! This crate provides the data structures shared by the scanner, the
//! duplicate finder and the deletion layer: scanned entries, content
//! hashes, scan configuration and warnings.

mod config;
mod entry;
mod error;
mod listing;

pub use config::{
    LISTING_PROGRESS_INTERVAL, RECURSIVE_PROGRESS_INTERVAL, ScanConfig, ScanConfigBuilder,
};
pub use entry::{ContentHash, Entry, sort_entries};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use listing::{ScanListing, ScanStats};
