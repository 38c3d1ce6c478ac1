//! Zero-byte file detection.
//!
//! Empty files are never hashed, so they cannot show up in duplicate groups.
//! They are still worth reporting: a zero-byte file is often the leftover of
//! an interrupted copy or download.

use sifter_core::Entry;

/// Indices of zero-byte, non-directory entries, in slice order.
pub fn find_empty_files(entries: &[Entry]) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_empty_file())
        .map(|(i, _)| i)
        .collect()
}
