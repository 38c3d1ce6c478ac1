//! Scanned entry and content hash types.

use std::cmp::Ordering;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// FNV-1a 64-bit content digest used for duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash(pub u64);

impl ContentHash {
    /// Create a new ContentHash from a raw 64-bit value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw 64-bit value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Get the hash as a 16-digit, zero-padded, uppercase hex string.
    pub fn to_hex(&self) -> String {
        format!("{:016X}", self.0)
    }

    /// Parse a hex digest as produced by [`ContentHash::to_hex`].
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.is_empty() || hex.len() > 16 {
            return None;
        }
        u64::from_str_radix(hex, 16).ok().map(Self)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// One filesystem node discovered by a scan.
///
/// Only the hash and the duplicate flag change after construction. A directory
/// never carries a hash, and the synthetic parent entry is always a directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    path: PathBuf,
    size: u64,
    is_dir: bool,
    is_parent: bool,
    hash: Option<ContentHash>,
    is_duplicate: bool,
}

impl Entry {
    /// Create a non-directory entry.
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            is_dir: false,
            is_parent: false,
            hash: None,
            is_duplicate: false,
        }
    }

    /// Create a directory entry. Directories always have size 0.
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            is_dir: true,
            is_parent: false,
            hash: None,
            is_duplicate: false,
        }
    }

    /// Create the synthetic ".." entry pointing at `path`.
    pub fn parent(path: impl Into<PathBuf>) -> Self {
        Self {
            is_parent: true,
            ..Self::directory(path)
        }
    }

    /// Builder-style variant of [`Entry::set_hash`].
    pub fn with_hash(mut self, hash: ContentHash) -> Self {
        self.set_hash(Some(hash));
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes (0 for directories).
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn is_parent(&self) -> bool {
        self.is_parent
    }

    pub fn hash(&self) -> Option<ContentHash> {
        self.hash
    }

    pub fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }

    /// Attach or clear the content hash.
    ///
    /// Returns `false` and leaves the entry untouched when called on a
    /// directory.
    pub fn set_hash(&mut self, hash: Option<ContentHash>) -> bool {
        if self.is_dir {
            return false;
        }
        self.hash = hash;
        true
    }

    pub fn set_duplicate(&mut self, duplicate: bool) {
        self.is_duplicate = duplicate;
    }

    /// Check if this is a zero-byte non-directory entry.
    pub fn is_empty_file(&self) -> bool {
        !self.is_dir && self.size == 0
    }

    /// Check if this entry should be run through the content hasher.
    pub fn needs_hash(&self) -> bool {
        !self.is_dir && self.size > 0
    }

    /// Check if this entry can take part in duplicate grouping.
    pub fn is_groupable(&self) -> bool {
        self.needs_hash() && self.hash.is_some()
    }

    /// Final path segment, or the whole path when it has none (e.g. `/`).
    pub fn name(&self) -> &OsStr {
        self.path
            .file_name()
            .unwrap_or_else(|| self.path.as_os_str())
    }

    /// Name for listings: `..` for the parent entry, a trailing `/` for directories.
    pub fn display_name(&self) -> String {
        if self.is_parent {
            return "..".to_string();
        }
        let name = self.name().to_string_lossy();
        if self.is_dir && self.path.file_name().is_some() {
            format!("{name}/")
        } else {
            name.into_owned()
        }
    }

    /// Listing order: parent entry first, then directories, then files, each
    /// tier by case-sensitive name.
    pub fn listing_order(a: &Entry, b: &Entry) -> Ordering {
        b.is_parent
            .cmp(&a.is_parent)
            .then_with(|| b.is_dir.cmp(&a.is_dir))
            .then_with(|| a.name().cmp(b.name()))
    }
}

/// Sort entries into listing order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(Entry::listing_order);
}
