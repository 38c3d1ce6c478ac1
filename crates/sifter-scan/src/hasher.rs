//! FNV-1a content hashing.
//!
//! FNV-1a is a fast, non-cryptographic hash. Files are processed as raw
//! bytes, so the digest of a given byte sequence is the same on every
//! platform. Accidental collisions are possible in principle and accepted
//! in exchange for throughput on large trees.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sifter_core::{ContentHash, ScanError};

/// 64-bit FNV offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// 64-bit FNV prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming FNV-1a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a {
    state: u64,
}

impl Fnv1a {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    /// Fold a chunk of bytes into the state.
    pub fn update(&mut self, bytes: &[u8]) {
        let mut h = self.state;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(FNV_PRIME);
        }
        self.state = h;
    }

    pub fn digest(&self) -> ContentHash {
        ContentHash::new(self.state)
    }

    /// Hash an in-memory byte slice in one go.
    pub fn hash_bytes(bytes: &[u8]) -> ContentHash {
        let mut hasher = Self::new();
        hasher.update(bytes);
        hasher.digest()
    }
}

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

impl std::hash::Hasher for Fnv1a {
    fn write(&mut self, bytes: &[u8]) {
        self.update(bytes);
    }

    fn finish(&self) -> u64 {
        self.state
    }
}

/// Computes a content digest for a file.
///
/// Implementations must not depend on thread-local or global mutable state,
/// so a scan can run on any thread.
pub trait ContentHasher: Send + Sync {
    /// Hash the full content of the file at `path`.
    fn hash_file(&self, path: &Path) -> Result<ContentHash, ScanError>;

    /// Fail-soft variant: `None` when the file cannot be read.
    fn digest(&self, path: &Path) -> Option<ContentHash> {
        self.hash_file(path).ok()
    }
}

/// File hasher using buffered reads and FNV-1a.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    buffer_size: usize,
}

impl Fnv1aHasher {
    pub fn new() -> Self {
        Self {
            buffer_size: READ_BUFFER_SIZE,
        }
    }

    /// Use a custom read buffer size (minimum 1 byte).
    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher for Fnv1aHasher {
    fn hash_file(&self, path: &Path) -> Result<ContentHash, ScanError> {
        let mut file = File::open(path).map_err(|e| ScanError::io(path, e))?;
        let mut hasher = Fnv1a::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(ScanError::io(path, e)),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(hasher.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::hash::Hasher;
    use tempfile::TempDir;

    #[test]
    fn test_known_vectors() {
        assert_eq!(Fnv1a::hash_bytes(b"").to_hex(), "CBF29CE484222325");
        assert_eq!(Fnv1a::hash_bytes(b"a").to_hex(), "AF63DC4C8601EC8C");
        assert_eq!(
            Fnv1a::hash_bytes(b"hello world").to_hex(),
            "779A65E7023CD2E7"
        );
    }

    #[test]
    fn test_streaming_matches_one_shot() {
        let mut hasher = Fnv1a::new();
        hasher.update(b"hello ");
        hasher.update(b"world");
        assert_eq!(hasher.digest(), Fnv1a::hash_bytes(b"hello world"));
        assert_eq!(hasher.finish(), 0x779A65E7023CD2E7);
    }

    #[test]
    fn test_hash_file_small_buffer() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hello.txt");
        fs::write(&path, "hello world").unwrap();

        let hash = Fnv1aHasher::with_buffer_size(3).hash_file(&path).unwrap();
        assert_eq!(hash, Fnv1a::hash_bytes(b"hello world"));
    }

    #[test]
    fn test_missing_file_is_soft_failure() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");

        let hasher = Fnv1aHasher::new();
        assert!(matches!(
            hasher.hash_file(&missing),
            Err(ScanError::NotFound { .. })
        ));
        assert_eq!(hasher.digest(&missing), None);
    }
}
