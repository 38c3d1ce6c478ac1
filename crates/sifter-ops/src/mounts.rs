//! Mount table parsing.
//!
//! Rows follow the `/proc/mounts` layout: device, mount point, filesystem
//! type, options, dump, pass. Whitespace inside fields is escaped by the
//! kernel as three-digit octal sequences (`\040` for a space).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One row of the mount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountInfo {
    /// Mounted device or source (`/dev/sda1`, `tmpfs`, ...).
    pub device: String,
    /// Where the filesystem is mounted.
    pub mount_point: PathBuf,
    /// Filesystem type name.
    pub fs_type: String,
    /// Raw mount options.
    pub options: String,
    /// Mounted at `/`.
    pub is_root: bool,
    /// Mount point sits under a removable-media prefix.
    pub is_removable: bool,
}

/// Snapshot of the mount table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountTable {
    mounts: Vec<MountInfo>,
}

impl MountTable {
    /// Parse mount table text, flagging mounts under any of `removable_prefixes`.
    pub fn parse<P: AsRef<Path>>(content: &str, removable_prefixes: &[P]) -> Self {
        let mounts = content
            .lines()
            .filter_map(|line| parse_line(line, removable_prefixes))
            .collect();
        Self { mounts }
    }

    /// Read and parse a mount table file. An unreadable file yields an empty table.
    pub fn read_from<P: AsRef<Path>>(source: &Path, removable_prefixes: &[P]) -> Self {
        match fs::read_to_string(source) {
            Ok(content) => Self::parse(&content, removable_prefixes),
            Err(err) => {
                tracing::debug!(
                    source = %source.display(),
                    error = %err,
                    "mount table unavailable"
                );
                Self::default()
            }
        }
    }

    /// All parsed mounts in table order.
    pub fn mounts(&self) -> &[MountInfo] {
        &self.mounts
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// The mount containing `path`: the one with the longest matching mount point.
    ///
    /// When the same mount point appears more than once, the later row wins,
    /// matching what the kernel shows for stacked mounts.
    pub fn mount_for(&self, path: &Path) -> Option<&MountInfo> {
        let mut best: Option<&MountInfo> = None;
        for mount in &self.mounts {
            if !path.starts_with(&mount.mount_point) {
                continue;
            }
            let depth = mount.mount_point.components().count();
            match best {
                Some(current) if current.mount_point.components().count() > depth => {}
                _ => best = Some(mount),
            }
        }
        best
    }

    /// Whether `path` is exactly a mount point.
    pub fn is_mount_point(&self, path: &Path) -> bool {
        self.mounts.iter().any(|m| m.mount_point == path)
    }
}

fn parse_line<P: AsRef<Path>>(line: &str, removable_prefixes: &[P]) -> Option<MountInfo> {
    let mut fields = line.split_whitespace();
    let device = unescape(fields.next()?);
    let mount_point = PathBuf::from(unescape(fields.next()?));
    let fs_type = unescape(fields.next()?);
    let options = fields.next().map(unescape).unwrap_or_default();

    let is_root = mount_point == Path::new("/");
    let is_removable = removable_prefixes
        .iter()
        .any(|prefix| mount_point.starts_with(prefix));

    Some(MountInfo {
        device,
        mount_point,
        fs_type,
        options,
        is_root,
        is_removable,
    })
}

/// Decode `\NNN` octal escapes. Malformed sequences are kept verbatim.
fn unescape(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_triplet(&bytes[i + 1..i + 4]) {
            let value = (bytes[i + 1] - b'0') as u32 * 64
                + (bytes[i + 2] - b'0') as u32 * 8
                + (bytes[i + 3] - b'0') as u32;
            if let Ok(byte) = u8::try_from(value) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_triplet(digits: &[u8]) -> bool {
    digits.len() == 3 && digits.iter().all(|d| (b'0'..=b'7').contains(d))
}
