//! Pre-deletion path safety classification.
//!
//! [`SafetyClassifier::check_deletion`] re-reads the environment and the mount
//! table on every call. Checks run from most to least catastrophic and the
//! first match wins:
//!
//! 1. system directory denylist
//! 2. the user's home directory
//! 3. virtual or memory-backed filesystems (fails closed)
//! 4. mount points
//! 5. removable media (advisory only)

use std::fs;
use std::path::{Component, Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::mounts::{MountInfo, MountTable};

/// Result of classifying a path before deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeletionStatus {
    Allowed,
    BlockedSystemPath,
    BlockedHome,
    BlockedMountPoint,
    BlockedVirtualFilesystem,
    WarningRemovableMedia,
}

impl DeletionStatus {
    /// Whether deletion must not proceed.
    pub fn is_blocked(self) -> bool {
        !matches!(self, Self::Allowed | Self::WarningRemovableMedia)
    }

    /// Whether the caller should ask the user before deleting.
    pub fn needs_confirmation(self) -> bool {
        !self.is_blocked()
    }

    /// Whether an extra removable-media warning applies.
    pub fn is_warning(self) -> bool {
        self == Self::WarningRemovableMedia
    }
}

impl std::fmt::Display for DeletionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Allowed => write!(f, "Allowed"),
            Self::BlockedSystemPath => write!(f, "Blocked (system path)"),
            Self::BlockedHome => write!(f, "Blocked (home directory)"),
            Self::BlockedMountPoint => write!(f, "Blocked (mount point)"),
            Self::BlockedVirtualFilesystem => write!(f, "Blocked (virtual filesystem)"),
            Self::WarningRemovableMedia => write!(f, "Warning (removable media)"),
        }
    }
}

/// Human-readable explanation of a status for `path`.
pub fn status_message(status: DeletionStatus, path: &Path) -> String {
    let path = path.display();
    match status {
        DeletionStatus::Allowed => format!("Deletion allowed: {path}"),
        DeletionStatus::BlockedSystemPath => format!("Cannot delete system directory: {path}"),
        DeletionStatus::BlockedHome => format!("Cannot delete your home directory: {path}"),
        DeletionStatus::BlockedMountPoint => format!("Cannot delete mount point: {path}"),
        DeletionStatus::BlockedVirtualFilesystem => {
            format!("Cannot delete virtual/system filesystem: {path}")
        }
        DeletionStatus::WarningRemovableMedia => format!("This is on removable media: {path}"),
    }
}

/// Sources and denylists used by the classifier.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct SafetyConfig {
    /// Directories that can never be deleted (exact match).
    pub system_paths: Vec<PathBuf>,

    /// Environment variable holding the user's home directory.
    pub home_var: String,

    /// Mount table to parse.
    pub mount_table: PathBuf,

    /// Directory exposing `<device>/removable` flags.
    pub sys_block_dir: PathBuf,

    /// Mount point prefixes treated as removable media.
    pub removable_prefixes: Vec<PathBuf>,

    /// Filesystem types that are never deletable.
    pub virtual_fs_types: Vec<String>,
}

impl SafetyConfig {
    pub fn builder() -> SafetyConfigBuilder {
        SafetyConfigBuilder::default()
    }
}

const SYSTEM_PATHS: &[&str] = &[
    "/", "/boot", "/dev", "/etc", "/home", "/lib", "/lib64", "/proc", "/root", "/run", "/sys",
    "/usr", "/var", "/bin", "/sbin", "/opt", "/srv", "/tmp",
];

const REMOVABLE_PREFIXES: &[&str] = &["/media", "/mnt", "/run/media"];

const VIRTUAL_FS_TYPES: &[&str] = &[
    "proc",
    "sysfs",
    "tmpfs",
    "ramfs",
    "devpts",
    "securityfs",
    "cgroup",
    "cgroup2",
];

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            system_paths: SYSTEM_PATHS.iter().map(PathBuf::from).collect(),
            home_var: "HOME".to_string(),
            mount_table: PathBuf::from("/proc/mounts"),
            sys_block_dir: PathBuf::from("/sys/block"),
            removable_prefixes: REMOVABLE_PREFIXES.iter().map(PathBuf::from).collect(),
            virtual_fs_types: VIRTUAL_FS_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Classifies paths by how dangerous deleting them would be.
#[derive(Debug, Clone, Default)]
pub struct SafetyClassifier {
    config: SafetyConfig,
}

impl SafetyClassifier {
    /// Create a classifier with the default Linux sources.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SafetyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Classify `path`. The first matching check wins.
    pub fn check_deletion(&self, path: &Path) -> DeletionStatus {
        let status = self.classify(path);
        tracing::debug!(path = %path.display(), %status, "safety check");
        status
    }

    fn classify(&self, path: &Path) -> DeletionStatus {
        let resolved = fs::canonicalize(path);
        let forms = path_forms(path, resolved.as_deref().ok());
        if self.matches_system_path(&forms) {
            return DeletionStatus::BlockedSystemPath;
        }
        if self.matches_home(&forms) {
            return DeletionStatus::BlockedHome;
        }

        let resolved = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::debug!(
                    path = %path.display(),
                    error = %err,
                    "cannot resolve path, treating as protected"
                );
                return DeletionStatus::BlockedVirtualFilesystem;
            }
        };

        let mounts = self.mount_points();
        if self.is_protected_filesystem(&mounts, &resolved) {
            return DeletionStatus::BlockedVirtualFilesystem;
        }
        if mounts.is_mount_point(&resolved) || mounts.is_mount_point(&normalize(path)) {
            return DeletionStatus::BlockedMountPoint;
        }
        if self.is_removable_media(&mounts, &resolved) {
            return DeletionStatus::WarningRemovableMedia;
        }
        DeletionStatus::Allowed
    }

    /// Whether `path`, as written or once `..` and symlinks are resolved,
    /// is on the system denylist.
    pub fn is_system_path(&self, path: &Path) -> bool {
        let resolved = fs::canonicalize(path).ok();
        self.matches_system_path(&path_forms(path, resolved.as_deref()))
    }

    /// Whether `path`, as written or once resolved, is the home directory.
    /// Unset or empty means no match.
    pub fn is_user_home(&self, path: &Path) -> bool {
        let resolved = fs::canonicalize(path).ok();
        self.matches_home(&path_forms(path, resolved.as_deref()))
    }

    /// Whether `path` lives on a virtual filesystem. Unresolvable paths count as protected.
    pub fn is_virtual_filesystem(&self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(resolved) => self.is_protected_filesystem(&self.mount_points(), &resolved),
            Err(_) => true,
        }
    }

    /// Whether `path` is exactly a mount point.
    pub fn is_mount_point(&self, path: &Path) -> bool {
        let mounts = self.mount_points();
        if mounts.is_mount_point(&normalize(path)) {
            return true;
        }
        fs::canonicalize(path)
            .map(|resolved| mounts.is_mount_point(&resolved))
            .unwrap_or(false)
    }

    /// Whether `path` sits on removable media.
    pub fn is_on_removable_media(&self, path: &Path) -> bool {
        match fs::canonicalize(path) {
            Ok(resolved) => self.is_removable_media(&self.mount_points(), &resolved),
            Err(_) => false,
        }
    }

    /// Fresh snapshot of the configured mount table.
    pub fn mount_points(&self) -> MountTable {
        MountTable::read_from(&self.config.mount_table, &self.config.removable_prefixes)
    }

    /// Filesystem type of the mount containing `path`, if known.
    pub fn filesystem_type(&self, path: &Path) -> Option<String> {
        let resolved = fs::canonicalize(path).ok()?;
        self.mount_points()
            .mount_for(&resolved)
            .map(|m| m.fs_type.clone())
    }

    fn home_dir(&self) -> Option<PathBuf> {
        std::env::var_os(&self.config.home_var)
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }

    fn matches_system_path(&self, forms: &[PathBuf]) -> bool {
        self.config
            .system_paths
            .iter()
            .any(|p| forms.contains(&normalize(p)))
    }

    fn matches_home(&self, forms: &[PathBuf]) -> bool {
        let Some(home) = self.home_dir() else {
            return false;
        };
        let mut homes = vec![normalize(&home), resolve_dots(&home)];
        homes.extend(fs::canonicalize(&home).ok());
        forms.iter().any(|form| homes.contains(form))
    }

    fn is_protected_filesystem(&self, mounts: &MountTable, resolved: &Path) -> bool {
        mounts
            .mount_for(resolved)
            .is_some_and(|m| self.config.virtual_fs_types.contains(&m.fs_type))
    }

    fn is_removable_media(&self, mounts: &MountTable, resolved: &Path) -> bool {
        if self
            .config
            .removable_prefixes
            .iter()
            .any(|prefix| resolved != prefix.as_path() && resolved.starts_with(prefix))
        {
            return true;
        }
        match mounts.mount_for(resolved) {
            Some(mount) => mount.is_removable || self.device_is_removable(mount),
            None => false,
        }
    }

    fn device_is_removable(&self, mount: &MountInfo) -> bool {
        let Some(name) = block_device_name(&mount.device) else {
            return false;
        };
        let flag = self.config.sys_block_dir.join(name).join("removable");
        fs::read_to_string(flag)
            .map(|content| content.trim() == "1")
            .unwrap_or(false)
    }
}

/// Map a partition device to its parent block device name.
///
/// `/dev/sdb1` gives `sdb`, `/dev/mmcblk0p1` gives `mmcblk0` and
/// `/dev/nvme0n1p2` gives `nvme0n1`. Non-`/dev` sources yield `None`.
pub fn block_device_name(device: &str) -> Option<&str> {
    let name = device.strip_prefix("/dev/")?;
    if name.is_empty() || name.contains('/') {
        return None;
    }

    let trimmed = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() == name.len() {
        return Some(name);
    }
    if let Some(base) = trimmed.strip_suffix('p') {
        if base.ends_with(|c: char| c.is_ascii_digit()) {
            return Some(base);
        }
    }
    if ["nvme", "mmcblk", "loop", "md"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
    {
        return Some(name);
    }
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed)
}

/// Drop trailing separators and `.` components.
fn normalize(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Like [`normalize`], but also folds `..` into the preceding component
/// without touching the filesystem.
fn resolve_dots(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Every spelling of `path` the denylist checks compare against: as
/// written, with `..` folded, and canonical when it exists.
fn path_forms(path: &Path, resolved: Option<&Path>) -> Vec<PathBuf> {
    let mut forms = vec![normalize(path)];
    let folded = resolve_dots(path);
    if !forms.contains(&folded) {
        forms.push(folded);
    }
    if let Some(resolved) = resolved {
        if !forms.iter().any(|f| f == resolved) {
            forms.push(resolved.to_path_buf());
        }
    }
    forms
}
