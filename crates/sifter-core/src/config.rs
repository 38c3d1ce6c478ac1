//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Progress interval for single-directory scans.
pub const LISTING_PROGRESS_INTERVAL: u64 = 10;

/// Progress interval for recursive scans, which are usually far larger.
pub const RECURSIVE_PROGRESS_INTERVAL: u64 = 100;

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// Walk the full subtree instead of direct children only.
    #[builder(default = "false")]
    #[serde(default)]
    pub recursive: bool,

    /// Prepend a synthetic ".." entry (ignored in recursive mode).
    #[builder(default = "false")]
    #[serde(default)]
    pub include_parent: bool,

    /// Follow symbolic links while walking.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Glob patterns matched against entry names; matching directories are pruned.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Compute content hashes for non-empty files.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub compute_hashes: bool,

    /// Report progress every N entries (None = mode default).
    #[builder(default)]
    #[serde(default)]
    pub progress_interval: Option<u64>,
}

fn default_true() -> bool {
    true
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        if let Some(Some(0)) = self.progress_interval {
            return Err("Progress interval must be at least 1".to_string());
        }
        if let Some(ref patterns) = self.ignore_patterns {
            compile_patterns(patterns).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple non-recursive config for listing a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            include_parent: false,
            follow_symlinks: false,
            include_hidden: true,
            ignore_patterns: Vec::new(),
            compute_hashes: true,
            progress_interval: None,
        }
    }

    /// Create a recursive config for a path.
    pub fn recursive(root: impl Into<PathBuf>) -> Self {
        Self {
            recursive: true,
            ..Self::new(root)
        }
    }

    /// Progress interval in effect for this config.
    pub fn effective_progress_interval(&self) -> u64 {
        match self.progress_interval {
            Some(n) => n.max(1),
            None if self.recursive => RECURSIVE_PROGRESS_INTERVAL,
            None => LISTING_PROGRESS_INTERVAL,
        }
    }

    /// Whether a synthetic parent entry should be produced.
    pub fn wants_parent_entry(&self) -> bool {
        self.include_parent && !self.recursive
    }

    /// Compile the ignore patterns into a matcher.
    pub fn ignore_matcher(&self) -> Result<GlobSet, ScanError> {
        compile_patterns(&self.ignore_patterns)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

fn compile_patterns(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
            message: format!("bad ignore pattern {pattern:?}: {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidConfig {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .root("/home/user")
            .recursive(true)
            .include_parent(true)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user"));
        assert!(config.recursive);
        assert!(!config.wants_parent_entry());
        assert!(config.compute_hashes);
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        assert!(ScanConfig::builder().root("").build().is_err());
        assert!(ScanConfig::builder().build().is_err());
    }

    #[test]
    fn test_builder_rejects_bad_pattern() {
        let result = ScanConfig::builder()
            .root("/test")
            .ignore_patterns(vec!["[unclosed".to_string()])
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_interval_defaults() {
        assert_eq!(ScanConfig::new("/a").effective_progress_interval(), 10);
        assert_eq!(
            ScanConfig::recursive("/a").effective_progress_interval(),
            100
        );

        let mut config = ScanConfig::new("/a");
        config.progress_interval = Some(3);
        assert_eq!(config.effective_progress_interval(), 3);
    }

    #[test]
    fn test_ignore_matcher() {
        let config = ScanConfig::builder()
            .root("/test")
            .ignore_patterns(vec!["node_modules".to_string(), "*.log".to_string()])
            .build()
            .unwrap();
        let matcher = config.ignore_matcher().unwrap();

        assert!(matcher.is_match("node_modules"));
        assert!(matcher.is_match("test.log"));
        assert!(!matcher.is_match("src"));
    }

    #[test]
    fn test_serde_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"root": "/data"}"#).unwrap();
        assert!(config.include_hidden);
        assert!(config.compute_hashes);
        assert!(!config.recursive);
    }
}
