//! Optional TOML settings file.
//!
//! ```toml
//! [scan]
//! include_hidden = false
//! ignore_patterns = [".git", "node_modules"]
//!
//! [safety]
//! removable_prefixes = ["/media", "/run/media"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::Deserialize;

use sifter_core::ScanConfig;
use sifter_ops::SafetyConfig;

/// Scan defaults applied to every command.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    pub include_hidden: bool,
    pub follow_symlinks: bool,
    pub ignore_patterns: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            include_hidden: true,
            follow_symlinks: false,
            ignore_patterns: Vec::new(),
        }
    }
}

/// Everything the settings file can hold.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub scan: ScanSettings,
    pub safety: SafetyConfig,
}

impl Settings {
    /// Load from `explicit`, else the per-user config file if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read settings from {}", path.display()))?;
        let settings = Self::parse(&text)
            .wrap_err_with(|| format!("Invalid settings in {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build a scan config for `root` carrying these defaults.
    pub fn scan_config(&self, root: impl Into<PathBuf>, recursive: bool) -> ScanConfig {
        let mut config = ScanConfig::new(root);
        config.recursive = recursive;
        config.include_hidden = self.scan.include_hidden;
        config.follow_symlinks = self.scan.follow_symlinks;
        config.ignore_patterns = self.scan.ignore_patterns.clone();
        config
    }
}

/// `<config dir>/sifter/config.toml`.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sifter").join("config.toml"))
}
