use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::navigator::NavigatorOptions;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Directory the session is rooted at
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Maximum back-history depth (0 = unbounded)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Per-request filesystem timeout in milliseconds (0 = no timeout)
    #[serde(default = "default_fs_timeout")]
    pub fs_timeout_ms: u64,

    /// List directories ahead of files
    #[serde(default)]
    pub directories_first: bool,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_history_limit() -> usize {
    256
}
fn default_fs_timeout() -> u64 {
    5000
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            history_limit: default_history_limit(),
            fs_timeout_ms: default_fs_timeout(),
            directories_first: false,
        }
    }
}

impl ExplorerConfig {
    /// Default config file path for this platform
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("org", "fs-explorer", "fs-explorer") {
            dirs.config_dir().join("config.json")
        } else {
            PathBuf::from("fs-explorer.json")
        }
    }

    /// Load config from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: Self =
            serde_json::from_str(&data).with_context(|| "failed to parse config JSON")?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file path
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config dir {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        Ok(())
    }

    /// Resolve `root` to an absolute, normalized directory path.
    pub fn validate(&self) -> Result<PathBuf, ConfigError> {
        let root = match std::fs::canonicalize(&self.root) {
            Ok(root) => root,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::RootNotFound(self.root.clone()))
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        if !root.is_dir() {
            return Err(ConfigError::RootNotADirectory(root));
        }
        Ok(root)
    }

    pub fn fs_timeout(&self) -> Option<Duration> {
        (self.fs_timeout_ms > 0).then(|| Duration::from_millis(self.fs_timeout_ms))
    }

    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            history_limit: self.history_limit,
            directories_first: self.directories_first,
        }
    }
}
