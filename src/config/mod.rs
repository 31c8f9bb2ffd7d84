//! Configuration module for tagfs
//!
//! Holds the defaults for logging, the metadata tool names, and mount
//! options. Configuration is stored in the user's config directory and is
//! optional: a missing file means built-in defaults. Command-line flags
//! override whatever is loaded here.

use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Names of the external metadata tools
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Program used to read DjVu metadata
    pub djvused: String,
    /// Program used to read PDF metadata
    pub pdftk: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            djvused: crate::metadata::djvu::DEFAULT_PROGRAM.to_string(),
            pdftk: crate::metadata::pdf::DEFAULT_PROGRAM.to_string(),
        }
    }
}

/// Defaults for `tagfs mount`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MountConfig {
    /// Filesystem name shown in the mount table
    pub fsname: String,
    /// Let users other than the mounting one see the filesystem
    pub allow_other: bool,
    /// Unmount automatically when the process exits
    pub auto_unmount: bool,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            fsname: "tagfs".to_string(),
            allow_other: false,
            auto_unmount: false,
        }
    }
}

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TagfsConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Suppress informational output by default
    pub quiet: bool,

    pub extractors: ExtractorConfig,

    pub mount: MountConfig,
}

impl Default for TagfsConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            quiet: false,
            extractors: ExtractorConfig::default(),
            mount: MountConfig::default(),
        }
    }
}

impl TagfsConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("tagfs").join("config.toml"))
    }

    /// Load configuration from the default location, falling back to
    /// defaults if no file exists
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it
    /// does not exist. Keys missing from the file keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Save configuration to `path`, creating parent directories
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Render as TOML for display
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }
}
