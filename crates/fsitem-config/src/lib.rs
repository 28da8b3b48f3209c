//! # fsitem-config
//!
//! Configuration management for fsitem.
//!
//! Loads configuration from:
//! 1. `~/.fsitem/config.toml` (global)
//! 2. `.fsitem/config.toml` (project-local, overrides global)
//! 3. Environment variables (highest priority)

pub mod logging;
pub mod testing;

use fsitem::metadata::{sidecar_path_with, META_FILE_EXT};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config path, relative to the working directory.
pub const PROJECT_CONFIG_PATH: &str = ".fsitem/config.toml";

/// Global config instance, loaded on first use
static CONFIG: Lazy<Config> = Lazy::new(|| Config::load().unwrap_or_default());

/// Get global config (read-only)
pub fn config() -> &'static Config {
    &CONFIG
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sidecar: SidecarConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from standard locations
    pub fn load() -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let mut config = Self::load_from(global.as_deref(), Some(Path::new(PROJECT_CONFIG_PATH)))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from explicit global and project files. Missing files are skipped.
    pub fn load_from(global: Option<&Path>, project: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(global_path) = global.filter(|p| p.exists()) {
            let shown = global_path.display().to_string();
            crate::log_config_debug!("Loading global config", path = shown.as_str());
            let contents = std::fs::read_to_string(global_path)?;
            config = toml::from_str(&contents)?;
        }

        if let Some(project_path) = project.filter(|p| p.exists()) {
            let shown = project_path.display().to_string();
            crate::log_config_debug!("Loading project config", path = shown.as_str());
            let contents = std::fs::read_to_string(project_path)?;
            let project_config: toml::Table = toml::from_str(&contents)?;
            config.merge(project_config);
        }

        Ok(config)
    }

    /// Global config path: ~/.fsitem/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".fsitem/config.toml"))
    }

    /// Overlay the sections a project file actually sets.
    fn merge(&mut self, project: toml::Table) {
        if let Some(toml::Value::Table(sidecar)) = project.get("sidecar") {
            if let Some(enabled) = sidecar.get("enabled").and_then(|v| v.as_bool()) {
                self.sidecar.enabled = enabled;
            }
            if let Some(ext) = sidecar.get("extension").and_then(|v| v.as_str()) {
                self.sidecar.extension = ext.to_string();
            }
        }
        if let Some(toml::Value::Table(logging)) = project.get("logging") {
            if let Some(level) = logging.get("level").and_then(|v| v.as_str()) {
                self.logging.level = level.to_string();
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(ext) = std::env::var("FSITEM_META_EXT") {
            if !ext.is_empty() {
                self.sidecar.extension = ext;
            }
        }
        if let Ok(enabled) = std::env::var("FSITEM_SIDECAR") {
            match enabled.to_lowercase().as_str() {
                "0" | "false" | "off" => self.sidecar.enabled = false,
                "1" | "true" | "on" => self.sidecar.enabled = true,
                _ => {}
            }
        }
        if let Ok(level) = std::env::var("FSITEM_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Generate default config TOML string
    pub fn default_toml() -> String {
        Config::default().to_toml()
    }
}

/// Sidecar metadata configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    /// Look for sidecar files next to items
    pub enabled: bool,
    /// Suffix appended to an item path to find its sidecar
    pub extension: String,
}

impl SidecarConfig {
    /// Sidecar path for `path` under this configuration, if enabled.
    pub fn sidecar_for(&self, path: &Path) -> Option<PathBuf> {
        if !self.enabled || self.extension.is_empty() {
            return None;
        }
        Some(sidecar_path_with(path, &self.extension))
    }
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extension: META_FILE_EXT.to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// error, warn, info, debug or trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}
