//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{APP_DIR_NAME, LOG_FILE_NAME, PLUGIN_ID};

/// Theme display mode preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ThemeMode {
    /// Automatically detect OS theme (dark/light)
    #[default]
    Auto,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Directory holding the override file and the log.
    /// Defaults to the platform config directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Color picker preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Theme mode preference (Auto, Dark, Light)
    #[serde(default)]
    pub theme_mode: ThemeMode,
    /// Slider change per Left/Right key press
    #[serde(default = "default_slider_step")]
    pub slider_step: f32,
    /// Slider change per Shift+Left/Right key press
    #[serde(default = "default_slider_fine_step")]
    pub slider_fine_step: f32,
}

fn default_slider_step() -> f32 {
    0.05
}

fn default_slider_fine_step() -> f32 {
    0.01
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            slider_step: default_slider_step(),
            slider_fine_step: default_slider_fine_step(),
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/BeaconColors/config.toml`
/// - macOS: `~/Library/Application Support/BeaconColors/config.toml`
/// - Windows: `%APPDATA%\BeaconColors\config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/BeaconColors/`
    /// - macOS: `~/Library/Application Support/BeaconColors/`
    /// - Windows: `%APPDATA%\BeaconColors\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Directory for the override file and log: `paths.data_dir` if set,
    /// otherwise the platform config directory.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.paths.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::config_dir(),
        }
    }

    /// Full path of the persisted override table, named after the plugin id.
    pub fn store_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(format!("{PLUGIN_ID}.json")))
    }

    /// Full path of the terminal UI log file.
    pub fn log_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(LOG_FILE_NAME))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to an explicit path.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        // Ensure config directory exists
        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Slider steps must be in `(0, 1]` and the fine step must not exceed the
    /// coarse one.
    pub fn validate(&self) -> Result<()> {
        let UiConfig {
            slider_step,
            slider_fine_step,
            ..
        } = self.ui;

        if !(slider_step > 0.0 && slider_step <= 1.0) {
            anyhow::bail!("ui.slider_step must be in (0, 1], got {slider_step}");
        }
        if !(slider_fine_step > 0.0 && slider_fine_step <= slider_step) {
            anyhow::bail!(
                "ui.slider_fine_step must be in (0, slider_step], got {slider_fine_step}"
            );
        }

        Ok(())
    }
}
