use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::port::{DEFAULT_CENTER_LATITUDE, DEFAULT_CENTER_LONGITUDE};

/// Contact placed in the User-Agent header when none is configured.
pub const DEFAULT_CONTACT: &str = "gridcast@example.com";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Contact e-mail or URL identifying this installation to the forecast
    /// service. The service asks for one; the fallback is a placeholder.
    pub contact: Option<String>,

    /// Override for the forecast API root. Mostly useful for testing.
    pub base_url: Option<String>,

    /// Where lookups start when no coordinates are given.
    #[serde(default = "default_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_longitude")]
    pub default_longitude: f64,
}

fn default_latitude() -> f64 {
    DEFAULT_CENTER_LATITUDE
}

fn default_longitude() -> f64 {
    DEFAULT_CENTER_LONGITUDE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contact: None,
            base_url: None,
            default_latitude: DEFAULT_CENTER_LATITUDE,
            default_longitude: DEFAULT_CENTER_LONGITUDE,
        }
    }
}

impl Config {
    /// User-Agent value for forecast requests.
    pub fn user_agent(&self) -> String {
        let contact = self.contact.as_deref().unwrap_or(DEFAULT_CONTACT);
        format!("(gridcast, {contact})")
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "gridcast", "gridcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
