// Configuration management
use crate::error::{DeskError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Where desk state lives; defaults to the platform data dir
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "swapdesk".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
        }
    }
}

impl Config {
    /// Get the config directory path
    ///
    /// Priority:
    /// 1. XDG_CONFIG_HOME/swapdesk (if env var is set)
    /// 2. ~/.config/swapdesk (if ~/.config exists)
    /// 3. ~/.swapdesk (fallback on Unix, doesn't create ~/.config)
    /// 4. Platform default on Windows
    pub fn config_dir() -> Result<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return Ok(PathBuf::from(xdg_config).join("swapdesk"));
        }

        #[cfg(unix)]
        {
            if let Some(home_dir) = dirs::home_dir() {
                let xdg_config = home_dir.join(".config");

                if xdg_config.exists() {
                    return Ok(xdg_config.join("swapdesk"));
                }

                return Ok(home_dir.join(".swapdesk"));
            }
        }

        #[cfg(not(unix))]
        {
            if let Some(config_dir) = dirs::config_dir() {
                return Ok(config_dir.join("swapdesk"));
            }
        }

        Err(DeskError::ConfigError(
            "Could not determine config directory".to_string(),
        ))
    }

    /// Get the config file path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_file_path()?)?;

        if let Ok(data_dir) = std::env::var("SWAPDESK_DATA_DIR") {
            tracing::debug!("Using SWAPDESK_DATA_DIR from environment: {}", data_dir);
            config.storage.data_dir = Some(PathBuf::from(data_dir));
        }

        Ok(config)
    }

    /// Load configuration from `path`, or defaults when it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file not found at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        tracing::debug!("Loading config from: {}", path.display());
        let contents = fs::read_to_string(path)
            .map_err(|e| DeskError::ConfigError(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| DeskError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Directory the key-value store writes to
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage.data_dir {
            return Ok(dir.clone());
        }

        dirs::data_dir()
            .map(|dir| dir.join("swapdesk"))
            .ok_or_else(|| DeskError::ConfigError("Could not determine data directory".to_string()))
    }

    /// Create a sample config file with comments
    pub fn create_sample() -> Result<PathBuf> {
        let config_dir = Self::config_dir()?;
        let config_path = Self::config_file_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                DeskError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        // Don't overwrite existing config
        if config_path.exists() {
            return Err(DeskError::ConfigError(format!(
                "Config file already exists at: {}",
                config_path.display()
            )));
        }

        fs::write(&config_path, SAMPLE_CONFIG)
            .map_err(|e| DeskError::ConfigError(format!("Failed to write sample config: {}", e)))?;

        tracing::info!("Created sample config at: {}", config_path.display());
        Ok(config_path)
    }
}

const SAMPLE_CONFIG: &str = r#"# swapdesk configuration
# Location priority:
#   1. $XDG_CONFIG_HOME/swapdesk/config.toml (if XDG_CONFIG_HOME is set)
#   2. ~/.config/swapdesk/config.toml (if ~/.config exists)
#   3. ~/.swapdesk/config.toml (fallback)
#
# The data directory can also be set with SWAPDESK_DATA_DIR.

[storage]
# Directory holding customers, subscriptions and alerts
# Example: data_dir = "/var/lib/swapdesk"

[auth]
# Desk login
username = "admin"
password = "swapdesk"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.auth.username, "admin");
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn test_sample_config_parses() {
        let config: Config = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.auth.password, "swapdesk");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\ndata_dir = \"/tmp/desk\"\n[alerts]\ncheck_interval_hours = 6\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/desk"));
        assert_eq!(config.auth.username, "admin");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[alerts\n").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(DeskError::ConfigError(_))
        ));
    }
}
