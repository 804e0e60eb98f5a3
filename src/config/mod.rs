use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of exercises requested when loading the catalog
    #[serde(default = "default_catalog_limit")]
    pub catalog_limit: usize,

    /// Attempts for read-only requests; mutations are always sent once
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_catalog_limit() -> usize {
    500
}

fn default_max_retries() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            catalog_limit: default_catalog_limit(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            notifications_enabled: default_true(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.lasko/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".lasko"))
    }

    /// Get config file path, honouring `LASKO_CONFIG`
    pub fn config_file() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("LASKO_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_file = Self::config_file()?;
        Self::load_from(&config_file)
    }

    /// Load configuration from a file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&contents).context("Failed to parse config file")?
        } else {
            tracing::info!("Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// `LASKO_API_URL` and `LASKO_TOKEN` take precedence over the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("LASKO_API_URL") {
            if !url.trim().is_empty() {
                self.api.base_url = url;
            }
        }

        if let Ok(token) = std::env::var("LASKO_TOKEN") {
            if !token.trim().is_empty() {
                self.auth.token = token;
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_file = Self::config_file()?;
        self.save_to(&config_file)
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Check if a bearer token is configured
    pub fn is_authenticated(&self) -> bool {
        !self.auth.token.is_empty()
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.api.max_retries, 1);
        assert_eq!(config.ui.search_debounce_ms, 300);
        assert!(config.schedule.notifications_enabled);
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.auth.token = "abc".to_string();

        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.api.base_url, deserialized.api.base_url);
        assert_eq!(deserialized.auth.token, "abc");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config =
            toml::from_str("[api]\nbase_url = \"https://lasko.example\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://lasko.example");
        assert_eq!(config.api.catalog_limit, 500);
        assert!(config.auth.token.is_empty());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let mut config = Config::default();
        config.api.base_url = "https://lasko.example/".to_string();
        assert_eq!(config.base_url(), "https://lasko.example");
    }
}
