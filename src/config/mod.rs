use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::api::{ClientConfig, CASELAW_BASE_URL};
use crate::error::{CaseLawError, Result};

const CONFIG_DIR_NAME: &str = ".nswcaselaw";
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Root of the case law site
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds to wait between successive requests
    #[serde(default = "default_pause_secs")]
    pub pause_secs: u64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            pause_secs: default_pause_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Overrides the default user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    CASELAW_BASE_URL.to_string()
}

fn default_pause_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Get the configuration directory path
    pub fn config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| CaseLawError::Config("Could not determine home directory".to_string()))?;

        Ok(home_dir.join(CONFIG_DIR_NAME))
    }

    /// Get the configuration file full path
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_path()?.join(CONFIG_FILE_NAME))
    }

    /// Initialize configuration directory and file
    pub fn initialize() -> Result<()> {
        let config_dir = Self::config_path()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| CaseLawError::Config(format!("Failed to create config directory: {}", e)))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = fs::Permissions::from_mode(0o700);
                fs::set_permissions(&config_dir, permissions).map_err(|e| {
                    CaseLawError::Config(format!("Failed to set directory permissions: {}", e))
                })?;
            }
        }

        let config_file = Self::config_file_path()?;
        if !config_file.exists() {
            Self::default().write_to(&config_file)?;
        }

        Ok(())
    }

    /// Load configuration from file, creating it with defaults if missing
    pub fn load() -> Result<Self> {
        Self::initialize()?;

        let config_file = Self::config_file_path()?;
        let contents = fs::read_to_string(&config_file)
            .map_err(|e| CaseLawError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml_str(&contents)
    }

    /// Parse configuration from YAML; missing keys take their defaults
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
            .map_err(|e| CaseLawError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        Self::initialize()?;
        self.write_to(&Self::config_file_path()?)
    }

    fn write_to(&self, config_file: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| CaseLawError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_file, yaml)
            .map_err(|e| CaseLawError::Config(format!("Failed to write config file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(config_file, permissions)
                .map_err(|e| CaseLawError::Config(format!("Failed to set file permissions: {}", e)))?;
        }

        Ok(())
    }

    /// Parsed site root
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.site.base_url)
            .map_err(|e| CaseLawError::Config(format!("Invalid site.base_url '{}': {}", self.site.base_url, e)))
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.site.pause_secs)
    }

    /// HTTP client settings derived from the `http` section
    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig {
            timeout: self.http.timeout_secs,
            ..Default::default()
        };
        if let Some(user_agent) = &self.http.user_agent {
            client.user_agent = user_agent.clone();
        }
        client
    }

    /// Update a value by key path without saving
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let number = |value: &str| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| CaseLawError::Config(format!("{} must be a whole number of seconds", key)))
        };

        match key {
            "site.base_url" => {
                Url::parse(value)
                    .map_err(|e| CaseLawError::Config(format!("Invalid URL '{}': {}", value, e)))?;
                self.site.base_url = value.trim_end_matches('/').to_string();
            }
            "site.pause_secs" => self.site.pause_secs = number(value)?,
            "http.timeout_secs" => self.http.timeout_secs = number(value)?,
            "http.user_agent" => {
                self.http.user_agent = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            _ => {
                return Err(CaseLawError::Config(format!("Unknown configuration key: {}", key)));
            }
        }
        Ok(())
    }

    /// Set a configuration value by key path and save
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Get a configuration value by key path
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "site.base_url" => Some(self.site.base_url.clone()),
            "site.pause_secs" => Some(self.site.pause_secs.to_string()),
            "http.timeout_secs" => Some(self.http.timeout_secs.to_string()),
            "http.user_agent" => Some(self.client_config().user_agent),
            _ => None,
        }
    }
}
