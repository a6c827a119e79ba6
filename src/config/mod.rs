//! Configuration management for orgtree

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::directory::DEFAULT_CONTACT_DOMAIN;
use crate::error::{ConfigError, Result};

/// Table holding organization rows unless configured otherwise
pub const DEFAULT_TABLE: &str = "org_nodes";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the hosted database (e.g. `https://xyz.supabase.co`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,

    /// Project API key sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Table holding organization rows
    #[serde(default = "default_table")]
    pub table: String,

    /// Domain used for derived contact handles
    #[serde(default = "default_contact_domain")]
    pub contact_domain: String,

    /// User preferences
    #[serde(default)]
    pub preferences: Preferences,
}

/// User preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// How long a fetched tree stays in the snapshot cache
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_contact_domain() -> String {
    DEFAULT_CONTACT_DOMAIN.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            format: None,
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: None,
            api_key: None,
            table: default_table(),
            contact_domain: default_contact_domain(),
            preferences: Preferences::default(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".orgtree").join("config.yaml"))
    }

    /// Resolve an optional override to a concrete config path
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an optional override path
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to an optional override path
    pub fn save_at(&self, path: Option<&str>) -> Result<()> {
        self.save_to(&Self::resolve_path(path)?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // The file holds an API key
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    /// Validate that the store connection settings are present
    pub fn validate_store(&self) -> Result<()> {
        match self.store_url.as_deref() {
            None | Some("") => return Err(ConfigError::MissingStoreUrl.into()),
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                return Err(ConfigError::Invalid(format!(
                    "store_url must start with http:// or https://, got {}",
                    url
                ))
                .into());
            }
            Some(_) => {}
        }
        if self.api_key.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::MissingApiKey.into());
        }
        Ok(())
    }

    /// Snapshot cache lifetime
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.preferences.cache_ttl_secs)
    }
}
