//! Configuration management
//!
//! This module handles loading, saving, and migrating the project
//! configuration file. The file is TOML and lives next to the website
//! sources, `static-website.toml` by default.
//!
//! PROTECTED FILE: Changes to schema_version require migration support.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::provider::ProviderConfig;
use crate::website::StaticWebsiteArgs;

/// Current configuration schema version
///
/// IMPORTANT: Bumping this version requires:
/// 1. Adding a migration in `ConfigManager::migrate`
/// 2. Updating migration tests
/// 3. Marking the change as BREAKING
pub const SCHEMA_VERSION: u32 = 1;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "static-website.toml";

/// Default stack name
const DEFAULT_STACK: &str = "dev";

/// Default component name
const DEFAULT_NAME: &str = "static-website";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    #[serde(default)]
    pub schema_version: u32,

    /// Stack the resources are declared into
    #[serde(default = "default_stack")]
    pub stack: String,

    /// Logical name of the website component
    #[serde(default = "default_name")]
    pub name: String,

    /// Provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Website arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<StaticWebsiteArgs>,
}

fn default_stack() -> String {
    DEFAULT_STACK.to_string()
}

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            stack: default_stack(),
            name: default_name(),
            provider: ProviderConfig::default(),
            website: None,
        }
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Whether the configuration file exists
    pub fn exists(&self) -> bool {
        self.config_path.exists()
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    /// If the schema version doesn't match, attempts migration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        // Check schema version and migrate if necessary
        if config.schema_version < SCHEMA_VERSION {
            config = self.migrate(config)?;
        } else if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade swc.",
                config.schema_version, SCHEMA_VERSION
            )));
        }

        config.provider.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    /// Sets file permissions to 600 (owner read/write only) since the
    /// provider table may hold a static secret key.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.config_path, permissions)?;
        }

        Ok(())
    }

    /// Migrate configuration from older schema version
    fn migrate(&self, config: Config) -> Result<Config> {
        let mut config = config;

        // Version 0 files predate the field; their layout is identical.
        config.schema_version = SCHEMA_VERSION;
        Ok(config)
    }
}
