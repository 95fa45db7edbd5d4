//! Provider connection settings
//!
//! Describes how to reach the cloud provider. Credentials are picked up from
//! the environment or shared profile unless a static key pair is configured.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Retry configuration for provider calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff duration in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    10000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
        }
    }
}

/// Connection settings for the S3 provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Region; falls back to the ambient AWS configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Custom S3 endpoint URL, for S3-compatible services
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Shared config profile name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Static access key ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,

    /// Static secret access key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,

    /// Use path-style bucket addressing
    #[serde(default)]
    pub force_path_style: bool,

    /// Append a random suffix to bucket names
    #[serde(default = "default_true")]
    pub autoname: bool,

    /// Retry configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            region: None,
            endpoint: None,
            profile: None,
            access_key: None,
            secret_key: None,
            force_path_style: false,
            autoname: true,
            retry: None,
        }
    }
}

impl ProviderConfig {
    /// Get the effective retry configuration
    pub fn retry_config(&self) -> RetryConfig {
        self.retry.clone().unwrap_or_default()
    }

    /// Static credentials, when both halves are configured
    pub fn static_credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Check the settings for mistakes that would only surface mid-deploy
    pub fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            url::Url::parse(endpoint)?;
        }

        if self.access_key.is_some() != self.secret_key.is_some() {
            return Err(Error::Config(
                "access_key and secret_key must be set together".into(),
            ));
        }

        if let Some(retry) = &self.retry {
            if retry.max_attempts == 0 {
                return Err(Error::Config("retry.max_attempts must be at least 1".into()));
            }
            if retry.initial_backoff_ms > retry.max_backoff_ms {
                return Err(Error::Config(
                    "retry.initial_backoff_ms exceeds retry.max_backoff_ms".into(),
                ));
            }
        }

        Ok(())
    }
}
