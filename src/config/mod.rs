#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use std::time::Duration;

pub use toml_config::TomlConfig;

pub const DEFAULT_BASE_URL: &str = "https://turkish-house-price-prediction.onrender.com";

/// Resolved service address and timeout, after CLI flags, environment and
/// config file have been merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl From<&TomlConfig> for ServiceSettings {
    fn from(config: &TomlConfig) -> Self {
        Self {
            base_url: config.service.base_url.clone(),
            timeout_seconds: config.service.timeout_seconds,
        }
    }
}

impl ConfigProvider for ServiceSettings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for ServiceSettings {
    fn validate(&self) -> Result<()> {
        validate_url("base_url", &self.base_url)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        Ok(())
    }
}
