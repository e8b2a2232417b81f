//! Backend collaborator configuration

use serde::Deserialize;
use std::time::Duration;

use crate::adapters::http::BackendConfig;

use super::error::ValidationError;

/// Which collaborator implementations the binary wires up
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Deterministic in-process fakes
    #[default]
    Fake,
    /// HTTP adapters against `base_url`
    Http,
}

/// Companion backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default)]
    pub mode: BackendMode,

    /// Base URL of the backend (required in `http` mode)
    pub base_url: Option<String>,

    /// API key sent as a bearer token
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn is_http(&self) -> bool {
        self.mode == BackendMode::Http
    }

    /// Client settings for the HTTP adapters; `None` in fake mode.
    pub fn client_config(&self) -> Option<BackendConfig> {
        if !self.is_http() {
            return None;
        }
        let base_url = self.base_url.as_deref()?;
        let api_key = self.api_key.clone().unwrap_or_default();
        Some(BackendConfig::new(base_url, api_key).with_timeout(self.timeout()))
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.is_http() {
            return Ok(());
        }
        let url = self
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(ValidationError::MissingRequired("BACKEND__BASE_URL"))?;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidBackendUrl);
        }
        if self.api_key.as_ref().map_or(true, |k| k.is_empty()) {
            return Err(ValidationError::MissingRequired("BACKEND__API_KEY"));
        }
        Ok(())
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            mode: BackendMode::default(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
