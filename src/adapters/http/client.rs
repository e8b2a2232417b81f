//! Shared reqwest client for the companion backend.

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connection settings for the companion backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API key sent as a bearer token.
    api_key: Secret<String>,
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub timeout: Duration,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Transport-level failure, before it is mapped to a port error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    Timeout { timeout_secs: u64 },
    Connect(String),
    Status {
        status: u16,
        body: String,
        retry_after_secs: Option<u32>,
    },
    Decode(String),
}

/// Thin wrapper adding auth, timeout classification and status checks.
#[derive(Debug, Clone)]
pub struct BackendClient {
    config: BackendConfig,
    client: Client,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    /// Starts an authorized POST to `path`.
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
    }

    /// Sends the request and checks the status.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, HttpFailure> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpFailure::Timeout {
                    timeout_secs: self.config.timeout.as_secs(),
                }
            } else if e.is_connect() {
                HttpFailure::Connect(format!("Connection failed: {}", e))
            } else {
                HttpFailure::Connect(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());
        let body = response.text().await.unwrap_or_default();
        Err(HttpFailure::Status {
            status: status.as_u16(),
            body,
            retry_after_secs,
        })
    }

    /// Sends the request and decodes a JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, HttpFailure> {
        let response = self.send(request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| HttpFailure::Decode(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let config = BackendConfig::new("https://api.example.com/v1/", "key");
        assert_eq!(config.base_url, "https://api.example.com/v1");
        let client = BackendClient::new(config).unwrap();
        assert_eq!(
            client.url("/auth/sign-in"),
            "https://api.example.com/v1/auth/sign-in"
        );
    }

    #[test]
    fn api_key_is_not_debug_printed() {
        let config = BackendConfig::new("https://api.example.com", "super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn timeout_builder() {
        let config = BackendConfig::new("http://x", "k").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
