//! Client configuration.
//!
//! Built in code or read from `MEILI_*` environment variables.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::task::WaitOptions;

/// Server address used when nothing else is configured.
pub const DEFAULT_URL: &str = "http://127.0.0.1:7700";

/// Connection settings shared by every request a [`Client`](crate::Client) makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, without trailing slash.
    pub url: String,

    /// API key sent as `Authorization: Bearer <key>`.
    /// Also the default signing key for tenant tokens.
    pub api_key: Option<String>,

    /// Per-request timeout. `None` leaves it to the transport.
    pub request_timeout: Option<Duration>,

    /// Extra identifiers appended to the `X-Meilisearch-Client` header.
    pub client_agents: Vec<String>,

    /// Defaults for [`Client::wait_for_task`](crate::Client::wait_for_task).
    pub wait: WaitOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            api_key: None,
            request_timeout: None,
            client_agents: Vec::new(),
            wait: WaitOptions::default(),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_client_agent(mut self, agent: impl Into<String>) -> Self {
        self.client_agents.push(agent.into());
        self
    }

    pub fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Read `MEILI_URL`, `MEILI_API_KEY` and `MEILI_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("MEILI_URL").unwrap_or_else(|| DEFAULT_URL.to_string());
        let mut config = Self::new(url);

        if let Some(key) = lookup("MEILI_API_KEY").filter(|k| !k.is_empty()) {
            config.api_key = Some(key);
        }

        if let Some(raw) = lookup("MEILI_TIMEOUT_MS") {
            let ms: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("MEILI_TIMEOUT_MS is not a number: {raw:?}")))?;
            config.request_timeout = Some(Duration::from_millis(ms));
        }

        Ok(config)
    }

    /// Value of the `X-Meilisearch-Client` header.
    pub fn user_agent(&self) -> String {
        let mut parts = vec![format!("Meilisearch Rust (v{})", env!("CARGO_PKG_VERSION"))];
        parts.extend(self.client_agents.iter().cloned());
        parts.join(";")
    }
}
