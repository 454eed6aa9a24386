//! Generative service configuration
//!
//! Built once at startup and handed to every fetch. Credential presence is
//! checked at construction; `enabled` is the only switch the fetchers read.

use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the credential, in order
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone)]
pub struct GenAiConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    /// Per-request timeout; `None` waits for as long as the service takes
    pub timeout: Option<Duration>,
}

impl GenAiConfig {
    /// Build a config from an optional credential. Blank keys count as missing.
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if api_key.is_none() {
            tracing::warn!("No generative API key configured; AI suggestions and reviews are disabled");
        }

        Self {
            enabled: api_key.is_some(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }

    /// Read the credential from `GEMINI_API_KEY` or `API_KEY`
    pub fn from_env() -> Self {
        let key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty());
        Self::new(key)
    }

    /// A config with AI features switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full `generateContent` URL for the configured model
    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self::disabled()
    }
}
