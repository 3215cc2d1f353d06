//! Relay configuration.
//!
//! Resolved once at startup and handed to [`crate::relay::RelayService`];
//! nothing in the relay reads the environment after that.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Model every prompt is sent to.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Prompt used when the caller sends none.
pub const DEFAULT_PROMPT: &str = "Hello from TravelSage!";

pub use ai::clients::openai::OPENAI_BASE_URL as DEFAULT_BASE_URL;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bearer credential for the completion API.
    pub api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub default_prompt: String,
    /// Upper bound on a single completion call. `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl RelayConfig {
    /// Builds a configuration with the default model, prompt and endpoint.
    ///
    /// An empty or whitespace-only credential, or one holding control
    /// characters (a trailing newline from a secret file), is rejected: the
    /// relay cannot authenticate and must not start.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if api_key.chars().any(char::is_control) {
            return Err(ConfigError::InvalidApiKey);
        }

        Ok(Self {
            api_key: SecretString::from(api_key),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            default_prompt: DEFAULT_PROMPT.to_string(),
            request_timeout: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_default_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.default_prompt = prompt.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.request_timeout = Some(timeout);
        Ok(self)
    }

    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}
