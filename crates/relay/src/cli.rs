use std::time::Duration;

use crate::config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PROMPT, RelayConfig};
use crate::error::ConfigError;
use crate::logging::LoggingConfig;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Relays TravelSage prompts to an OpenAI-compatible chat completions API"
)]
pub struct App {
    #[clap(flatten)]
    pub server: ServerOptions,

    #[clap(flatten)]
    pub relay: RelayOptions,

    #[clap(flatten)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ServerOptions {
    /// Address to bind
    #[clap(long, env = "RELAY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[clap(long, env = "PORT", default_value = "8080")]
    pub port: u16,
}

impl ServerOptions {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, clap::Args)]
pub struct RelayOptions {
    /// Completion API credential
    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[clap(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Model every prompt is sent to
    #[clap(long, env = "RELAY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Prompt used when a request carries none
    #[clap(long, env = "RELAY_DEFAULT_PROMPT", default_value = DEFAULT_PROMPT)]
    pub default_prompt: String,

    /// Timeout for a completion call, in seconds. Unset waits indefinitely.
    #[clap(long, env = "RELAY_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

impl TryFrom<&RelayOptions> for RelayConfig {
    type Error = ConfigError;

    fn try_from(options: &RelayOptions) -> Result<Self, Self::Error> {
        let api_key = options
            .api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)?;

        let config = RelayConfig::new(api_key)?
            .with_base_url(options.base_url.as_str())
            .with_model(options.model.as_str())
            .with_default_prompt(options.default_prompt.as_str());

        match options.timeout_secs {
            Some(secs) => config.with_request_timeout(Duration::from_secs(secs)),
            None => Ok(config),
        }
    }
}
