//! The prompt relay.
//!
//! One inbound prompt becomes one chat completion call; the first choice's
//! content is returned as the reply.

use ai::chat_completions::{
    ChatCompletionMessage, ChatCompletionRequest, ChatCompletionRequestBuilder,
};
use ai::clients::Client;
use serde::{Deserialize, Serialize};

use crate::config::RelayConfig;
use crate::error::{ConfigError, RelayError};

/// Body of an inbound relay call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl PromptRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
        }
    }

    /// Parses an inbound body without ever rejecting it.
    ///
    /// `application/x-www-form-urlencoded` bodies are read as a form; any
    /// other body is tried as JSON. Anything without a string `prompt`
    /// yields an empty request, which resolves to the default prompt.
    pub fn from_body(content_type: Option<&str>, body: &[u8]) -> Self {
        if content_type.is_some_and(is_form_content_type) {
            return Self::from_form(body);
        }

        let value = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => value,
            Err(err) => {
                if !body.is_empty() {
                    tracing::debug!(error = %err, "inbound body is not JSON, using default prompt");
                }
                return Self::default();
            }
        };

        let prompt = value
            .get("prompt")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        Self { prompt }
    }

    fn from_form(body: &[u8]) -> Self {
        match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
            Ok(fields) => Self {
                prompt: fields
                    .into_iter()
                    .find_map(|(key, value)| (key == "prompt").then_some(value)),
            },
            Err(err) => {
                tracing::debug!(error = %err, "inbound form is malformed, using default prompt");
                Self::default()
            }
        }
    }
}

fn is_form_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

/// Successful relay result, serialized as `{"reply": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub reply: String,
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub model: String,
    pub default_prompt: String,
}

impl From<&RelayConfig> for RelaySettings {
    fn from(config: &RelayConfig) -> Self {
        Self {
            model: config.model.clone(),
            default_prompt: config.default_prompt.clone(),
        }
    }
}

/// Stateless relay. Cloning shares nothing mutable.
#[derive(Clone)]
pub struct RelayService {
    client: Box<dyn Client>,
    settings: RelaySettings,
}

impl std::fmt::Debug for RelayService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RelayService {
    pub fn new(client: Box<dyn Client>, settings: RelaySettings) -> Self {
        Self { client, settings }
    }

    /// Builds the OpenAI client described by `config`.
    pub fn from_config(config: &RelayConfig) -> Result<Self, ConfigError> {
        let mut http_client = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            http_client = http_client.timeout(timeout);
        }

        let client = ai::clients::openai::ClientBuilder::default()
            .http_client(http_client.build()?)
            .base_url(config.base_url.as_str())
            .api_key(config.api_key())
            .build()?;

        Ok(Self::new(Box::new(client), RelaySettings::from(config)))
    }

    pub fn settings(&self) -> &RelaySettings {
        &self.settings
    }

    pub fn resolve_prompt(&self, request: &PromptRequest) -> String {
        match request.prompt.as_deref() {
            Some(prompt) if !prompt.is_empty() => prompt.to_string(),
            _ => self.settings.default_prompt.clone(),
        }
    }

    pub fn completion_request(&self, prompt: String) -> ai::Result<ChatCompletionRequest> {
        Ok(ChatCompletionRequestBuilder::default()
            .model(self.settings.model.as_str())
            .messages(vec![ChatCompletionMessage::User(prompt.into())])
            .build()?)
    }

    /// Issues exactly one completion call for `request`.
    pub async fn relay(&self, request: PromptRequest) -> Result<Reply, RelayError> {
        let prompt = self.resolve_prompt(&request);
        let completion = self.completion_request(prompt)?;

        tracing::debug!(
            model = %completion.model,
            defaulted = request.prompt.as_deref().is_none_or(str::is_empty),
            "relaying prompt"
        );

        let response = self.client.chat_completions(&completion).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(RelayError::NoChoices)?;
        let reply = choice.message.content.ok_or(RelayError::MissingContent)?;

        Ok(Reply { reply })
    }
}
