use crate::chat_completions::{ChatCompletion, ChatCompletionRequest, ChatCompletionResponse};
use crate::utils::uri::ensure_no_trailing_slash;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions client.
///
/// The bearer header is built once in [`ClientBuilder::build`], so a
/// credential that cannot be sent over HTTP is rejected before any request.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    http_client: Option<reqwest::Client>,
    base_url: Option<String>,
    api_key: Option<SecretString>,
}

impl ClientBuilder {
    pub fn http_client(&mut self, http_client: reqwest::Client) -> &mut Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn base_url<S: Into<String>>(&mut self, base_url: S) -> &mut Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn api_key<S: Into<String>>(&mut self, api_key: S) -> &mut Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn build(&self) -> Result<Client> {
        let api_key = self.api_key.as_ref().ok_or(Error::MissingApiKey)?;

        let mut authorization =
            HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|e| Error::InvalidHeaderValue(AUTHORIZATION.to_string(), e))?;
        authorization.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, authorization);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Client {
            http_client: self.http_client.clone().unwrap_or_default(),
            base_url: ensure_no_trailing_slash(
                self.base_url.as_deref().unwrap_or(OPENAI_BASE_URL),
            ),
            headers,
        })
    }
}

impl Client {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::from_url(api_key, OPENAI_BASE_URL)
    }

    /// Targets any OpenAI-compatible endpoint, e.g. `http://localhost:11434/v1`.
    pub fn from_url(api_key: &str, base_url: &str) -> Result<Self> {
        ClientBuilder::default()
            .api_key(api_key)
            .base_url(base_url)
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatCompletion for Client {
    async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(%url, model = %request.model, "sending chat completion request");

        let response = self
            .http_client
            .post(url)
            .headers(self.headers.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiError {
                status,
                body: response.text().await?,
            });
        }

        let chat_completion_response = response.json::<ChatCompletionResponse>().await?;

        Ok(chat_completion_response)
    }
}

impl super::Client for Client {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chat_completions::{ChatCompletionMessage, ChatCompletionRequestBuilder};
    use httpmock::prelude::*;
    use serde_json::json;

    fn request(prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequestBuilder::default()
            .model("gpt-4o-mini")
            .messages(vec![ChatCompletionMessage::User(prompt.into())])
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_completions_sends_bearer_and_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "model": "gpt-4o-mini",
                        "messages": [{"role": "user", "content": "Plan a 3-day trip to Rome"}]
                    }));
                then.status(200).json_body(json!({
                    "id": "chatcmpl-1",
                    "object": "chat.completion",
                    "created": 1728000000,
                    "model": "gpt-4o-mini",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "Day 1: ..."},
                        "finish_reason": "stop"
                    }]
                }));
            })
            .await;

        let client = Client::from_url("sk-test", &server.url("/v1/")).unwrap();
        let response = client
            .chat_completions(&request("Plan a 3-day trip to Rome"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.first_content(), Some("Day 1: ..."));
    }

    #[tokio::test]
    async fn test_chat_completions_non_success_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(401)
                    .body(r#"{"error":{"message":"Incorrect API key provided"}}"#);
            })
            .await;

        let client = Client::from_url("sk-wrong", &server.base_url()).unwrap();
        let err = client.chat_completions(&request("Hi")).await.unwrap_err();

        mock.assert_hits_async(1).await;
        match err {
            Error::ApiError { status, body } => {
                assert_eq!(status, reqwest::StatusCode::UNAUTHORIZED);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_chat_completions_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).body("not json");
            })
            .await;

        let client = Client::from_url("sk-test", &server.base_url()).unwrap();
        let err = client.chat_completions(&request("Hi")).await.unwrap_err();

        assert!(matches!(err, Error::ReqwestError(_)));
    }

    #[test]
    fn test_unsendable_api_key_is_rejected_at_build() {
        for api_key in ["sk-abc\n", "sk-\r\nX-Injected: 1", "sk-\0"] {
            match Client::new(api_key) {
                Err(Error::InvalidHeaderValue(header, _)) => assert_eq!(header, "authorization"),
                other => panic!("expected InvalidHeaderValue for {api_key:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_builder_requires_api_key() {
        let err = ClientBuilder::default().build().unwrap_err();

        assert!(matches!(err, Error::MissingApiKey));
    }

    #[test]
    fn test_debug_does_not_leak_api_key() {
        let client = Client::new("sk-very-secret").unwrap();

        assert!(!format!("{client:?}").contains("sk-very-secret"));
        assert_eq!(client.base_url(), OPENAI_BASE_URL);
    }
}
