use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Body returned to the caller for every relay failure.
pub const FAILURE_MESSAGE: &str = "Errore nella chiamata OpenAI";

/// Startup errors. Any of these stops the relay before it binds a socket.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set; the relay cannot authenticate to the completion API")]
    MissingApiKey,

    #[error("OPENAI_API_KEY contains control characters and cannot be sent as a bearer token")]
    InvalidApiKey,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("failed to build the completion client: {0}")]
    Client(#[from] ai::Error),

    #[error("failed to build the HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failure of a single relayed call.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Completion(#[from] ai::Error),

    #[error("completion API returned no choices")]
    NoChoices,

    #[error("first completion choice has no content")]
    MissingContent,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            FAILURE_MESSAGE,
        )
            .into_response()
    }
}
