/// The main error type for the AI [`crate`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// A client was built without a credential.
    #[error("API key is required")]
    MissingApiKey,

    /// A header could not be built from the configured credential.
    #[error("Invalid value for header {0}: {1}")]
    InvalidHeaderValue(String, reqwest::header::InvalidHeaderValue),

    /// The completion API answered with a non-success status.
    #[error("API request failed with status {status}: {body}")]
    ApiError {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Represents [`crate::chat_completions::ChatCompletionRequestBuilder`] errors.
    #[error(transparent)]
    ChatCompletionRequestBuilderError(
        #[from] crate::chat_completions::ChatCompletionRequestBuilderError,
    ),

    /// Catches any other error types that don't fit into the above categories.
    #[error("OtherError: {0}")]
    OtherError(Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// A specialized [`Result`] type for this ai [`crate`].
///
/// # Examples
///
/// ```
/// fn relay_prompt() -> ai::Result<()> {
///     // call into the completion client here
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
