use thiserror::Error;
use wfd_util::http::JsonParseError;

/// Errors raised while talking to the Actions API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}. Hint: check connection/proxy settings and the API base URL.")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    ///
    /// `message` is the provider's own error text when the body carried one.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error(transparent)]
    Decode(#[from] JsonParseError),

    #[error("{0}")]
    Url(String),

    #[error("could not build the HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// The provider's error message for status failures.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(error) => error.status().map(|status| status.as_u16()),
            _ => None,
        }
    }
}
