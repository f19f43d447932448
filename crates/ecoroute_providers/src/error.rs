use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request URL is stripped, query parameters carry API keys.
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Provider reported status {status}: {message}")]
    Status { status: String, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Missing field in provider response: {0}")]
    MissingField(&'static str),

    #[error("No result found for {0:?}")]
    NotFound(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        ProviderError::Request(error.without_url())
    }
}

/// Google's retryable `status` for a request that failed on their side.
pub(crate) const STATUS_UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

impl ProviderError {
    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Request(error) => {
                error.is_timeout()
                    || error.is_connect()
                    || error
                        .status()
                        .is_some_and(|status| status.is_server_error() || status.as_u16() == 429)
            }
            ProviderError::Api { status, .. } => *status >= 500 || *status == 429,
            ProviderError::Status { status, .. } => status == STATUS_UNKNOWN_ERROR,
            ProviderError::Deserialize(_)
            | ProviderError::MissingField(_)
            | ProviderError::NotFound(_) => false,
        }
    }
}
