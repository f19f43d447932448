use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ProviderError;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Reads the body of a provider response, turning non-2xx statuses into
/// `ProviderError::Api`.
pub(crate) async fn read_body(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<String, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    debug!("{}: received {} bytes", provider, body.len());
    Ok(body)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    Ok(serde_json::from_str(body)?)
}
