//! Shared HTTP plumbing for the live providers.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::error::{ProviderError, Result};

/// HTTP client with the timeouts and user agent every provider uses.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(ProviderError::Request)
}

/// Parse and validate a configured base URL.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| ProviderError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ProviderError::InvalidUrl(format!(
            "{raw}: URL must start with http:// or https://"
        )));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ProviderError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decode a JSON body, turning non-success statuses into `Backend` errors.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ProviderError::Backend {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::ParseError(e.to_string()))
}
