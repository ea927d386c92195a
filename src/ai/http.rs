use crate::{Error, Result};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

/// Send `request` and decode a JSON body, folding transport errors, non-2xx
/// statuses and malformed bodies into provider errors tagged with `provider`.
pub(crate) async fn send_json<Resp: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<Resp> {
    let response = request.send().await.map_err(|e| {
        error!("{} request did not complete: {}", provider, e);
        if e.is_timeout() {
            Error::Timeout(format!("{} request timed out", provider))
        } else {
            Error::Http(e)
        }
    })?;
    decode_json(provider, response).await
}

async fn decode_json<Resp: DeserializeOwned>(provider: &str, response: Response) -> Result<Resp> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!("{} rejected the request (status {}): {}", provider, status, body);
        return Err(Error::AiProvider(format!(
            "{} returned status {}: {}",
            provider, status, body
        )));
    }

    debug!("{} answered with {} bytes", provider, body.len());
    serde_json::from_str(&body).map_err(|e| {
        error!("Unreadable {} response: {}", provider, e);
        Error::AiProvider(format!("{} response could not be decoded: {}", provider, e))
    })
}
