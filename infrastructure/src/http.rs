use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use shared::error::RagError;
use shared::types::Result;

/// Send a JSON request and decode the body, turning non-2xx replies into
/// `Upstream` errors that carry the status and body for the user.
pub(crate) async fn send_json<R: DeserializeOwned>(request: RequestBuilder, service: &str) -> Result<R> {
    let response = request
        .send()
        .await
        .map_err(|e| RagError::upstream(format!("{service} request failed: {e}")))?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(RagError::upstream(format!("{service} API error {status}: {body}")));
    }
    serde_json::from_str(&body)
        .map_err(|e| RagError::upstream(format!("{service} response invalid: {e}")))
}
