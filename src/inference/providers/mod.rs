pub mod openai;
pub mod raw_http;

pub use openai::OpenAiProvider;
pub use raw_http::RawHttpProvider;

use log::{debug, warn};

use crate::inference::ProviderError;

/// Sends a prepared request and returns the body of a 2xx response.
///
/// Non-2xx statuses become `ProviderError::Api` carrying the response body.
async fn send_json(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<String, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    debug!("{} response status: {}", provider, response.status());

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let err_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        warn!("{} API error: {} - {}", provider, status, err_body);
        return Err(ProviderError::Api {
            status,
            message: err_body,
        });
    }

    response
        .text()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))
}
