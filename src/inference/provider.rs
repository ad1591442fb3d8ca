use std::fmt;

use async_trait::async_trait;

use super::types::Credential;

/// Errors that can occur during provider operations.
/// None of these escape the invoker; they become failure markers.
#[derive(Debug)]
pub enum ProviderError {
    /// Required endpoint or credential missing. Raised before any network I/O.
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-2xx response.
    Api { status: u16, message: String },
    /// Response body missing expected fields or not JSON at all.
    Parse(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Config(msg) => f.write_str(msg),
            ProviderError::Network(msg) => write!(f, "network error: {msg}"),
            ProviderError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            ProviderError::Parse(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Everything a provider needs to fulfill one completion request.
pub struct CompletionRequest<'a> {
    /// Template and source text, already composed.
    pub prompt: &'a str,
    pub model: &'a str,
    pub credential: &'a Credential,
    /// Target URL for raw-HTTP calls. Native providers ignore it.
    pub endpoint: Option<&'a str>,
    /// Optional fixed system role. Native providers only.
    pub system_prompt: Option<&'a str>,
    /// Generation cap. Raw-HTTP providers only.
    pub max_tokens: u32,
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the name of the provider.
    fn name(&self) -> &str;

    /// Performs exactly one call and returns the completion text.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError>;
}
