//! Raw-HTTP provider: legacy text-completion request built by hand.
//!
//! Posts `{model, prompt, max_tokens}` to the endpoint carried on the model
//! spec and reads `choices[0].text` from the reply.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::send_json;
use crate::inference::{CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_MAX_TOKENS: u32 = 150;

#[derive(Serialize, Debug)]
struct RawCompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct RawCompletionResponse {
    choices: Vec<RawChoice>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    text: String,
}

fn first_choice_text(body: &str) -> Result<String, ProviderError> {
    let response: RawCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.text)
        .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))
}

pub struct RawHttpProvider {
    client: reqwest::Client,
}

impl Default for RawHttpProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RawHttpProvider {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for RawHttpProvider {
    fn name(&self) -> &str {
        "raw-http"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let endpoint = request.endpoint.ok_or_else(|| {
            ProviderError::Config(format!(
                "API endpoint for {} is not configured.",
                request.model
            ))
        })?;

        let completion_request = RawCompletionRequest {
            model: request.model,
            prompt: request.prompt,
            max_tokens: request.max_tokens,
        };

        info!(
            "Raw completion request: model={}, endpoint={}, max_tokens={}",
            request.model, endpoint, request.max_tokens
        );

        let body = send_json(
            self.name(),
            self.client
                .post(endpoint)
                .header(
                    "Authorization",
                    format!("Bearer {}", request.credential.expose()),
                )
                .json(&completion_request),
        )
        .await?;

        first_choice_text(&body)
    }
}
