//! Native provider: OpenAI-style Chat Completions API.
//!
//! One non-streaming `POST {base_url}/chat/completions` per prompt. The
//! first choice's message content is returned untouched.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

use super::send_json;
use crate::inference::{ChatMessage, CompletionProvider, CompletionRequest, ProviderError};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

// ============================================================================
// Chat Completions API Types
// ============================================================================

#[derive(Serialize, Debug)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Builds the message exchange: optional system role, then the user prompt.
fn build_messages(prompt: &str, system_prompt: Option<&str>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(prompt));
    messages
}

fn first_choice_content(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Parse("response contained no choices".to_string()))?;
    choice
        .message
        .content
        .ok_or_else(|| ProviderError::Parse("first choice has no message content".to_string()))
}

// ============================================================================
// Provider Implementation
// ============================================================================

pub struct OpenAiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new chat-completion provider.
    ///
    /// # Arguments
    /// * `base_url` - Optional custom base URL (defaults to OpenAI's API)
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        let chat_request = ChatRequest {
            model: request.model.to_string(),
            messages: build_messages(request.prompt, request.system_prompt),
        };

        info!(
            "Chat completion request: model={}, messages={}, prompt_len={}",
            request.model,
            chat_request.messages.len(),
            request.prompt.len()
        );

        let body = send_json(
            self.name(),
            self.client
                .post(format!("{}/chat/completions", self.base_url))
                .header(
                    "Authorization",
                    format!("Bearer {}", request.credential.expose()),
                )
                .json(&chat_request),
        )
        .await?;

        first_choice_content(&body)
    }
}
