//! # Completion Invoker
//!
//! Runs one provider call along the path picked by the resolver and folds
//! every outcome into a [`CompletionResult`]. Nothing fails past this
//! boundary: transport, status and parse errors all come back as data.

use std::sync::Arc;

use log::{debug, warn};

use super::provider::{CompletionProvider, CompletionRequest};
use super::providers::raw_http::DEFAULT_MAX_TOKENS;
use super::resolver::CallPlan;
use super::types::{CompletionResult, Credential, ModelSpec};

/// Per-call knobs that come from configuration, not from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokerSettings {
    /// Fixed system role for native calls. `None` sends a single-turn exchange.
    pub system_prompt: Option<String>,
    /// `max_tokens` sent on raw-HTTP calls.
    pub max_tokens: u32,
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            system_prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

pub struct CompletionInvoker {
    native: Arc<dyn CompletionProvider>,
    raw_http: Arc<dyn CompletionProvider>,
    settings: InvokerSettings,
}

impl CompletionInvoker {
    pub fn new(
        native: Arc<dyn CompletionProvider>,
        raw_http: Arc<dyn CompletionProvider>,
        settings: InvokerSettings,
    ) -> Self {
        Self {
            native,
            raw_http,
            settings,
        }
    }

    pub fn settings(&self) -> &InvokerSettings {
        &self.settings
    }

    /// Performs exactly one call. No retries.
    pub async fn invoke(
        &self,
        prompt: &str,
        plan: CallPlan<'_>,
        model: &ModelSpec,
        credential: &Credential,
    ) -> CompletionResult {
        let (provider, endpoint) = match plan {
            CallPlan::Native => (&self.native, None),
            CallPlan::RawHttp { endpoint } => (&self.raw_http, Some(endpoint)),
        };

        let request = CompletionRequest {
            prompt,
            model: &model.name,
            credential,
            endpoint,
            system_prompt: self.settings.system_prompt.as_deref(),
            max_tokens: self.settings.max_tokens,
        };

        debug!("Invoking {} for model {}", provider.name(), model.name);

        match provider.complete(request).await {
            Ok(text) => CompletionResult::Completed(text),
            Err(e) => {
                warn!("{} call for {} failed: {}", provider.name(), model.name, e);
                CompletionResult::failed(&model.name, e.to_string())
            }
        }
    }
}
