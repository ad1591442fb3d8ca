//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::dispatcher::{DispatchMode, Dispatcher};
use crate::inference::{
    CompletionInvoker, CompletionProvider, CompletionRequest, InvokerSettings, ProviderError,
};

/// What a provider saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub model: String,
    pub endpoint: Option<String>,
    pub system_prompt: Option<String>,
    pub max_tokens: u32,
}

/// A provider that replays canned replies in order and records every call.
pub struct ScriptedProvider {
    name: String,
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new(name: &str, replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            name: name.to_string(),
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: request.prompt.to_string(),
            model: request.model.to_string(),
            endpoint: request.endpoint.map(str::to_string),
            system_prompt: request.system_prompt.map(str::to_string),
            max_tokens: request.max_tokens,
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Network("script exhausted".to_string())))
    }
}

/// Creates a sequential Dispatcher over the given native and raw-HTTP providers.
pub fn test_dispatcher(
    native: Arc<dyn CompletionProvider>,
    raw_http: Arc<dyn CompletionProvider>,
) -> Dispatcher {
    Dispatcher::new(
        CompletionInvoker::new(native, raw_http, InvokerSettings::default()),
        DispatchMode::Sequential,
    )
}
