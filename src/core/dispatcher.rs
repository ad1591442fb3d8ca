//! # Prompt Dispatcher
//!
//! Fans one source text out over an ordered list of prompt templates and
//! collects one [`CompletionResult`] per template.
//!
//! ```text
//! for each template ──► compose ──► resolve(model) ──► invoke ──► push
//!                                        │
//!                                        └─ Config error ──► failure marker
//! ```
//!
//! The output always has one entry per template, in template order. A
//! failing prompt never stops the ones after it, and identical templates
//! are sent as separate calls.

use futures::future::join_all;
use log::{info, warn};

use super::prompt::compose;
use crate::inference::resolver::resolve;
use crate::inference::{CompletionInvoker, CompletionResult, Credential, ModelSpec};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchMode {
    /// One call at a time, in template order.
    #[default]
    Sequential,
    /// All calls in flight at once; results are still returned in template order.
    Concurrent,
}

pub struct Dispatcher {
    invoker: CompletionInvoker,
    mode: DispatchMode,
}

impl Dispatcher {
    pub fn new(invoker: CompletionInvoker, mode: DispatchMode) -> Self {
        Self { invoker, mode }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Runs every template against `text` and returns the results in order.
    ///
    /// Does not validate `text` or `credential`; callers reject empty input
    /// before getting here.
    pub async fn dispatch(
        &self,
        text: &str,
        templates: &[String],
        model: &ModelSpec,
        credential: &Credential,
    ) -> Vec<CompletionResult> {
        info!(
            "Dispatching {} prompt(s) to {} ({}, {:?})",
            templates.len(),
            model.name,
            model.provider.label(),
            self.mode
        );

        match self.mode {
            DispatchMode::Sequential => {
                let mut results = Vec::with_capacity(templates.len());
                for template in templates {
                    results.push(self.run_one(template, text, model, credential).await);
                }
                results
            }
            DispatchMode::Concurrent => {
                join_all(
                    templates
                        .iter()
                        .map(|template| self.run_one(template, text, model, credential)),
                )
                .await
            }
        }
    }

    async fn run_one(
        &self,
        template: &str,
        text: &str,
        model: &ModelSpec,
        credential: &Credential,
    ) -> CompletionResult {
        let prompt = compose(template, text);
        match resolve(model) {
            Ok(plan) => self.invoker.invoke(&prompt, plan, model, credential).await,
            Err(e) => {
                warn!("Skipping call for {}: {}", model.name, e);
                CompletionResult::failed(&model.name, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::core::prompt::default_prompts;
    use crate::inference::{
        CompletionProvider, CompletionRequest, InvokerSettings, ProviderError,
    };
    use crate::test_support::{ScriptedProvider, test_dispatcher};

    fn templates(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn key() -> Credential {
        Credential::new("test-key")
    }

    #[tokio::test]
    async fn test_single_prompt_native_success() {
        let native = Arc::new(ScriptedProvider::new("native", vec![Ok("Hi".to_string())]));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native.clone(), raw);

        let results = dispatcher
            .dispatch(
                "Hello world",
                &templates(&["Summarize:"]),
                &ModelSpec::native("gpt-4o"),
                &key(),
            )
            .await;

        assert_eq!(results, vec![CompletionResult::Completed("Hi".to_string())]);
        assert_eq!(native.calls()[0].prompt, "Summarize:\n\nHello world");
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_next_prompt() {
        let native = Arc::new(ScriptedProvider::new(
            "native",
            vec![
                Err(ProviderError::Network("connection reset".to_string())),
                Ok("ok".to_string()),
            ],
        ));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native.clone(), raw);

        let results = dispatcher
            .dispatch("T", &templates(&["p1", "p2"]), &ModelSpec::native("gpt-4o"), &key())
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].to_string(), "Error: network error: connection reset");
        assert_eq!(results[1], CompletionResult::Completed("ok".to_string()));
        assert_eq!(native.call_count(), 2);
    }

    #[tokio::test]
    async fn test_raw_http_without_endpoint_is_failure_marker() {
        let native = Arc::new(ScriptedProvider::new("native", vec![]));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native.clone(), raw.clone());

        let results = dispatcher
            .dispatch(
                "T",
                &templates(&["p1"]),
                &ModelSpec::raw_http("llama-3", None),
                &key(),
            )
            .await;

        assert_eq!(
            results,
            vec![CompletionResult::failed(
                "llama-3",
                "API endpoint for llama-3 is not configured."
            )]
        );
        assert_eq!(
            results[0].to_string(),
            "Error: API endpoint for llama-3 is not configured."
        );
        assert_eq!(native.call_count(), 0);
        assert_eq!(raw.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_endpoint_still_yields_one_result_per_prompt() {
        let native = Arc::new(ScriptedProvider::new("native", vec![]));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native, raw);

        let results = dispatcher
            .dispatch(
                "T",
                &default_prompts(),
                &ModelSpec::raw_http("llama-3", None),
                &key(),
            )
            .await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.is_error()));
    }

    #[tokio::test]
    async fn test_default_prompts_preserve_order() {
        let native = Arc::new(ScriptedProvider::new(
            "native",
            vec![
                Ok("zeta".to_string()),
                Ok("alpha".to_string()),
                Ok("mu".to_string()),
            ],
        ));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native.clone(), raw);
        let prompts = default_prompts();

        let results = dispatcher
            .dispatch("T", &prompts, &ModelSpec::native("gpt-4o"), &key())
            .await;

        let texts: Vec<String> = results.iter().map(|r| r.to_string()).collect();
        assert_eq!(texts, vec!["zeta", "alpha", "mu"]);
        let sent: Vec<String> = native.calls().into_iter().map(|c| c.prompt).collect();
        let expected: Vec<String> = prompts.iter().map(|p| compose(p, "T")).collect();
        assert_eq!(sent, expected);
    }

    #[tokio::test]
    async fn test_duplicate_templates_make_separate_calls() {
        let native = Arc::new(ScriptedProvider::new(
            "native",
            vec![Ok("a".to_string()), Ok("b".to_string())],
        ));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native.clone(), raw);
        let input = templates(&["same", "same"]);

        let results = dispatcher
            .dispatch("T", &input, &ModelSpec::native("gpt-4o"), &key())
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(native.call_count(), 2);
        assert_eq!(input, templates(&["same", "same"]));
    }

    #[test]
    fn test_empty_templates_make_no_calls() {
        let native = Arc::new(ScriptedProvider::new("native", vec![]));
        let raw = Arc::new(ScriptedProvider::new("raw", vec![]));
        let dispatcher = test_dispatcher(native.clone(), raw.clone());

        let results = tokio_test::block_on(dispatcher.dispatch(
            "T",
            &[],
            &ModelSpec::native("gpt-4o"),
            &key(),
        ));

        assert!(results.is_empty());
        assert_eq!(native.call_count() + raw.call_count(), 0);
    }

    /// Echoes the first line of the prompt after a delay that shrinks with
    /// position, so later prompts finish first.
    struct SlowEcho;

    #[async_trait]
    impl CompletionProvider for SlowEcho {
        fn name(&self) -> &str {
            "slow-echo"
        }

        async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, ProviderError> {
            let head = request.prompt.lines().next().unwrap_or_default().to_string();
            let delay = match head.as_str() {
                "first" => 60,
                "second" => 30,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            if head == "fail" {
                return Err(ProviderError::Parse("bad body".to_string()));
            }
            Ok(head)
        }
    }

    #[tokio::test]
    async fn test_concurrent_mode_keeps_template_order() {
        let dispatcher = Dispatcher::new(
            CompletionInvoker::new(
                Arc::new(SlowEcho),
                Arc::new(SlowEcho),
                InvokerSettings::default(),
            ),
            DispatchMode::Concurrent,
        );

        let results = dispatcher
            .dispatch(
                "T",
                &templates(&["first", "second", "fail", "third"]),
                &ModelSpec::native("gpt-4o"),
                &key(),
            )
            .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].to_string(), "first");
        assert_eq!(results[1].to_string(), "second");
        assert!(results[2].to_string().starts_with("Error: "));
        assert_eq!(results[3].to_string(), "third");
    }
}
