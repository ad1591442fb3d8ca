use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Provider;

/// Role of a chat message (OpenAI terminology)
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Identifies a target model and how to reach it.
///
/// The provider is decided once, when the spec is built from the
/// [`ProviderTable`](crate::inference::ProviderTable), and never re-derived
/// from the model name at call time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub provider: Provider,
    /// Completion endpoint. Only meaningful for [`Provider::RawHttp`].
    pub endpoint: Option<String>,
}

impl ModelSpec {
    pub fn native(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider: Provider::Native,
            endpoint: None,
        }
    }

    pub fn raw_http(name: impl Into<String>, endpoint: Option<String>) -> Self {
        Self {
            name: name.into(),
            provider: Provider::RawHttp,
            endpoint,
        }
    }

    /// Returns a copy with the endpoint replaced.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Opaque bearer credential. Shape is never validated.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret, for building the Authorization header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Outcome of a single prompt. Failures are data, not control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    /// Completion text, exactly as the provider returned it.
    Completed(String),
    Failed { model: String, description: String },
}

impl CompletionResult {
    pub fn failed(model: &str, description: impl Into<String>) -> Self {
        CompletionResult::Failed {
            model: model.to_string(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CompletionResult::Failed { .. })
    }

    /// Like `Display`, but failure markers name the model that failed.
    pub fn qualified(&self) -> String {
        match self {
            CompletionResult::Completed(text) => text.clone(),
            CompletionResult::Failed { model, description } => {
                format!("Error calling {model}: {description}")
            }
        }
    }
}

impl fmt::Display for CompletionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionResult::Completed(text) => f.write_str(text),
            CompletionResult::Failed { description, .. } => write!(f, "Error: {description}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_displays_verbatim() {
        let result = CompletionResult::Completed("  Hi\n".to_string());
        assert_eq!(result.to_string(), "  Hi\n");
        assert!(!result.is_error());
    }

    #[test]
    fn test_failed_display_and_qualified() {
        let result = CompletionResult::failed("gpt-4o", "network error: refused");
        assert!(result.is_error());
        assert_eq!(result.to_string(), "Error: network error: refused");
        assert_eq!(
            result.qualified(),
            "Error calling gpt-4o: network error: refused"
        );
    }

    #[test]
    fn test_model_spec_constructors() {
        let native = ModelSpec::native("gpt-4o");
        assert_eq!(native.provider, Provider::Native);
        assert!(native.endpoint.is_none());

        let raw = ModelSpec::raw_http("local", None).with_endpoint("http://localhost:8080/v1/completions");
        assert_eq!(raw.provider, Provider::RawHttp);
        assert_eq!(
            raw.endpoint.as_deref(),
            Some("http://localhost:8080/v1/completions")
        );
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("sk-secret");
        assert_eq!(credential.expose(), "sk-secret");
        assert!(!format!("{credential:?}").contains("sk-secret"));
    }

    #[test]
    fn test_chat_message_serializes_lowercase_role() {
        let json = serde_json::to_string(&ChatMessage::system("be brief")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"be brief"}"#);
    }
}
