pub mod invoker;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod types;

pub use invoker::{CompletionInvoker, InvokerSettings};
pub use provider::{CompletionProvider, CompletionRequest, ProviderError};
pub use providers::{OpenAiProvider, RawHttpProvider};
pub use resolver::{CallPlan, ProviderTable};
pub use types::{ChatMessage, CompletionResult, Credential, ModelSpec, Role};
