mod api_error;
mod providers;

use std::future::Future;
use std::pin::Pin;

use futures::Stream;

use crate::engine::{EngineSpec, ProviderKind};
use crate::error::AgentError;

pub use providers::claude::ClaudeProvider;
pub use providers::openai::OpenAiProvider;

/// One role-tagged message of a chat request.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Lazy, in-order sequence of text fragments for a single assistant turn.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<String, AgentError>> + Send>>;

/// A backing completion engine. One network call per `stream` invocation,
/// no retries; failures surface through the initial future or through the
/// stream items.
pub trait CompletionProvider: Send + Sync {
    fn model_name(&self) -> &str;

    fn stream<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        stop: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<DeltaStream, AgentError>> + Send + 'a>>;
}

/// Constructor-time selection. The engine spec was already resolved through
/// the registry, so this cannot fail.
pub fn build_provider(spec: &EngineSpec, api_key: String) -> Box<dyn CompletionProvider> {
    match spec.provider {
        ProviderKind::OpenAI => {
            Box::new(OpenAiProvider::new(api_key, spec.model, spec.temperature))
        }
        ProviderKind::Claude => {
            Box::new(ClaudeProvider::new(api_key, spec.model, spec.temperature))
        }
    }
}
