use std::future::Future;
use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use futures::future::ready;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::AgentError;
use crate::llm::api_error::extract_api_error;
use crate::llm::{ChatMessage, CompletionProvider, DeltaStream};

#[derive(Debug, Clone)]
pub struct ClaudeProvider {
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
    version: String,
    http: reqwest::Client,
}

impl ClaudeProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        let base_url = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1".to_string());
        let version =
            std::env::var("ANTHROPIC_API_VERSION").unwrap_or_else(|_| "2023-06-01".to_string());
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            base_url,
            version,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn open_stream(
        &self,
        messages: &[ChatMessage],
        stop: Option<&str>,
    ) -> Result<DeltaStream, AgentError> {
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));

        // The messages API carries the system prompt out-of-band.
        let system = messages
            .iter()
            .filter(|message| message.role == "system")
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let turns = messages
            .iter()
            .filter(|message| message.role != "system")
            .map(|message| json!({ "role": message.role, "content": message.content }))
            .collect::<Vec<_>>();

        let mut body = json!({
            "model": self.model,
            "max_tokens": 2048,
            "temperature": self.temperature,
            "system": system,
            "messages": turns,
            "stream": true
        });
        if let Some(stop) = stop {
            body["stop_sequences"] = json!([stop]);
        }

        let response = self
            .http
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", &self.version)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let payload = response.text().await.unwrap_or_default();
            return Err(AgentError::ProviderTransport(format!(
                "Claude API error ({}): {}",
                status,
                extract_api_error(&payload)
            )));
        }

        let deltas = response
            .bytes_stream()
            .eventsource()
            .filter_map(|event| {
                ready(match event {
                    Ok(ev) => delta_from_event(&ev.data),
                    Err(err) => Some(Err(AgentError::ProviderTransport(err.to_string()))),
                })
            });
        Ok(Box::pin(deltas) as DeltaStream)
    }
}

impl CompletionProvider for ClaudeProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn stream<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        stop: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<DeltaStream, AgentError>> + Send + 'a>> {
        Box::pin(self.open_stream(messages, stop))
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamEvent {
    ContentBlockDelta { delta: BlockDelta },
    Error { error: StreamEventError },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum BlockDelta {
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct StreamEventError {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
}

fn delta_from_event(data: &str) -> Option<Result<String, AgentError>> {
    let event = match serde_json::from_str::<StreamEvent>(data) {
        Ok(event) => event,
        Err(err) => {
            debug!("skipping unparseable SSE event: {err}, data: {data}");
            return None;
        }
    };
    match event {
        StreamEvent::ContentBlockDelta {
            delta: BlockDelta::TextDelta { text },
        } if !text.is_empty() => Some(Ok(text)),
        StreamEvent::Error { error } => Some(Err(AgentError::ProviderTransport(format!(
            "{} (type={})",
            error.message.unwrap_or_else(|| "unknown error".to_string()),
            error.kind.unwrap_or_else(|| "unknown".to_string())
        )))),
        _ => None,
    }
}
