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
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            base_url,
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
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let mut body = json!({
            "model": self.model,
            "messages": messages
                .iter()
                .map(|message| json!({ "role": message.role, "content": message.content }))
                .collect::<Vec<_>>(),
            "temperature": self.temperature,
            "stream": true
        });
        if let Some(stop) = stop {
            body["stop"] = json!([stop]);
        }

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let payload = response.text().await.unwrap_or_default();
            return Err(AgentError::ProviderTransport(format!(
                "OpenAI API error ({}): {}",
                status,
                extract_api_error(&payload)
            )));
        }

        let deltas = response
            .bytes_stream()
            .eventsource()
            .take_while(|event| {
                let done = matches!(event, Ok(ev) if ev.data.trim() == "[DONE]");
                ready(!done)
            })
            .filter_map(|event| {
                ready(match event {
                    Ok(ev) => delta_text(&ev.data).map(Ok),
                    Err(err) => Some(Err(AgentError::ProviderTransport(err.to_string()))),
                })
            });
        Ok(Box::pin(deltas) as DeltaStream)
    }
}

impl CompletionProvider for OpenAiProvider {
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
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

fn delta_text(data: &str) -> Option<String> {
    let chunk = match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk,
        Err(err) => {
            debug!("skipping unparseable SSE event: {err}, data: {data}");
            return None;
        }
    };
    chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_content_delta() {
        let data = r#"{"choices":[{"delta":{"content":"dd\n"}}]}"#;
        assert_eq!(delta_text(data), Some("dd\n".to_string()));
    }

    #[test]
    fn skips_role_only_and_empty_deltas() {
        assert_eq!(delta_text(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#), None);
        assert_eq!(delta_text(r#"{"choices":[{"delta":{"content":""}}]}"#), None);
        assert_eq!(delta_text("not json"), None);
    }
}
