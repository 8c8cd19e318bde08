use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nvim_agent::error::AgentError;
use nvim_agent::llm::{ChatMessage, ClaudeProvider, CompletionProvider, OpenAiProvider};

fn openai_sse(chunks: &[&str]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

async fn collect(
    provider: &dyn CompletionProvider,
    stop: Option<&str>,
) -> Result<Vec<String>, AgentError> {
    let messages = [
        ChatMessage::system("system prompt"),
        ChatMessage::user("delete line 3"),
    ];
    let mut stream = provider.stream(&messages, stop).await?;
    let mut out = Vec::new();
    while let Some(delta) = stream.next().await {
        out.push(delta?);
    }
    Ok(out)
}

#[tokio::test]
async fn openai_streams_content_deltas_in_order() {
    let server = MockServer::start().await;
    let body = openai_sse(&[
        r#"{"choices":[{"delta":{"role":"assistant"}}]}"#,
        r#"{"choices":[{"delta":{"content":"```vim\n"}}]}"#,
        r#"{"choices":[{"delta":{"content":"dd\n"}}]}"#,
        r#"{"choices":[{"delta":{"content":"```"}}]}"#,
    ]);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "stream": true,
            "stop": ["```"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("sk-test", "gpt-4o", 0.9).with_base_url(server.uri());
    let deltas = collect(&provider, Some("```")).await.expect("stream opens");
    assert_eq!(deltas, vec!["```vim\n", "dd\n", "```"]);
}

#[tokio::test]
async fn openai_surfaces_api_errors_before_streaming() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_raw(
            r#"{"error":{"message":"bad key","type":"invalid_request_error","code":"invalid_api_key"}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new("sk-bad", "gpt-4o", 0.9).with_base_url(server.uri());
    let err = collect(&provider, None).await.unwrap_err();
    match err {
        AgentError::ProviderTransport(message) => {
            assert!(message.contains("401"), "message: {message}");
            assert!(message.contains("bad key"), "message: {message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn claude_streams_text_deltas_and_sends_stop_sequences() {
    let server = MockServer::start().await;
    let body = concat!(
        "event: message_start\n",
        "data: {\"type\":\"message_start\",\"message\":{}}\n\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"```vim\\n\"}}\n\n",
        "event: content_block_delta\n",
        "data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\":%d\\n\"}}\n\n",
        "event: message_stop\n",
        "data: {\"type\":\"message_stop\"}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "sk-ant-test"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-5",
            "stream": true,
            "stop_sequences": ["```"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let provider =
        ClaudeProvider::new("sk-ant-test", "claude-sonnet-4-5", 0.9).with_base_url(server.uri());
    let deltas = collect(&provider, Some("```")).await.expect("stream opens");
    assert_eq!(deltas, vec!["```vim\n", ":%d\n"]);
}

#[tokio::test]
async fn claude_moves_system_messages_out_of_band() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(body_partial_json(json!({
            "system": "system prompt",
            "messages": [{ "role": "user", "content": "delete line 3" }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: {\"type\":\"message_stop\"}\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let provider =
        ClaudeProvider::new("sk-ant-test", "claude-sonnet-4-5", 0.9).with_base_url(server.uri());
    let deltas = collect(&provider, None).await.expect("stream opens");
    assert!(deltas.is_empty());
}
