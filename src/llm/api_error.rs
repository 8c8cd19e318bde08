use serde::Deserialize;

/// Compact a provider error payload into a single readable line. Falls back
/// to the raw body when the JSON shape is not recognized.
pub(crate) fn extract_api_error(body: &str) -> String {
    #[derive(Debug, Deserialize)]
    struct OpenAiErrorEnvelope {
        error: Option<OpenAiError>,
    }
    #[derive(Debug, Deserialize)]
    struct OpenAiError {
        message: Option<String>,
        #[serde(rename = "type")]
        kind: Option<String>,
        code: Option<String>,
    }
    #[derive(Debug, Deserialize)]
    struct ClaudeErrorEnvelope {
        error: Option<ClaudeError>,
    }
    #[derive(Debug, Deserialize)]
    struct ClaudeError {
        #[serde(rename = "type")]
        kind: Option<String>,
        message: Option<String>,
    }

    // the `code` field is what tells an OpenAI envelope from a Claude one
    if let Ok(parsed) = serde_json::from_str::<OpenAiErrorEnvelope>(body)
        && let Some(err) = parsed.error
        && err.code.is_some()
    {
        let message = err.message.unwrap_or_else(|| "unknown error".to_string());
        let kind = err.kind.unwrap_or_else(|| "unknown".to_string());
        let code = err.code.unwrap_or_else(|| "none".to_string());
        return format!("{} (type={}, code={})", message, kind, code);
    }
    if let Ok(parsed) = serde_json::from_str::<ClaudeErrorEnvelope>(body)
        && let Some(err) = parsed.error
    {
        let message = err.message.unwrap_or_else(|| "unknown error".to_string());
        let kind = err.kind.unwrap_or_else(|| "unknown".to_string());
        return format!("{} (type={})", message, kind);
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compacts_openai_error_payload() {
        let body = r#"{"error":{"message":"bad key","type":"invalid_request_error","code":"invalid_api_key"}}"#;
        assert_eq!(
            extract_api_error(body),
            "bad key (type=invalid_request_error, code=invalid_api_key)"
        );
    }

    #[test]
    fn compacts_claude_error_payload() {
        let body = r#"{"error":{"type":"overloaded_error","message":"busy"}}"#;
        assert_eq!(extract_api_error(body), "busy (type=overloaded_error)");
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(extract_api_error("plain text"), "plain text");
    }
}
