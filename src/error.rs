use thiserror::Error;

/// Errors raised inside one dispatch session. All variants are fatal to the
/// session that raised them; the surrounding request loop reports the error
/// and accepts the next request.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Bad setup detected before any network call: unknown engine id,
    /// missing API key.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The completion call failed or the delta stream broke mid-response.
    /// Statements already dispatched stay applied.
    #[error("provider transport error: {0}")]
    ProviderTransport(String),

    /// The editor could not be reached at session start.
    #[error("editor unavailable: {0}")]
    EditorUnavailable(String),

    /// A single input submission failed mid-session; the remaining statement
    /// sequence is abandoned.
    #[error("editor input rejected: {0}")]
    EditorSubmission(String),
}

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        AgentError::ProviderTransport(err.to_string())
    }
}
