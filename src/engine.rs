use crate::error::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Claude,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Claude => "claude",
        }
    }

    pub fn key_env_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Claude => "ANTHROPIC_API_KEY",
        }
    }
}

/// One entry of the engine registry: a caller-facing id bound to a provider
/// and its default request parameters.
#[derive(Debug, Clone, Copy)]
pub struct EngineSpec {
    pub id: &'static str,
    pub provider: ProviderKind,
    pub model: &'static str,
    pub temperature: f32,
}

pub const DEFAULT_ENGINE: &str = "gpt-4o";

static ENGINES: &[EngineSpec] = &[
    EngineSpec {
        id: "gpt-4o",
        provider: ProviderKind::OpenAI,
        model: "gpt-4o",
        temperature: 0.9,
    },
    EngineSpec {
        id: "gpt-4o-mini",
        provider: ProviderKind::OpenAI,
        model: "gpt-4o-mini",
        temperature: 0.9,
    },
    EngineSpec {
        id: "claude-sonnet",
        provider: ProviderKind::Claude,
        model: "claude-sonnet-4-5",
        temperature: 0.9,
    },
    EngineSpec {
        id: "claude-haiku",
        provider: ProviderKind::Claude,
        model: "claude-haiku-4-5",
        temperature: 0.9,
    },
];

/// Resolve an engine id against the static registry. Fails before any
/// network call is made.
pub fn lookup_engine(id: &str) -> Result<&'static EngineSpec, AgentError> {
    let wanted = id.trim();
    ENGINES
        .iter()
        .find(|spec| spec.id == wanted)
        .ok_or_else(|| {
            AgentError::Configuration(format!("unknown engine '{}' (try --list-engines)", wanted))
        })
}

pub fn engine_ids() -> impl Iterator<Item = &'static str> {
    ENGINES.iter().map(|spec| spec.id)
}

/// API key from the CLI flag when given, otherwise from the provider's
/// environment variable.
pub fn resolve_key(provider: ProviderKind, cli_key: Option<&str>) -> Result<String, AgentError> {
    if let Some(key) = cli_key {
        let key = key.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
    }
    let var = provider.key_env_var();
    if let Ok(value) = std::env::var(var) {
        let value = value.trim().to_string();
        if !value.is_empty() {
            return Ok(value);
        }
    }
    Err(AgentError::Configuration(format!(
        "no API key for {} (set {} or pass --key)",
        provider.as_str(),
        var
    )))
}
