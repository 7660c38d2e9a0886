use super::compatible::OpenAiCompatibleProvider;
use super::reliable::ReliableProvider;
use super::traits::Provider;
use crate::config::ProviderConfig;
use std::sync::Arc;
use std::time::Duration;

/// Resolve the API key from config, then a backend-specific variable, then
/// the generic fallbacks.
fn resolve_api_key(name: &str, explicit_api_key: Option<&str>) -> Option<String> {
    if let Some(key) = explicit_api_key.map(str::trim).filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }

    let provider_env_candidates: &[&str] = match name {
        "openai" => &["OPENAI_API_KEY"],
        "openrouter" => &["OPENROUTER_API_KEY"],
        "groq" => &["GROQ_API_KEY"],
        "mistral" => &["MISTRAL_API_KEY"],
        "deepseek" => &["DEEPSEEK_API_KEY"],
        "together" | "together-ai" => &["TOGETHER_API_KEY"],
        _ => &[],
    };

    provider_env_candidates
        .iter()
        .chain(["EMOGAMES_API_KEY", "API_KEY"].iter())
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// HTTP client shared by every seat of a session.
fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to a default HTTP client");
            reqwest::Client::new()
        })
}

/// Builds the shared chat backend: an OpenAI-compatible client wrapped in
/// retry with backoff.
pub fn create_provider(config: &ProviderConfig) -> Arc<dyn Provider> {
    let api_key = resolve_api_key(&config.name, config.api_key.as_deref());
    let client = http_client(config.timeout_secs);
    let inner = OpenAiCompatibleProvider::new(
        &config.name,
        &config.base_url,
        api_key.as_deref(),
        client,
    );
    tracing::debug!(
        provider = %config.name,
        base_url = %inner.base_url(),
        has_key = api_key.is_some(),
        "provider created"
    );
    Arc::new(ReliableProvider::new(
        Box::new(inner),
        config.max_retries,
        config.backoff_ms,
    ))
}
