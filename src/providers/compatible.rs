//! OpenAI-compatible chat completions client.
//! Works against any backend exposing `/chat/completions`: hosted APIs,
//! Bedrock access gateways, vLLM, Ollama and similar.

use super::scrub::sanitize_api_error;
use super::traits::{ChatMessage, Provider, merge_system_into_first_user};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const MAX_TOKENS: u32 = 1024;

pub struct OpenAiCompatibleProvider {
    pub(crate) name: String,
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    /// Pre-computed chat completions URL (avoids `format!` per request).
    cached_chat_url: String,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(name: &str, base_url: &str, api_key: Option<&str>, client: Client) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let cached_chat_url = if base_url.contains("chat/completions") {
            base_url.clone()
        } else {
            format!("{base_url}/chat/completions")
        };

        Self {
            name: name.to_string(),
            base_url,
            api_key: api_key.map(ToString::to_string),
            cached_chat_url,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_completions_url(&self) -> &str {
        &self.cached_chat_url
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    reasoning_content: Option<String>,
}

/// Reply text with any reasoning block wrapped in `<think>` tags ahead of it.
fn extract_chat_text(response: &ChatResponse) -> Option<String> {
    let message = &response.choices.first()?.message;
    let mut text = String::new();
    if let Some(reasoning) = message.reasoning_content.as_deref().filter(|r| !r.trim().is_empty()) {
        text.push_str("<think>");
        text.push_str(reasoning);
        text.push_str("</think>\n");
    }
    if let Some(content) = message.content.as_deref() {
        text.push_str(content);
    }
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Backends that reject system prompts say so in their error text.
fn rejects_system_prompt(error: &str) -> bool {
    let lower = error.to_ascii_lowercase();
    lower.contains("system") && lower.contains("support")
}

enum CallError {
    SystemUnsupported(String),
    Other(anyhow::Error),
}

impl OpenAiCompatibleProvider {
    fn apply_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn call_chat_completions(&self, request: &ChatRequest) -> Result<String, CallError> {
        let response = self
            .apply_auth_header(self.client.post(self.chat_completions_url()).json(request))
            .send()
            .await
            .with_context(|| format!("{} chat completions request failed", self.name))
            .map_err(CallError::Other)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
            let sanitized = sanitize_api_error(&body);
            if status.is_client_error() && rejects_system_prompt(&sanitized) {
                return Err(CallError::SystemUnsupported(sanitized));
            }
            return Err(CallError::Other(anyhow::anyhow!(
                "{} API error ({status}): {sanitized}",
                self.name
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .with_context(|| format!("{} chat completions JSON decode failed", self.name))
            .map_err(CallError::Other)?;

        extract_chat_text(&parsed).ok_or_else(|| {
            CallError::Other(anyhow::anyhow!(
                "{} returned an empty response for model {}",
                self.name,
                request.model
            ))
        })
    }

    fn build_request(
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> ChatRequest {
        let mut wire = Vec::with_capacity(messages.len() + 1);
        if let Some(sys) = system_prompt {
            wire.push(Message {
                role: "system",
                content: sys.to_string(),
            });
        }
        wire.extend(messages.iter().map(|m| Message {
            role: m.role.as_str(),
            content: m.content.clone(),
        }));
        ChatRequest {
            model: model.to_string(),
            messages: wire,
            temperature,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        if self.api_key.is_none() {
            anyhow::bail!(
                "{} API key not set. Set EMOGAMES_API_KEY or [provider] api_key in the config.",
                self.name
            );
        }

        let request = Self::build_request(system_prompt, messages, model, temperature);
        match self.call_chat_completions(&request).await {
            Ok(text) => Ok(text),
            Err(CallError::SystemUnsupported(reason)) => {
                let Some(sys) = system_prompt else {
                    anyhow::bail!("{} API error: {reason}", self.name);
                };
                tracing::debug!(
                    provider = self.name.as_str(),
                    model,
                    "backend rejected system prompt, merging into first user turn"
                );
                let merged = merge_system_into_first_user(sys, messages);
                let retry = Self::build_request(None, &merged, model, temperature);
                self.call_chat_completions(&retry)
                    .await
                    .map_err(|err| match err {
                        CallError::SystemUnsupported(reason) => {
                            anyhow::anyhow!("{} API error: {reason}", self.name)
                        }
                        CallError::Other(err) => err.context(format!(
                            "{} fallback without system prompt failed",
                            self.name
                        )),
                    })
            }
            Err(CallError::Other(err)) => Err(err),
        }
    }
}
