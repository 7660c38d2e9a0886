use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One turn of an agent's conversation. System text travels separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Folds system text into the first user turn, for backends that refuse a
/// separate system prompt.
pub fn merge_system_into_first_user(
    system_prompt: &str,
    messages: &[ChatMessage],
) -> Vec<ChatMessage> {
    let mut merged = messages.to_vec();
    if let Some(first) = merged.first_mut()
        && first.role == ChatRole::User
    {
        first.content = format!(
            "System Instructions:\n{system_prompt}\n\nUser Request:\n{}",
            first.content
        );
    }
    merged
}

/// A model backend. Implementations own transport, auth and retries; the
/// game protocols never see one directly.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    async fn chat(
        &self,
        system_prompt: Option<&str>,
        messages: &[ChatMessage],
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String>;

    /// Single-turn convenience wrapper.
    async fn ask(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        self.chat(system_prompt, &[ChatMessage::user(message)], model, temperature)
            .await
    }
}
