//! Language-model seat. Keeps one conversation per run and talks to the
//! backend through an injected [`Provider`].

use super::traits::{
    Agent, EmotionCapability, MemoryCapability, MemoryUpdate, RoundQuestion, StepOutput, StepPrompt,
};
use crate::prompt::PromptSet;
use crate::providers::{ChatMessage, ChatRole, Provider};
use anyhow::Context;
use async_trait::async_trait;
use std::sync::Arc;

pub struct LlmAgent {
    name: String,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f64,
    prompts: PromptSet,
    /// `<emotion>/<style>` the system prompt is conditioned on.
    emotion: Option<String>,
    do_scratchpad_step: bool,
    history: Vec<ChatMessage>,
    emotion_memory: Vec<String>,
    pending_question: Option<String>,
}

impl LlmAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f64,
        prompts: PromptSet,
    ) -> Self {
        let model = model.into();
        Self {
            name: format!("llm:{model}"),
            provider,
            model,
            temperature,
            prompts,
            emotion: None,
            do_scratchpad_step: false,
            history: Vec::new(),
            emotion_memory: Vec::new(),
            pending_question: None,
        }
    }

    pub fn with_emotion(mut self, emotion: Option<String>) -> Self {
        self.emotion = emotion.filter(|e| !e.is_empty());
        self
    }

    pub fn with_scratchpad(mut self, enabled: bool) -> Self {
        self.do_scratchpad_step = enabled;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn emotion_memory(&self) -> &[String] {
        &self.emotion_memory
    }

    /// Appends a user turn, folding it into a trailing user turn so the
    /// conversation keeps alternating roles.
    fn push_user(&mut self, text: &str) {
        match self.history.last_mut() {
            Some(last) if last.role == ChatRole::User => {
                last.content.push_str("\n\n");
                last.content.push_str(text);
            }
            _ => self.history.push(ChatMessage::user(text)),
        }
    }

    fn system_prompt(&self) -> anyhow::Result<String> {
        Ok(self
            .prompts
            .system(self.emotion.as_deref(), &self.emotion_memory)?)
    }

    /// Sends `text` as the next user turn and records the reply.
    async fn converse(&mut self, text: &str) -> anyhow::Result<String> {
        self.push_user(text);
        let system = self.system_prompt()?;
        let reply = self
            .provider
            .chat(Some(&system), &self.history, &self.model, self.temperature)
            .await
            .with_context(|| format!("{} chat request failed", self.provider.name()))?;
        self.history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Asks a question against the current conversation without recording it.
    async fn probe(&self, text: &str) -> anyhow::Result<String> {
        let mut messages = self.history.clone();
        match messages.last_mut() {
            Some(last) if last.role == ChatRole::User => {
                last.content.push_str("\n\n");
                last.content.push_str(text);
            }
            _ => messages.push(ChatMessage::user(text)),
        }
        let system = self.system_prompt()?;
        self.provider
            .chat(Some(&system), &messages, &self.model, self.temperature)
            .await
            .with_context(|| format!("{} emotion query failed", self.provider.name()))
    }
}

/// First word of a reply, lowercased and stripped of punctuation.
pub fn first_word_label(reply: &str) -> String {
    reply
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .find(|word| !word.is_empty())
        .unwrap_or_default()
        .to_lowercase()
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn init_memory(&mut self) -> anyhow::Result<()> {
        self.history.clear();
        self.emotion_memory.clear();
        self.pending_question = None;
        Ok(())
    }

    async fn make_step(&mut self, prompt: StepPrompt) -> anyhow::Result<StepOutput> {
        let question = match prompt {
            StepPrompt::Round(round) => self.prompts.table_round(round)?,
            StepPrompt::Initial => self
                .pending_question
                .take()
                .context("no round question prepared for a one-shot decision")?,
        };

        if !self.do_scratchpad_step {
            let decision = self.converse(&question).await?;
            return Ok(decision.trim().to_string().into());
        }

        let reasoning_request = format!("{question}\n\n{}", self.prompts.scratchpad()?);
        let reasoning = self.converse(&reasoning_request).await?;
        let final_request = self.prompts.final_answer()?;
        let decision = self.converse(&final_request).await?;
        Ok(StepOutput::with_scratchpad(decision.trim(), reasoning))
    }

    fn prepare_round_question(&mut self, question: &RoundQuestion) -> anyhow::Result<()> {
        self.pending_question = Some(self.prompts.division_question(question)?);
        Ok(())
    }

    fn push_context(&mut self, text: &str) {
        self.push_user(text);
    }

    fn emotions(&mut self) -> Option<&mut dyn EmotionCapability> {
        Some(self)
    }

    fn memory(&mut self) -> Option<&mut dyn MemoryCapability> {
        Some(self)
    }
}

#[async_trait]
impl EmotionCapability for LlmAgent {
    async fn inner_emotion(&mut self) -> anyhow::Result<String> {
        let question = self.prompts.inner_emotion()?;
        Ok(first_word_label(&self.probe(&question).await?))
    }

    async fn outer_emotion(&mut self) -> anyhow::Result<String> {
        let question = self.prompts.outer_emotion()?;
        Ok(first_word_label(&self.probe(&question).await?))
    }

    fn update_emotion_memory(&mut self, label: &str) {
        self.emotion_memory.push(label.to_string());
    }
}

#[async_trait]
impl MemoryCapability for LlmAgent {
    async fn update_memory(&mut self, update: &MemoryUpdate) -> anyhow::Result<String> {
        let summary = self.prompts.memory_update(update)?;
        self.push_user(&summary);
        Ok(summary)
    }
}
