use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Emotion label reported for agents that cannot introspect.
pub const NEUTRAL_EMOTION: &str = "neutral";

/// Logged instead of a memory summary for agents without memory.
pub const NO_MEMORY_UPDATE: &str = "Rule-based Agent: No memory update";

/// What the protocol asks for when it requests a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPrompt {
    /// One-shot games: no round context, the agent uses its opening prompt.
    Initial,
    /// Repeated games: the 0-based round index, passed through untouched.
    Round(usize),
}

impl StepPrompt {
    pub fn round(self) -> Option<usize> {
        match self {
            Self::Initial => None,
            Self::Round(index) => Some(index),
        }
    }
}

/// A decision plus the free-text reasoning an agent may emit with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StepOutput {
    pub decision: String,
    pub scratchpad: Option<String>,
}

impl StepOutput {
    pub fn with_scratchpad(decision: impl Into<String>, scratchpad: impl Into<String>) -> Self {
        Self {
            decision: decision.into(),
            scratchpad: Some(scratchpad.into()),
        }
    }
}

impl From<String> for StepOutput {
    fn from(decision: String) -> Self {
        Self {
            decision,
            scratchpad: None,
        }
    }
}

impl From<&str> for StepOutput {
    fn from(decision: &str) -> Self {
        Self::from(decision.to_string())
    }
}

impl From<(String, String)> for StepOutput {
    fn from((decision, scratchpad): (String, String)) -> Self {
        Self::with_scratchpad(decision, scratchpad)
    }
}

/// Values substituted into an agent's round question before a one-shot game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundQuestion {
    pub coplayer: String,
    pub total_sum: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_sum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub give_sum: Option<f64>,
}

/// Everything an agent learns after a round of a repeated game, from its own
/// point of view.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryUpdate {
    pub own_move: char,
    pub opponent_move: char,
    pub own_payoff: f64,
    pub opponent_payoff: f64,
    pub round: usize,
    pub inner_emotion: Option<String>,
    pub outer_emotion: Option<String>,
    pub opponent_outer_emotion: Option<String>,
}

/// A participant in a game.
///
/// Optional abilities are exposed through the capability accessors; an
/// implementation that has them overrides the accessor to return `Some`.
#[async_trait]
pub trait Agent: Send {
    fn name(&self) -> &str;

    async fn init_memory(&mut self) -> anyhow::Result<()>;

    async fn make_step(&mut self, prompt: StepPrompt) -> anyhow::Result<StepOutput>;

    /// Fills the round-question template with game values. Agents without a
    /// templated prompt ignore it.
    fn prepare_round_question(&mut self, _question: &RoundQuestion) -> anyhow::Result<()> {
        Ok(())
    }

    /// Injects a message from the game into the agent's conversation.
    fn push_context(&mut self, _text: &str) {}

    fn emotions(&mut self) -> Option<&mut dyn EmotionCapability> {
        None
    }

    fn memory(&mut self) -> Option<&mut dyn MemoryCapability> {
        None
    }
}

#[async_trait]
pub trait EmotionCapability: Send {
    async fn inner_emotion(&mut self) -> anyhow::Result<String>;

    async fn outer_emotion(&mut self) -> anyhow::Result<String>;

    fn update_emotion_memory(&mut self, label: &str);
}

#[async_trait]
pub trait MemoryCapability: Send {
    /// Records the round and returns the summary the agent stored.
    async fn update_memory(&mut self, update: &MemoryUpdate) -> anyhow::Result<String>;
}
