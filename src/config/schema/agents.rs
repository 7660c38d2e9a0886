use serde::{Deserialize, Serialize};

/// Emotion label used by analysis for runs without an emotion prompt.
pub const NO_EMOTION: &str = "no_emotion";

/// One seat's agent, tagged by `agent_name` in TOML and in run snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "agent_name", rename_all = "snake_case")]
pub enum AgentConfig {
    #[serde(alias = "emotion_reflection_llm")]
    Llm(LlmAgentConfig),
    FixedMove(FixedMoveConfig),
    #[serde(alias = "alterating")]
    Alternating(AlternatingConfig),
    Imitative(ImitativeConfig),
    RatioDivision(RatioDivisionConfig),
}

impl AgentConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Llm(_) => "llm",
            Self::FixedMove(_) => "fixed_move",
            Self::Alternating(_) => "alternating",
            Self::Imitative(_) => "imitative",
            Self::RatioDivision(_) => "ratio_division",
        }
    }

    pub fn as_llm(&self) -> Option<&LlmAgentConfig> {
        match self {
            Self::Llm(llm) => Some(llm),
            _ => None,
        }
    }

    pub fn as_llm_mut(&mut self) -> Option<&mut LlmAgentConfig> {
        match self {
            Self::Llm(llm) => Some(llm),
            _ => None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::Llm(LlmAgentConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmAgentConfig {
    /// Backend model id; the provider default when absent.
    #[serde(default)]
    pub llm_name: Option<String>,
    #[serde(default)]
    pub has_emotion: bool,
    /// `<emotion>/<style>`, e.g. `anger/simple`. Ignored without `has_emotion`.
    #[serde(default)]
    pub emotion: String,
    #[serde(default)]
    pub do_scratchpad_step: bool,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub prompts: PromptOverrides,
}

impl LlmAgentConfig {
    /// The emotion family (`anger` of `anger/simple`), or `no_emotion`.
    pub fn emotion_family(&self) -> &str {
        if !self.has_emotion {
            return NO_EMOTION;
        }
        match self.emotion.split('/').next() {
            Some(family) if !family.is_empty() => family,
            _ => NO_EMOTION,
        }
    }

    /// Sets the emotion condition from a sweep label; `no_emotion` clears it.
    pub fn set_emotion_condition(&mut self, label: &str) {
        if label.is_empty() || label == NO_EMOTION {
            self.has_emotion = false;
            self.emotion.clear();
        } else {
            self.has_emotion = true;
            self.emotion = label.to_string();
        }
    }
}

/// Replacement Tera templates for an LLM agent. Unset fields keep the
/// built-in prompt for the game being played.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PromptOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedMoveConfig {
    #[serde(rename = "move")]
    pub fixed_move: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternatingConfig {
    /// Played on even rounds; the first move.
    #[serde(default = "default_first")]
    pub first: char,
    #[serde(default = "default_second")]
    pub second: char,
}

impl Default for AlternatingConfig {
    fn default() -> Self {
        Self {
            first: default_first(),
            second: default_second(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImitativeConfig {
    /// Opening move before the opponent has played.
    #[serde(default = "default_first")]
    pub cooperative_move: char,
}

impl Default for ImitativeConfig {
    fn default() -> Self {
        Self {
            cooperative_move: default_first(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioDivisionConfig {
    /// Share of the total given away, in `0..=1`.
    pub ratio: f64,
}

fn default_first() -> char {
    'J'
}

fn default_second() -> char {
    'F'
}
