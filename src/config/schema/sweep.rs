use super::agents::NO_EMOTION;
use serde::{Deserialize, Serialize};

/// Repeated-game sweep: every model against every emotion condition, with
/// `[agent2]` as the fixed opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSweepConfig {
    #[serde(default)]
    pub models: Vec<String>,
    /// `<emotion>/<style>` labels; `no_emotion` runs without an emotion prompt.
    #[serde(default = "default_table_emotions")]
    pub emotions: Vec<String>,
}

fn default_table_emotions() -> Vec<String> {
    vec![
        "anger/simple".into(),
        "happiness/simple".into(),
        NO_EMOTION.into(),
    ]
}

impl Default for TableSweepConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            emotions: default_table_emotions(),
        }
    }
}

/// Division-game sweep. Phase one runs LLM proposers in dictator and
/// ultimatum games; phase two runs LLM responders against ratio proposers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionSweepConfig {
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default = "default_division_emotions")]
    pub emotions: Vec<String>,
    /// Adds one run per model and scratchpad setting without emotion.
    #[serde(default = "default_true")]
    pub include_no_emotion: bool,
    #[serde(default = "default_scratchpad_options")]
    pub scratchpad_options: Vec<bool>,
    #[serde(default = "default_total_sums")]
    pub total_sums: Vec<f64>,
    #[serde(default = "default_coplayers")]
    pub coplayers: Vec<String>,
    /// Give-away shares of the scripted proposers in phase two.
    #[serde(default = "default_split_ratios")]
    pub split_ratios: Vec<f64>,
}

fn default_division_emotions() -> Vec<String> {
    vec!["anger/simple".into(), "happiness/simple".into()]
}

fn default_true() -> bool {
    true
}

fn default_scratchpad_options() -> Vec<bool> {
    vec![true, false]
}

fn default_total_sums() -> Vec<f64> {
    vec![1000.0]
}

fn default_coplayers() -> Vec<String> {
    vec!["opponent".into()]
}

fn default_split_ratios() -> Vec<f64> {
    vec![0.2]
}

impl Default for DivisionSweepConfig {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            emotions: default_division_emotions(),
            include_no_emotion: true,
            scratchpad_options: default_scratchpad_options(),
            total_sums: default_total_sums(),
            coplayers: default_coplayers(),
            split_ratios: default_split_ratios(),
        }
    }
}

impl DivisionSweepConfig {
    /// Emotion conditions in run order, `no_emotion` last when enabled.
    pub fn emotion_conditions(&self) -> Vec<String> {
        let mut conditions = self.emotions.clone();
        if self.include_no_emotion && !conditions.iter().any(|c| c == NO_EMOTION) {
            conditions.push(NO_EMOTION.into());
        }
        conditions
    }
}
