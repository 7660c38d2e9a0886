use crate::game::{DivisionVariant, EmotionFlags, PayoffTable};
use serde::{Deserialize, Serialize};

/// Words substituted into prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_coplayer")]
    pub coplayer: String,
    /// Cooperative move.
    #[serde(default = "default_move1")]
    pub move1: char,
    /// Defecting move.
    #[serde(default = "default_move2")]
    pub move2: char,
}

fn default_currency() -> String {
    "dollars".into()
}

fn default_coplayer() -> String {
    "coplayer".into()
}

fn default_move1() -> char {
    'J'
}

fn default_move2() -> char {
    'F'
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            coplayer: default_coplayer(),
            move1: default_move1(),
            move2: default_move2(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableGameConfig {
    #[serde(default = "default_table_name")]
    pub name: String,
    #[serde(default = "default_n_steps")]
    pub n_steps: usize,
    #[serde(default = "default_true")]
    pub need_check_emotions: bool,
    #[serde(default)]
    pub need_demonstrate_emotions: bool,
    #[serde(default)]
    pub memorize_demonstrated_emotions: bool,
    #[serde(default)]
    pub memorize_seen_emotions: bool,
    /// Ordered; the first entry's first move is the parse fallback.
    #[serde(default = "PayoffTable::prisoners_dilemma")]
    pub payoffs: PayoffTable,
}

fn default_table_name() -> String {
    "prisoner_dilemma".into()
}

fn default_n_steps() -> usize {
    5
}

fn default_true() -> bool {
    true
}

impl TableGameConfig {
    pub fn emotion_flags(&self) -> EmotionFlags {
        EmotionFlags {
            check_inner: self.need_check_emotions,
            demonstrate_outer: self.need_demonstrate_emotions,
            memorize_demonstrated: self.memorize_demonstrated_emotions,
            memorize_seen: self.memorize_seen_emotions,
        }
    }
}

impl Default for TableGameConfig {
    fn default() -> Self {
        Self {
            name: default_table_name(),
            n_steps: default_n_steps(),
            need_check_emotions: true,
            need_demonstrate_emotions: false,
            memorize_demonstrated_emotions: false,
            memorize_seen_emotions: false,
            payoffs: PayoffTable::prisoners_dilemma(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionGameConfig {
    #[serde(default = "default_variant")]
    pub name: DivisionVariant,
    #[serde(default = "default_total_sum")]
    pub total_sum: f64,
    #[serde(default)]
    pub do_second_step: bool,
}

fn default_variant() -> DivisionVariant {
    DivisionVariant::Dictator
}

fn default_total_sum() -> f64 {
    1000.0
}

impl Default for DivisionGameConfig {
    fn default() -> Self {
        Self {
            name: default_variant(),
            total_sum: default_total_sum(),
            do_second_step: false,
        }
    }
}
