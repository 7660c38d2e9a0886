//! Scripted opponents that never call a model.

use super::traits::{Agent, MemoryCapability, MemoryUpdate, RoundQuestion, StepOutput, StepPrompt};
use crate::game::division::format_amount;
use async_trait::async_trait;

/// Plays the same move every round.
#[derive(Debug, Clone)]
pub struct FixedMoveAgent {
    fixed_move: char,
}

impl FixedMoveAgent {
    pub fn new(fixed_move: char) -> Self {
        Self { fixed_move }
    }
}

#[async_trait]
impl Agent for FixedMoveAgent {
    fn name(&self) -> &str {
        "fixed_move"
    }

    async fn init_memory(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn make_step(&mut self, _prompt: StepPrompt) -> anyhow::Result<StepOutput> {
        Ok(self.fixed_move.to_string().into())
    }
}

/// Plays `first` on even rounds and `second` on odd ones.
#[derive(Debug, Clone)]
pub struct AlternatingAgent {
    first: char,
    second: char,
}

impl AlternatingAgent {
    pub fn new(first: char, second: char) -> Self {
        Self { first, second }
    }
}

#[async_trait]
impl Agent for AlternatingAgent {
    fn name(&self) -> &str {
        "alternating"
    }

    async fn init_memory(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn make_step(&mut self, prompt: StepPrompt) -> anyhow::Result<StepOutput> {
        let round = prompt.round().unwrap_or(0);
        let mv = if round % 2 == 0 { self.first } else { self.second };
        Ok(mv.to_string().into())
    }
}

/// Tit-for-tat: opens cooperatively, then repeats the opponent's last move.
#[derive(Debug, Clone)]
pub struct ImitativeAgent {
    cooperative_move: char,
    last_seen: Option<char>,
}

impl ImitativeAgent {
    pub fn new(cooperative_move: char) -> Self {
        Self {
            cooperative_move,
            last_seen: None,
        }
    }
}

#[async_trait]
impl Agent for ImitativeAgent {
    fn name(&self) -> &str {
        "imitative"
    }

    async fn init_memory(&mut self) -> anyhow::Result<()> {
        self.last_seen = None;
        Ok(())
    }

    async fn make_step(&mut self, _prompt: StepPrompt) -> anyhow::Result<StepOutput> {
        let mv = self.last_seen.unwrap_or(self.cooperative_move);
        Ok(mv.to_string().into())
    }

    fn memory(&mut self) -> Option<&mut dyn MemoryCapability> {
        Some(self)
    }
}

#[async_trait]
impl MemoryCapability for ImitativeAgent {
    async fn update_memory(&mut self, update: &MemoryUpdate) -> anyhow::Result<String> {
        self.last_seen = Some(update.opponent_move);
        Ok(format!(
            "Imitative Agent: opponent played {} in round {}",
            update.opponent_move,
            update.round + 1
        ))
    }
}

/// Division-game seat driven by a fixed give-away share.
///
/// As proposer it offers `total_sum * ratio`; as responder it accepts any
/// offer of at least that share.
#[derive(Debug, Clone)]
pub struct RatioDivisionAgent {
    ratio: f64,
    question: Option<RoundQuestion>,
}

impl RatioDivisionAgent {
    pub fn new(ratio: f64) -> Self {
        Self {
            ratio,
            question: None,
        }
    }
}

#[async_trait]
impl Agent for RatioDivisionAgent {
    fn name(&self) -> &str {
        "ratio_division"
    }

    async fn init_memory(&mut self) -> anyhow::Result<()> {
        self.question = None;
        Ok(())
    }

    async fn make_step(&mut self, _prompt: StepPrompt) -> anyhow::Result<StepOutput> {
        let Some(question) = &self.question else {
            anyhow::bail!(
                "ratio division agent asked to decide before a round question was prepared"
            );
        };
        let threshold = question.total_sum * self.ratio;
        let tolerance = 1e-9 * question.total_sum.abs().max(1.0);
        let decision = match question.give_sum {
            Some(offer) if offer + tolerance >= threshold => "ACCEPT".to_string(),
            Some(_) => "REJECT".to_string(),
            None => {
                let give = threshold;
                let keep = question.total_sum - give;
                format!("{};{}", format_amount(keep), format_amount(give))
            }
        };
        Ok(decision.into())
    }

    fn prepare_round_question(&mut self, question: &RoundQuestion) -> anyhow::Result<()> {
        self.question = Some(question.clone());
        Ok(())
    }
}
