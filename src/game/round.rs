use super::pair::Pair;
use crate::error::LogError;
use crate::logger::{Category, TwoAgentsLogger};

/// Everything one completed round of a repeated game produced.
///
/// Built once the payoff is known and handed to the logger in one go; a
/// skipped round never becomes a record.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub round: usize,
    pub moves: Pair<char>,
    pub payoffs: Pair<f64>,
    pub scratchpads: Pair<Option<String>>,
    pub inner_emotions: Option<Pair<String>>,
    pub outer_emotions: Option<Pair<String>>,
    pub memory: Pair<String>,
}

impl RoundRecord {
    /// Appends the record to the run's tables. Emotion tables only get a row
    /// when that emotion was queried this round.
    pub fn persist(&self, logger: &TwoAgentsLogger) -> Result<(), LogError> {
        let moves = self.moves.map(String::from);
        logger.log_round(Category::Decisions, pair_str(&moves))?;

        let scratchpads = self.scratchpads.as_ref().map(|s| s.as_deref().unwrap_or(""));
        logger.log_round(Category::DecisionsScratchpad, scratchpads)?;

        if let Some(inner) = &self.inner_emotions {
            logger.log_round(Category::InnerEmotions, pair_str(inner))?;
        }
        if let Some(outer) = &self.outer_emotions {
            logger.log_round(Category::OuterEmotions, pair_str(outer))?;
        }
        logger.log_round(Category::Memory, pair_str(&self.memory))
    }
}

fn pair_str(pair: &Pair<String>) -> Pair<&str> {
    pair.as_ref().map(String::as_str)
}
