//! One-shot division games: dictator and ultimatum.

use super::moves::{Split, parse_accept_reject, parse_numeric_split};
use super::pair::{Pair, Side};
use crate::agent::{Agent, RoundQuestion, StepPrompt};
use crate::error::{AgentError, ConfigError, Result};
use crate::logger::{Category, TwoAgentsLogger};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, EnumString};

/// Prefix logged in place of a proposal that contained no `keep;give` pair.
pub const PARSE_FAILED_MARKER: &str = "PARSE_FAILED: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DivisionVariant {
    /// The proposer decides alone.
    Dictator,
    /// The responder may be asked to accept or reject the proposal.
    Ultimatum,
}

impl fmt::Display for DivisionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// What a division run recorded. `split` is `None` when the proposal could
/// not be parsed; the responder fields stay empty unless the responder played.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DivisionOutcome {
    pub proposer_decision: String,
    pub proposer_scratchpad: Option<String>,
    pub split: Option<Split>,
    pub responder_decision: String,
    pub responder_scratchpad: Option<String>,
    pub accepted: Option<bool>,
}

impl DivisionOutcome {
    pub fn responder_played(&self) -> bool {
        !self.responder_decision.is_empty() || self.responder_scratchpad.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DivisionGame {
    variant: DivisionVariant,
    total_sum: f64,
    do_second_step: bool,
    coplayer: String,
    currency: String,
}

impl DivisionGame {
    pub fn new(
        variant: DivisionVariant,
        total_sum: f64,
        do_second_step: bool,
        coplayer: impl Into<String>,
    ) -> std::result::Result<Self, ConfigError> {
        if !(total_sum.is_finite() && total_sum > 0.0) {
            return Err(ConfigError::Validation(format!(
                "total_sum must be positive, got {total_sum}"
            )));
        }
        Ok(Self {
            variant,
            total_sum,
            do_second_step,
            coplayer: coplayer.into(),
            currency: "dollars".into(),
        })
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn variant(&self) -> DivisionVariant {
        self.variant
    }

    pub fn total_sum(&self) -> f64 {
        self.total_sum
    }

    /// Whether a parsed proposal is followed by a responder decision.
    pub fn has_responder_step(&self) -> bool {
        self.variant == DivisionVariant::Ultimatum && self.do_second_step
    }

    /// The message shown to the responder describing the proposal.
    pub fn describe_split(&self, split: Split) -> String {
        format!(
            "Your {coplayer} split {total} as follows: they keep {keep} {currency} and give you {give} {currency}.\nDo you accept the split?",
            coplayer = self.coplayer,
            currency = self.currency,
            total = format_amount(self.total_sum),
            keep = format_amount(split.keep),
            give = format_amount(split.give),
        )
    }

    /// Runs the game once. An unparseable proposal ends the run normally with
    /// `split: None`; the responder is never consulted in that case.
    pub async fn run(
        &self,
        proposer: &mut dyn Agent,
        responder: &mut dyn Agent,
        logger: &TwoAgentsLogger,
    ) -> Result<DivisionOutcome> {
        tracing::info!(
            run = %logger.run(),
            variant = %self.variant,
            total_sum = self.total_sum,
            second_step = self.do_second_step,
            "starting division game"
        );

        proposer
            .init_memory()
            .await
            .map_err(|e| AgentError::collaborator(Side::Agent1, "init_memory", e))?;
        responder
            .init_memory()
            .await
            .map_err(|e| AgentError::collaborator(Side::Agent2, "init_memory", e))?;

        proposer
            .prepare_round_question(&RoundQuestion {
                coplayer: self.coplayer.clone(),
                total_sum: self.total_sum,
                keep_sum: None,
                give_sum: None,
            })
            .map_err(|e| AgentError::collaborator(Side::Agent1, "prepare_round_question", e))?;

        let proposal = proposer
            .make_step(StepPrompt::Initial)
            .await
            .map_err(|e| AgentError::collaborator(Side::Agent1, "make_step", e))?;

        let mut outcome = DivisionOutcome {
            proposer_decision: proposal.decision,
            proposer_scratchpad: proposal.scratchpad,
            ..DivisionOutcome::default()
        };

        let Some(split) = parse_numeric_split(&outcome.proposer_decision) else {
            tracing::warn!(
                run = %logger.run(),
                side = %Side::Agent1,
                raw = %outcome.proposer_decision,
                "proposal has no keep;give split, ending run"
            );
            let marked = format!("{PARSE_FAILED_MARKER}{}", outcome.proposer_decision);
            logger.log_round(Category::DivDecisions, Pair::new(marked.as_str(), ""))?;
            logger.log_round(
                Category::DivDecisionsScratchpad,
                Pair::new(outcome.proposer_scratchpad.as_deref().unwrap_or(""), ""),
            )?;
            return Ok(outcome);
        };
        outcome.split = Some(split);

        if self.has_responder_step() {
            responder.push_context(&self.describe_split(split));
            responder
                .prepare_round_question(&RoundQuestion {
                    coplayer: self.coplayer.clone(),
                    total_sum: self.total_sum,
                    keep_sum: Some(split.keep),
                    give_sum: Some(split.give),
                })
                .map_err(|e| AgentError::collaborator(Side::Agent2, "prepare_round_question", e))?;

            let answer = responder
                .make_step(StepPrompt::Initial)
                .await
                .map_err(|e| AgentError::collaborator(Side::Agent2, "make_step", e))?;

            outcome.accepted = parse_accept_reject(&answer.decision);
            if outcome.accepted.is_none() {
                tracing::warn!(
                    run = %logger.run(),
                    side = %Side::Agent2,
                    raw = %answer.decision,
                    "responder answer is neither ACCEPT nor REJECT"
                );
            }
            outcome.responder_decision = answer.decision;
            outcome.responder_scratchpad = answer.scratchpad;
        }

        logger.log_round(
            Category::DivDecisions,
            Pair::new(
                outcome.proposer_decision.as_str(),
                outcome.responder_decision.as_str(),
            ),
        )?;
        logger.log_round(
            Category::DivDecisionsScratchpad,
            Pair::new(
                outcome.proposer_scratchpad.as_deref().unwrap_or(""),
                outcome.responder_scratchpad.as_deref().unwrap_or(""),
            ),
        )?;

        tracing::info!(
            run = %logger.run(),
            keep = split.keep,
            give = split.give,
            accepted = ?outcome.accepted,
            "division game finished"
        );
        Ok(outcome)
    }
}

/// Whole amounts print without a fractional part.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
