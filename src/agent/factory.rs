use super::llm::LlmAgent;
use super::rule_based::{AlternatingAgent, FixedMoveAgent, ImitativeAgent, RatioDivisionAgent};
use super::traits::Agent;
use crate::config::{AgentConfig, LlmAgentConfig, NamingConfig};
use crate::error::{AgentError, GameError};
use crate::game::{PayoffTable, Side};
use crate::prompt::{PromptGame, PromptSet};
use crate::providers::Provider;
use std::sync::Arc;

/// The game a seat is being built for.
#[derive(Debug, Clone, Copy)]
pub enum SeatGame<'a> {
    Table(&'a PayoffTable),
    Division,
}

/// Everything besides the seat's own config that building an agent needs.
pub struct AgentContext<'a> {
    /// Shared model client; only LLM seats use it.
    pub provider: Option<Arc<dyn Provider>>,
    pub default_model: &'a str,
    pub default_temperature: f64,
    pub naming: &'a NamingConfig,
    pub game: SeatGame<'a>,
}

/// Payoff rows as `(own move + other move, own reward, other reward)` for
/// the given seat.
pub fn seat_payoff_rows(table: &PayoffTable, side: Side) -> Vec<(String, f64, f64)> {
    table
        .entries()
        .iter()
        .map(|entry| {
            let [first, second] = entry.rewards;
            match side {
                Side::Agent1 => (entry.moves.clone(), first, second),
                Side::Agent2 => (entry.moves.chars().rev().collect(), second, first),
            }
        })
        .collect()
}

pub fn create_agent(
    config: &AgentConfig,
    side: Side,
    ctx: &AgentContext<'_>,
) -> Result<Box<dyn Agent>, GameError> {
    let agent: Box<dyn Agent> = match config {
        AgentConfig::Llm(llm) => Box::new(create_llm_agent(llm, side, ctx)?),
        AgentConfig::FixedMove(cfg) => Box::new(FixedMoveAgent::new(cfg.fixed_move)),
        AgentConfig::Alternating(cfg) => Box::new(AlternatingAgent::new(cfg.first, cfg.second)),
        AgentConfig::Imitative(cfg) => Box::new(ImitativeAgent::new(cfg.cooperative_move)),
        AgentConfig::RatioDivision(cfg) => Box::new(RatioDivisionAgent::new(cfg.ratio)),
    };
    tracing::debug!(side = %side, agent = agent.name(), "agent created");
    Ok(agent)
}

fn create_llm_agent(
    config: &LlmAgentConfig,
    side: Side,
    ctx: &AgentContext<'_>,
) -> Result<LlmAgent, GameError> {
    let Some(provider) = ctx.provider.clone() else {
        return Err(AgentError::Unsupported(format!(
            "{side} is an LLM agent but no model provider is configured"
        ))
        .into());
    };

    let game = match ctx.game {
        SeatGame::Table(table) => PromptGame::Table {
            payoff_rows: seat_payoff_rows(table, side),
        },
        SeatGame::Division => PromptGame::Division,
    };
    let prompts = PromptSet::new(&game, ctx.naming, &config.prompts)?;
    let model = config
        .llm_name
        .clone()
        .unwrap_or_else(|| ctx.default_model.to_string());
    let emotion = config.has_emotion.then(|| config.emotion.clone());

    Ok(LlmAgent::new(
        provider,
        model,
        config.temperature.unwrap_or(ctx.default_temperature),
        prompts,
    )
    .with_emotion(emotion)
    .with_scratchpad(config.do_scratchpad_step))
}
