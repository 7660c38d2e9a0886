//! Experiment drivers: build agents and a run logger from configuration,
//! snapshot the configuration into the run directory, and play one game.

pub mod division;
pub mod sweep;
pub mod table;

pub use division::{DivisionExperiment, DivisionRunReport, run_division_experiment};
pub use sweep::{DivisionSweep, SweepReport, TableSweep};
pub use table::{TableExperiment, TableRunReport, run_table_experiment};

use crate::agent::{Agent, AgentContext, SeatGame, create_agent};
use crate::config::{AgentConfig, Config, NamingConfig};
use crate::error::Result;
use crate::game::Side;
use crate::logger::{TwoAgentsLogger, model_short_name};
use crate::providers::Provider;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Inputs shared by every run of a session.
#[derive(Clone)]
pub struct ExperimentContext {
    pub logs_root: PathBuf,
    /// Model client for LLM seats; `None` restricts runs to scripted agents.
    pub provider: Option<Arc<dyn Provider>>,
    pub default_model: String,
    pub default_temperature: f64,
}

impl ExperimentContext {
    pub fn from_config(config: &Config, provider: Option<Arc<dyn Provider>>) -> Self {
        Self {
            logs_root: config.logs_root(),
            provider,
            default_model: config.provider.model.clone(),
            default_temperature: config.provider.temperature,
        }
    }
}

/// Fills an LLM seat's missing model so snapshots name the model actually used.
pub(crate) fn resolve_agent(config: &AgentConfig, default_model: &str) -> AgentConfig {
    let mut resolved = config.clone();
    if let Some(llm) = resolved.as_llm_mut()
        && llm.llm_name.is_none()
    {
        llm.llm_name = Some(default_model.to_string());
    }
    resolved
}

/// Short model name of the first LLM seat, for the run directory name.
pub(crate) fn model_suffix(agents: [&AgentConfig; 2]) -> String {
    agents
        .iter()
        .find_map(|a| a.as_llm().and_then(|llm| llm.llm_name.as_deref()))
        .map(model_short_name)
        .unwrap_or_default()
}

pub(crate) fn build_agents(
    agents: [&AgentConfig; 2],
    naming: &NamingConfig,
    game: SeatGame<'_>,
    ctx: &ExperimentContext,
) -> Result<(Box<dyn Agent>, Box<dyn Agent>)> {
    let agent_ctx = AgentContext {
        provider: ctx.provider.clone(),
        default_model: &ctx.default_model,
        default_temperature: ctx.default_temperature,
        naming,
        game,
    };
    Ok((
        create_agent(agents[0], Side::Agent1, &agent_ctx)?,
        create_agent(agents[1], Side::Agent2, &agent_ctx)?,
    ))
}

/// Writes `config.json` plus one document per part.
pub(crate) fn snapshot_configs<G: Serialize>(
    logger: &TwoAgentsLogger,
    game_config: &G,
    naming: &NamingConfig,
    agents: [&AgentConfig; 2],
) -> Result<()> {
    let combined = serde_json::json!({
        "game_config": game_config,
        "naming_config": naming,
        "agent1_config": agents[0],
        "agent2_config": agents[1],
    });
    logger.log_document("config", &combined)?;
    logger.log_document("game_config", game_config)?;
    logger.log_document("naming_config", naming)?;
    logger.log_document("agent1_config", agents[0])?;
    logger.log_document("agent2_config", agents[1])?;
    Ok(())
}
