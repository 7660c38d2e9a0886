use super::{ExperimentContext, build_agents, model_suffix, resolve_agent, snapshot_configs};
use crate::agent::SeatGame;
use crate::analysis::DecisionStatistics;
use crate::config::{AgentConfig, Config, NamingConfig, TableGameConfig};
use crate::error::Result;
use crate::game::{RepeatedTableGame, TableRunSummary};
use crate::logger::{RunIdentity, TwoAgentsLogger};
use std::path::PathBuf;

/// One repeated-game run.
#[derive(Debug, Clone)]
pub struct TableExperiment {
    pub game: TableGameConfig,
    pub naming: NamingConfig,
    pub agent1: AgentConfig,
    pub agent2: AgentConfig,
}

impl TableExperiment {
    pub fn from_config(config: &Config) -> Self {
        Self {
            game: config.table.clone(),
            naming: config.naming.clone(),
            agent1: config.agent1.clone(),
            agent2: config.agent2.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableRunReport {
    pub run: RunIdentity,
    pub run_dir: PathBuf,
    pub summary: TableRunSummary,
    pub statistics: DecisionStatistics,
}

pub async fn run_table_experiment(
    experiment: &TableExperiment,
    ctx: &ExperimentContext,
) -> Result<TableRunReport> {
    let agent1_config = resolve_agent(&experiment.agent1, &ctx.default_model);
    let agent2_config = resolve_agent(&experiment.agent2, &ctx.default_model);
    let seats = [&agent1_config, &agent2_config];

    let game = RepeatedTableGame::new(
        experiment.game.payoffs.clone(),
        experiment.game.n_steps,
        experiment.game.emotion_flags(),
    )?;
    let (mut agent1, mut agent2) = build_agents(
        seats,
        &experiment.naming,
        SeatGame::Table(&experiment.game.payoffs),
        ctx,
    )?;

    let run = RunIdentity::derive(&experiment.game.name, &model_suffix(seats))
        .disambiguate(&ctx.logs_root);
    let logger = TwoAgentsLogger::for_games(&ctx.logs_root, run)?;
    snapshot_configs(&logger, &experiment.game, &experiment.naming, seats)?;

    let summary = game
        .run(agent1.as_mut(), agent2.as_mut(), &logger)
        .await?;

    let statistics = if summary.completed_rounds > 0 {
        DecisionStatistics::from_run_dir(logger.run_dir())?
    } else {
        DecisionStatistics::default()
    };
    let mut sections = statistics.summary_sections()?;
    sections.push(("run_summary", serde_json::to_value(summary).map_err(anyhow::Error::from)?));
    logger.append_readable_summary(&sections)?;

    Ok(TableRunReport {
        run: logger.run().clone(),
        run_dir: logger.run_dir().to_path_buf(),
        summary,
        statistics,
    })
}
