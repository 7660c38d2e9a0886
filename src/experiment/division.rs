use super::{ExperimentContext, build_agents, model_suffix, resolve_agent, snapshot_configs};
use crate::agent::SeatGame;
use crate::config::{AgentConfig, Config, DivisionGameConfig, NamingConfig};
use crate::error::Result;
use crate::game::{DivisionGame, DivisionOutcome};
use crate::logger::{RunIdentity, TwoAgentsLogger};
use std::path::PathBuf;

/// One division-game run. `naming.coplayer` is the name shown to the seats.
#[derive(Debug, Clone)]
pub struct DivisionExperiment {
    pub game: DivisionGameConfig,
    pub naming: NamingConfig,
    pub agent1: AgentConfig,
    pub agent2: AgentConfig,
}

impl DivisionExperiment {
    pub fn from_config(config: &Config) -> Self {
        Self {
            game: config.division.clone(),
            naming: config.naming.clone(),
            agent1: config.agent1.clone(),
            agent2: config.agent2.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DivisionRunReport {
    pub run: RunIdentity,
    pub run_dir: PathBuf,
    pub outcome: DivisionOutcome,
}

pub async fn run_division_experiment(
    experiment: &DivisionExperiment,
    ctx: &ExperimentContext,
) -> Result<DivisionRunReport> {
    let agent1_config = resolve_agent(&experiment.agent1, &ctx.default_model);
    let agent2_config = resolve_agent(&experiment.agent2, &ctx.default_model);
    let seats = [&agent1_config, &agent2_config];

    let game = DivisionGame::new(
        experiment.game.name,
        experiment.game.total_sum,
        experiment.game.do_second_step,
        experiment.naming.coplayer.clone(),
    )?
    .with_currency(experiment.naming.currency.clone());
    let (mut proposer, mut responder) =
        build_agents(seats, &experiment.naming, SeatGame::Division, ctx)?;

    let run = RunIdentity::derive(experiment.game.name.as_ref(), &model_suffix(seats))
        .disambiguate(&ctx.logs_root);
    let logger = TwoAgentsLogger::for_games(&ctx.logs_root, run)?;
    snapshot_configs(&logger, &experiment.game, &experiment.naming, seats)?;

    let outcome = game
        .run(proposer.as_mut(), responder.as_mut(), &logger)
        .await?;

    logger.append_readable_summary(&[
        ("game_config", to_value(&experiment.game)?),
        ("agent1_config", to_value(&agent1_config)?),
        ("agent2_config", to_value(&agent2_config)?),
        (
            "outcome",
            serde_json::json!({
                "split": outcome.split.map(|s| [s.keep, s.give]),
                "accepted": outcome.accepted,
            }),
        ),
    ])?;

    Ok(DivisionRunReport {
        run: logger.run().clone(),
        run_dir: logger.run_dir().to_path_buf(),
        outcome,
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(value).map_err(anyhow::Error::from)?)
}
