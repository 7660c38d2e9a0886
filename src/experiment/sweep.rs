use super::division::{DivisionExperiment, run_division_experiment};
use super::table::{TableExperiment, run_table_experiment};
use super::ExperimentContext;
use crate::config::{
    AgentConfig, Config, DivisionSweepConfig, LlmAgentConfig, RatioDivisionConfig,
    TableSweepConfig,
};
use crate::game::DivisionVariant;
use crate::game::division::format_amount;
use serde::Serialize;

/// What a sweep did. Failed configurations are listed with their error.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    pub planned: usize,
    pub completed: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub dry_run: bool,
}

impl SweepReport {
    fn planned(labels: Vec<String>, dry_run: bool) -> Self {
        Self {
            planned: labels.len(),
            completed: if dry_run { labels } else { Vec::new() },
            failed: Vec::new(),
            dry_run,
        }
    }
}

fn llm_seat(
    base: &AgentConfig,
    model: &str,
    emotion: &str,
    scratchpad: Option<bool>,
) -> AgentConfig {
    let mut llm = base.as_llm().cloned().unwrap_or_else(LlmAgentConfig::default);
    llm.llm_name = Some(model.to_string());
    llm.set_emotion_condition(emotion);
    if let Some(enabled) = scratchpad {
        llm.do_scratchpad_step = enabled;
    }
    AgentConfig::Llm(llm)
}

fn models_or_default(models: &[String], ctx: &ExperimentContext) -> Vec<String> {
    if models.is_empty() {
        vec![ctx.default_model.clone()]
    } else {
        models.to_vec()
    }
}

/// Every model against every emotion condition, with the configured
/// `agent2` as the fixed opponent.
#[derive(Debug, Clone)]
pub struct TableSweep {
    base: TableExperiment,
    sweep: TableSweepConfig,
}

impl TableSweep {
    pub fn new(config: &Config) -> Self {
        Self {
            base: TableExperiment::from_config(config),
            sweep: config.table_sweep.clone(),
        }
    }

    pub fn plan(&self, ctx: &ExperimentContext) -> Vec<(String, TableExperiment)> {
        let mut plan = Vec::new();
        for model in models_or_default(&self.sweep.models, ctx) {
            for emotion in &self.sweep.emotions {
                let experiment = TableExperiment {
                    agent1: llm_seat(&self.base.agent1, &model, emotion, None),
                    ..self.base.clone()
                };
                let label = format!(
                    "{} model={model} emotion={emotion} vs {}",
                    self.base.game.name,
                    self.base.agent2.kind()
                );
                plan.push((label, experiment));
            }
        }
        plan
    }

    pub async fn run(&self, ctx: &ExperimentContext, dry_run: bool) -> SweepReport {
        let plan = self.plan(ctx);
        if dry_run {
            for (label, _) in &plan {
                tracing::info!(config = %label, "planned");
            }
            return SweepReport::planned(plan.into_iter().map(|(l, _)| l).collect(), true);
        }

        let mut report = SweepReport::planned(Vec::new(), false);
        report.planned = plan.len();
        for (label, experiment) in plan {
            match run_table_experiment(&experiment, ctx).await {
                Ok(run) => {
                    tracing::info!(config = %label, run = %run.run, "configuration finished");
                    report.completed.push(label);
                }
                Err(e) => {
                    tracing::error!(
                        config = %label,
                        error = %e,
                        "configuration failed, continuing"
                    );
                    report.failed.push((label, e.to_string()));
                }
            }
        }
        report
    }
}

/// Two-phase division sweep.
///
/// Phase one puts an LLM proposer against an LLM copy of itself in dictator
/// and ultimatum games without a responder step. Phase two runs ultimatum
/// games with the responder step, a ratio proposer and an LLM responder.
#[derive(Debug, Clone)]
pub struct DivisionSweep {
    base: DivisionExperiment,
    sweep: DivisionSweepConfig,
}

impl DivisionSweep {
    pub fn new(config: &Config) -> Self {
        Self {
            base: DivisionExperiment::from_config(config),
            sweep: config.division_sweep.clone(),
        }
    }

    pub fn plan(&self, ctx: &ExperimentContext) -> Vec<(String, DivisionExperiment)> {
        let models = models_or_default(&self.sweep.models, ctx);
        let emotions = self.sweep.emotion_conditions();
        let mut plan = Vec::new();

        let mut seats = Vec::new();
        for model in &models {
            for &scratchpad in &self.sweep.scratchpad_options {
                for emotion in &emotions {
                    seats.push((
                        format!("model={model} scratchpad={scratchpad} emotion={emotion}"),
                        llm_seat(&self.base.agent1, model, emotion, Some(scratchpad)),
                    ));
                }
            }
        }

        for variant in [DivisionVariant::Dictator, DivisionVariant::Ultimatum] {
            for &total_sum in &self.sweep.total_sums {
                for coplayer in &self.sweep.coplayers {
                    for (seat_label, seat) in &seats {
                        let mut experiment = self.division(variant, total_sum, false, coplayer);
                        experiment.agent1 = seat.clone();
                        experiment.agent2 = seat.clone();
                        plan.push((
                            format!(
                                "{} total={} coplayer={coplayer} {seat_label}",
                                variant.as_ref(),
                                format_amount(total_sum)
                            ),
                            experiment,
                        ));
                    }
                }
            }
        }

        for &total_sum in &self.sweep.total_sums {
            for coplayer in &self.sweep.coplayers {
                for (seat_label, seat) in &seats {
                    for &ratio in &self.sweep.split_ratios {
                        let mut experiment =
                            self.division(DivisionVariant::Ultimatum, total_sum, true, coplayer);
                        experiment.agent1 =
                            AgentConfig::RatioDivision(RatioDivisionConfig { ratio });
                        experiment.agent2 = seat.clone();
                        plan.push((
                            format!(
                                "ultimatum responder total={} coplayer={coplayer} ratio={ratio} {seat_label}",
                                format_amount(total_sum)
                            ),
                            experiment,
                        ));
                    }
                }
            }
        }
        plan
    }

    fn division(
        &self,
        variant: DivisionVariant,
        total_sum: f64,
        do_second_step: bool,
        coplayer: &str,
    ) -> DivisionExperiment {
        let mut experiment = self.base.clone();
        experiment.game.name = variant;
        experiment.game.total_sum = total_sum;
        experiment.game.do_second_step = do_second_step;
        experiment.naming.coplayer = coplayer.to_string();
        experiment
    }

    pub async fn run(&self, ctx: &ExperimentContext, dry_run: bool) -> SweepReport {
        let plan = self.plan(ctx);
        if dry_run {
            for (label, _) in &plan {
                tracing::info!(config = %label, "planned");
            }
            return SweepReport::planned(plan.into_iter().map(|(l, _)| l).collect(), true);
        }

        let mut report = SweepReport::planned(Vec::new(), false);
        report.planned = plan.len();
        for (label, experiment) in plan {
            match run_division_experiment(&experiment, ctx).await {
                Ok(run) => {
                    tracing::info!(
                        config = %label,
                        run = %run.run,
                        parsed = run.outcome.split.is_some(),
                        "configuration finished"
                    );
                    report.completed.push(label);
                }
                Err(e) => {
                    tracing::error!(
                        config = %label,
                        error = %e,
                        "configuration failed, continuing"
                    );
                    report.failed.push((label, e.to_string()));
                }
            }
        }
        report
    }
}
