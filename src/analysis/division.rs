use super::pivot::PivotTable;
use super::table::round2;
use super::{emotion_label, read_json, run_dirs, run_name};
use crate::game::{parse_accept_reject, parse_numeric_split};
use crate::logger::csv;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

const DECISIONS_TABLE: &str = "div_decisions.csv";
const AGENT1_SNAPSHOT: &str = "agent1_config.json";
const AGENT2_SNAPSHOT: &str = "agent2_config.json";
const GAME_SNAPSHOT: &str = "game_config.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DivisionRole {
    Proposer,
    Responder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionRunResult {
    pub run: String,
    pub llm: String,
    pub game: String,
    pub role: DivisionRole,
    pub emotion: String,
    pub num_samples: usize,
    /// Kept share of `total_sum` in percent for proposers, accept rate in
    /// percent for responders.
    pub metric_value: f64,
}

#[derive(Debug, Clone)]
pub struct DivisionAnalysis {
    pub runs: Vec<DivisionRunResult>,
    /// Rows `(llm, emotion)`, columns game, mean kept share.
    pub proposer: PivotTable,
    /// Rows `llm`, columns emotion, mean accept rate.
    pub responder: PivotTable,
}

/// Analyzes one division run. `Ok(None)` for runs that are incomplete, have
/// no LLM seat, or yield no parseable decision.
pub fn analyze_division_run(run_dir: &Path) -> anyhow::Result<Option<DivisionRunResult>> {
    let run = run_name(run_dir);
    let missing: Vec<&str> = [DECISIONS_TABLE, AGENT1_SNAPSHOT, AGENT2_SNAPSHOT, GAME_SNAPSHOT]
        .into_iter()
        .filter(|name| !run_dir.join(name).exists())
        .collect();
    if !missing.is_empty() {
        tracing::debug!(run = %run, missing = ?missing, "skipping run with missing files");
        return Ok(None);
    }

    let agent1 = read_json(&run_dir.join(AGENT1_SNAPSHOT))?;
    let agent2 = read_json(&run_dir.join(AGENT2_SNAPSHOT))?;
    let game = read_json(&run_dir.join(GAME_SNAPSHOT))?;

    let is_llm = |cfg: &Value| cfg.get("agent_name").and_then(Value::as_str) == Some("llm");
    let (llm_config, column) = if is_llm(&agent1) {
        (&agent1, 1)
    } else if is_llm(&agent2) {
        (&agent2, 2)
    } else {
        tracing::debug!(run = %run, "skipping run without an LLM seat");
        return Ok(None);
    };

    let game_name = game
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();
    let second_step = game
        .get("do_second_step")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let total_sum = game.get("total_sum").and_then(Value::as_f64).unwrap_or(1.0);

    let rows = csv::read_rows(&std::fs::read_to_string(run_dir.join(DECISIONS_TABLE))?);
    let decisions = rows.iter().filter_map(|row| row.get(column));

    let (role, values): (DivisionRole, Vec<f64>) =
        if game_name == "ultimatum" && second_step && column == 2 {
            let answers = decisions
                .filter_map(|d| parse_accept_reject(d))
                .map(|accepted| if accepted { 1.0 } else { 0.0 })
                .collect();
            (DivisionRole::Responder, answers)
        } else {
            let kept = decisions
                .filter_map(|d| parse_numeric_split(d))
                .map(|split| split.keep)
                .collect();
            (DivisionRole::Proposer, kept)
        };
    if values.is_empty() {
        tracing::debug!(run = %run, "skipping run without parseable decisions");
        return Ok(None);
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let metric_value = match role {
        DivisionRole::Responder => round2(mean * 100.0),
        DivisionRole::Proposer => round2(mean / total_sum * 100.0),
    };

    Ok(Some(DivisionRunResult {
        run,
        llm: llm_config
            .get("llm_name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        game: game_name,
        role,
        emotion: emotion_label(llm_config),
        num_samples: values.len(),
        metric_value,
    }))
}

pub fn analyze_division_runs(log_root: &Path) -> anyhow::Result<DivisionAnalysis> {
    let mut runs = Vec::new();
    for dir in run_dirs(log_root, "")? {
        match analyze_division_run(&dir) {
            Ok(Some(result)) => runs.push(result),
            Ok(None) => {}
            Err(e) => tracing::warn!(run = %run_name(&dir), error = %e, "skipping unreadable run"),
        }
    }

    let mut proposer = PivotTable::new(&["llm", "emotion"]);
    let mut responder = PivotTable::new(&["llm"]);
    for result in &runs {
        match result.role {
            DivisionRole::Proposer => proposer.add(
                vec![result.llm.clone(), result.emotion.clone()],
                &result.game,
                result.metric_value,
            ),
            DivisionRole::Responder => {
                responder.add(vec![result.llm.clone()], &result.emotion, result.metric_value);
            }
        }
    }
    Ok(DivisionAnalysis {
        runs,
        proposer,
        responder,
    })
}
