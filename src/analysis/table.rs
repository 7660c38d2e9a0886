use super::pivot::PivotTable;
use super::{emotion_label, read_json, run_dirs, run_name};
use crate::logger::csv;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

const DECISIONS_TABLE: &str = "decisions.csv";
const AGENT1_SNAPSHOT: &str = "agent1_config.json";
const CONFIG_SNAPSHOT: &str = "config.json";

/// Cooperation of the first seat in one repeated-game run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRunResult {
    pub run: String,
    pub llm: String,
    pub emotion: String,
    pub game: String,
    pub rounds: usize,
    /// Percent of rounds whose agent 1 move contains the cooperative move.
    pub coop_rate: f64,
}

#[derive(Debug, Clone)]
pub struct TableAnalysis {
    pub runs: Vec<TableRunResult>,
    /// Rows `llm`, columns emotion, mean cooperation rate.
    pub pivot: PivotTable,
}

/// Analyzes one run directory. `Ok(None)` means the run is incomplete and
/// was skipped.
pub fn analyze_table_run(
    run_dir: &Path,
    cooperative_move: char,
) -> anyhow::Result<Option<TableRunResult>> {
    let run = run_name(run_dir);
    let missing: Vec<&str> = [DECISIONS_TABLE, AGENT1_SNAPSHOT, CONFIG_SNAPSHOT]
        .into_iter()
        .filter(|name| !run_dir.join(name).exists())
        .collect();
    if !missing.is_empty() {
        tracing::warn!(run = %run, missing = ?missing, "skipping run with missing files");
        return Ok(None);
    }

    let agent1 = read_json(&run_dir.join(AGENT1_SNAPSHOT))?;
    let config = read_json(&run_dir.join(CONFIG_SNAPSHOT))?;
    let game_config = config.get("game_config").unwrap_or(&config);

    let rows = csv::read_rows(&std::fs::read_to_string(run_dir.join(DECISIONS_TABLE))?);
    let cooperative = cooperative_move.to_uppercase().to_string();
    let moves: Vec<String> = rows
        .iter()
        .filter_map(|row| row.get(1))
        .map(|mv| mv.trim().to_uppercase())
        .collect();
    if moves.is_empty() {
        tracing::warn!(run = %run, "skipping run with empty decisions table");
        return Ok(None);
    }

    let cooperated = moves.iter().filter(|mv| mv.contains(&cooperative)).count();
    let coop_rate = round2(cooperated as f64 / moves.len() as f64 * 100.0);
    tracing::info!(run = %run, rounds = moves.len(), coop_rate, "processed run");

    Ok(Some(TableRunResult {
        run,
        llm: agent1
            .get("llm_name")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        emotion: emotion_label(&agent1),
        game: game_config
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("prisoner_dilemma")
            .to_string(),
        rounds: moves.len(),
        coop_rate,
    }))
}

/// Scans `log_root` for run directories starting with `prefix`. Runs that
/// cannot be read are skipped with a warning.
pub fn analyze_table_runs(
    log_root: &Path,
    prefix: &str,
    cooperative_move: char,
) -> anyhow::Result<TableAnalysis> {
    let mut runs = Vec::new();
    for dir in run_dirs(log_root, prefix)? {
        match analyze_table_run(&dir, cooperative_move) {
            Ok(Some(result)) => runs.push(result),
            Ok(None) => {}
            Err(e) => tracing::warn!(run = %run_name(&dir), error = %e, "skipping unreadable run"),
        }
    }

    let mut pivot = PivotTable::new(&["llm"]);
    for result in &runs {
        pivot.add(vec![result.llm.clone()], &result.emotion, result.coop_rate);
    }
    Ok(TableAnalysis { runs, pivot })
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
