//! Offline aggregation over finished run directories.

pub mod division;
pub mod pivot;
pub mod statistics;
pub mod table;

pub use division::{DivisionAnalysis, DivisionRole, DivisionRunResult, analyze_division_runs};
pub use pivot::PivotTable;
pub use statistics::DecisionStatistics;
pub use table::{TableAnalysis, TableRunResult, analyze_table_runs};

use crate::config::NO_EMOTION;
use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Sorted run directories under `log_root` whose names start with `prefix`.
pub(crate) fn run_dirs(log_root: &Path, prefix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(log_root)
        .with_context(|| format!("log directory {} not found", log_root.display()))?;
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    dirs.sort();
    Ok(dirs)
}

pub(crate) fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// The emotion family an agent snapshot was conditioned on.
pub(crate) fn emotion_label(agent: &Value) -> String {
    let has_emotion = agent
        .get("has_emotion")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let emotion = agent
        .get("emotion")
        .or_else(|| agent.get("emotion_prompt_file"))
        .and_then(Value::as_str)
        .unwrap_or("");
    match emotion.split('/').next() {
        Some(family) if has_emotion && !family.is_empty() => family.to_string(),
        _ => NO_EMOTION.to_string(),
    }
}

pub(crate) fn run_name(run_dir: &Path) -> String {
    run_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn emotion_label_requires_flag() {
        let felt = json!({"has_emotion": true, "emotion": "anger/simple"});
        assert_eq!(emotion_label(&felt), "anger");
        let unfelt = json!({"has_emotion": false, "emotion": "anger/simple"});
        assert_eq!(emotion_label(&unfelt), NO_EMOTION);
        assert_eq!(emotion_label(&json!({"has_emotion": true, "emotion": ""})), NO_EMOTION);
        assert_eq!(
            emotion_label(&json!({"has_emotion": true, "emotion_prompt_file": "fear/simple"})),
            "fear"
        );
    }

    #[test]
    fn run_dirs_filter_by_prefix() {
        let tmp = tempfile::TempDir::new().unwrap();
        for name in ["prisoner_dilemma_b", "prisoner_dilemma_a", "dictator_x"] {
            std::fs::create_dir(tmp.path().join(name)).unwrap();
        }
        std::fs::write(tmp.path().join("prisoner_dilemma_file"), "").unwrap();
        let dirs = run_dirs(tmp.path(), "prisoner_dilemma").unwrap();
        let names: Vec<String> = dirs.iter().map(|d| run_name(d)).collect();
        assert_eq!(names, ["prisoner_dilemma_a", "prisoner_dilemma_b"]);
    }
}
