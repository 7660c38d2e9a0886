use crate::logger::{Category, csv};
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Move frequencies of one repeated-game run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DecisionStatistics {
    /// Per side: move -> number of rounds it was played.
    pub decision_stats: BTreeMap<String, BTreeMap<String, usize>>,
    /// `<agent1 move><agent2 move>` -> number of rounds.
    pub count_combinations: BTreeMap<String, usize>,
}

impl DecisionStatistics {
    /// Counts `timestamp, agent1, agent2` rows; shorter rows are ignored.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let mut stats = Self::default();
        for row in rows {
            let [_, agent1, agent2, ..] = row.as_slice() else {
                continue;
            };
            for (side, mv) in [("agent1", agent1), ("agent2", agent2)] {
                *stats
                    .decision_stats
                    .entry(side.to_string())
                    .or_default()
                    .entry(mv.clone())
                    .or_default() += 1;
            }
            *stats
                .count_combinations
                .entry(format!("{agent1}{agent2}"))
                .or_default() += 1;
        }
        stats
    }

    pub fn from_run_dir(run_dir: &Path) -> anyhow::Result<Self> {
        let path = run_dir.join(Category::Decisions.file_name());
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::from_rows(&csv::read_rows(&raw)))
    }

    pub fn rounds(&self) -> usize {
        self.count_combinations.values().sum()
    }

    /// Sections for the run's readable summary.
    pub fn summary_sections(&self) -> anyhow::Result<Vec<(&'static str, serde_json::Value)>> {
        Ok(vec![
            ("decision_stats", serde_json::to_value(&self.decision_stats)?),
            (
                "count_combinations",
                serde_json::to_value(&self.count_combinations)?,
            ),
        ])
    }
}
