//! Append-only, per-run record store.
//!
//! A run directory holds whole-document JSON snapshots and one headerless
//! CSV table per [`Category`], each row `timestamp, agent1, agent2`. The
//! logger never reads its own output back.

pub mod csv;
mod run_id;

pub use run_id::{RunIdentity, model_short_name};

use crate::error::LogError;
use crate::game::Pair;
use chrono::Local;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

const ROW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const READABLE_SUMMARY_FILE: &str = "readable_summary.txt";
const SECTION_SEPARATOR: &str = "------------";
const SUMMARY_TERMINATOR: &str = "============";

/// Tabular record categories. The string form is the table's file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Decisions,
    DecisionsScratchpad,
    InnerEmotions,
    OuterEmotions,
    Memory,
    DivDecisions,
    DivDecisionsScratchpad,
}

impl Category {
    pub fn file_name(self) -> String {
        format!("{}.csv", self.as_ref())
    }
}

/// Two-sided run logger. One writer per run directory; rows are appended
/// without locking.
#[derive(Debug, Clone)]
pub struct TwoAgentsLogger {
    run: RunIdentity,
    run_dir: PathBuf,
    categories: Vec<Category>,
}

impl TwoAgentsLogger {
    /// Creates `<logs_root>/<run>` if needed and registers `categories`.
    pub fn new(
        logs_root: impl AsRef<Path>,
        run: RunIdentity,
        categories: Vec<Category>,
    ) -> Result<Self, LogError> {
        let run_dir = logs_root.as_ref().join(run.as_str());
        fs::create_dir_all(&run_dir).map_err(|source| io_error(&run_dir, source))?;
        tracing::debug!(run = %run, dir = %run_dir.display(), "opened run directory");
        Ok(Self {
            run,
            run_dir,
            categories,
        })
    }

    /// Logger with every game category registered.
    pub fn for_games(logs_root: impl AsRef<Path>, run: RunIdentity) -> Result<Self, LogError> {
        Self::new(logs_root, run, Category::iter().collect())
    }

    pub fn run(&self) -> &RunIdentity {
        &self.run
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Writes `<name>.json`, replacing an earlier document of the same name.
    pub fn log_document<T: Serialize + ?Sized>(
        &self,
        name: &str,
        document: &T,
    ) -> Result<PathBuf, LogError> {
        let path = self.run_dir.join(format!("{name}.json"));
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        document
            .serialize(&mut serializer)
            .map_err(|source| LogError::Serialize {
                name: name.to_string(),
                source,
            })?;
        fs::write(&path, buffer).map_err(|source| io_error(&path, source))?;
        Ok(path)
    }

    /// Appends one timestamped row to the category's table.
    pub fn log_round(&self, category: Category, row: Pair<&str>) -> Result<(), LogError> {
        if !self.categories.contains(&category) {
            return Err(LogError::UnregisteredCategory(category.as_ref().to_string()));
        }

        let path = self.run_dir.join(category.file_name());
        let timestamp = Local::now().format(ROW_TIMESTAMP_FORMAT).to_string();
        let line = csv::encode_row(&[timestamp.as_str(), row.agent1, row.agent2]);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| io_error(&path, source))?;
        file.write_all(line.as_bytes())
            .map_err(|source| io_error(&path, source))
    }

    /// Same as [`Self::log_round`] with the category given by its table name.
    pub fn log_round_named(&self, category: &str, row: Pair<&str>) -> Result<(), LogError> {
        let parsed = category
            .parse::<Category>()
            .map_err(|_| LogError::UnknownCategory(category.to_string()))?;
        self.log_round(parsed, row)
    }

    /// Appends titled sections to the human-readable run summary.
    pub fn append_readable_summary(
        &self,
        sections: &[(&str, serde_json::Value)],
    ) -> Result<(), LogError> {
        let path = self.run_dir.join(READABLE_SUMMARY_FILE);
        let mut text = String::new();
        for (title, value) in sections {
            text.push_str(title);
            text.push('\n');
            match value {
                serde_json::Value::String(s) => text.push_str(s),
                other => text.push_str(&other.to_string()),
            }
            text.push('\n');
            text.push_str(SECTION_SEPARATOR);
            text.push('\n');
        }
        text.push_str(SUMMARY_TERMINATOR);
        text.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| io_error(&path, source))?;
        file.write_all(text.as_bytes())
            .map_err(|source| io_error(&path, source))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LogError {
    LogError::Io {
        path: path.display().to_string(),
        source,
    }
}
