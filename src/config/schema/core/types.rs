use super::super::{
    AgentConfig, AlternatingConfig, DivisionGameConfig, DivisionSweepConfig, NamingConfig,
    ObservabilityConfig, ProviderConfig, TableGameConfig, TableSweepConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - resolved at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Root under which every run gets its own directory. `~` is expanded.
    #[serde(default = "default_logs_dir")]
    pub logs_dir: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub naming: NamingConfig,

    #[serde(default)]
    pub table: TableGameConfig,

    #[serde(default)]
    pub division: DivisionGameConfig,

    #[serde(default)]
    pub agent1: AgentConfig,

    #[serde(default = "default_agent2")]
    pub agent2: AgentConfig,

    #[serde(default)]
    pub table_sweep: TableSweepConfig,

    #[serde(default)]
    pub division_sweep: DivisionSweepConfig,
}

fn default_logs_dir() -> String {
    "~/.emogames/logs".into()
}

fn default_agent2() -> AgentConfig {
    AgentConfig::Alternating(AlternatingConfig::default())
}

impl Config {
    /// `logs_dir` with a leading `~` expanded.
    pub fn logs_root(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.logs_dir).into_owned())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            logs_dir: default_logs_dir(),
            provider: ProviderConfig::default(),
            observability: ObservabilityConfig::default(),
            naming: NamingConfig::default(),
            table: TableGameConfig::default(),
            division: DivisionGameConfig::default(),
            agent1: AgentConfig::default(),
            agent2: default_agent2(),
            table_sweep: TableSweepConfig::default(),
            division_sweep: DivisionSweepConfig::default(),
        }
    }
}
