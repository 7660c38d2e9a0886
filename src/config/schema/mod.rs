mod agents;
mod core;
mod games;
mod observability;
mod provider;
mod sweep;

pub use agents::{
    AgentConfig, AlternatingConfig, FixedMoveConfig, ImitativeConfig, LlmAgentConfig, NO_EMOTION,
    PromptOverrides, RatioDivisionConfig,
};
pub use self::core::Config;
pub use games::{DivisionGameConfig, NamingConfig, TableGameConfig};
pub use observability::ObservabilityConfig;
pub use provider::ProviderConfig;
pub use sweep::{DivisionSweepConfig, TableSweepConfig};
