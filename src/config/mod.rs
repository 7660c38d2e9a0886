pub mod schema;

pub use schema::{
    AgentConfig, AlternatingConfig, Config, DivisionGameConfig, DivisionSweepConfig,
    FixedMoveConfig, ImitativeConfig, LlmAgentConfig, NO_EMOTION, NamingConfig,
    ObservabilityConfig, PromptOverrides, ProviderConfig, RatioDivisionConfig, TableGameConfig,
    TableSweepConfig,
};
