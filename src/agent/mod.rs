pub mod factory;
pub mod llm;
pub mod rule_based;
pub mod traits;

pub use factory::{AgentContext, SeatGame, create_agent};
pub use llm::LlmAgent;
pub use rule_based::{AlternatingAgent, FixedMoveAgent, ImitativeAgent, RatioDivisionAgent};
pub use traits::{
    Agent, EmotionCapability, MemoryCapability, MemoryUpdate, NEUTRAL_EMOTION, NO_MEMORY_UPDATE,
    RoundQuestion, StepOutput, StepPrompt,
};
