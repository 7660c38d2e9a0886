mod builder;
mod engine;

pub use builder::{PromptGame, PromptSet, emotion_instruction};
pub use engine::TeraEngine;
