pub mod commands;

pub use commands::{AnalyzeCommands, Cli, Commands};
