use crate::game::Side;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `emogames`.
///
/// Unparseable agent output never shows up here; the protocols recover from
/// it locally. Everything below is a contract violation or a collaborator
/// failure that ends a run.
#[derive(Debug, Error)]
pub enum GameError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Run logger ──────────────────────────────────────────────────────
    #[error("log: {0}")]
    Log(#[from] LogError),

    // ── Agents / model backends ─────────────────────────────────────────
    #[error("agent: {0}")]
    Agent(#[from] AgentError),

    // ── Prompt / Template ───────────────────────────────────────────────
    #[error("prompt: {0}")]
    Prompt(#[from] PromptError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validation(String),
}

// ─── Logger errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LogError {
    #[error("unknown log category: {0}")]
    UnknownCategory(String),

    #[error("log category {0} is not registered for this run")]
    UnregisteredCategory(String),

    #[error("failed to serialize document {name}: {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("io on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ─── Agent errors ────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{side} failed during {operation}: {source}")]
    Collaborator {
        side: Side,
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("unsupported agent configuration: {0}")]
    Unsupported(String),
}

impl AgentError {
    pub fn collaborator(side: Side, operation: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator {
            side,
            operation,
            source: source.into(),
        }
    }
}

// ─── Prompt / Template errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("template render failed: {0}")]
    Render(String),

    #[error("template not found: {0}")]
    NotFound(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, GameError>;
