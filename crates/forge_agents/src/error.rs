//! Error types for agents module.

use thiserror::Error;

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors that can occur while running a chat turn.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Empty input")]
    EmptyInput,

    #[error("Turn failed: {0}")]
    Turn(#[from] forge_core::CoreError),
}
