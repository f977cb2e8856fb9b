//! Error types for the tools module.
//!
//! Tools never surface these to the agent loop: every failure is rendered into
//! the tool's text result so the model can react to it.

use thiserror::Error;

/// Result type alias for tool operations.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors that can occur while preparing or running a tool.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("tool '{name}' is not available. Available tools: {available}")]
    UnknownTool { name: String, available: String },

    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("invalid filename '{0}'")]
    InvalidFilename(String),

    #[error("path '{0}' escapes the tools directory")]
    PathEscape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Create an invalid arguments error.
    pub fn invalid_arguments(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            message: message.into(),
        }
    }
}
