//! Error types for the core module.

use thiserror::Error;

use crate::gateway::GatewayError;
use crate::graph::NodeId;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can abort a graph run.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Node not registered: {0}")]
    NodeNotRegistered(NodeId),

    #[error("Graph exceeded {0} node visits in a single turn")]
    VisitLimitExceeded(usize),

    #[error("Model gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
