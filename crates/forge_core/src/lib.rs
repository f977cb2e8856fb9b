//! # forge_core
//!
//! Conversation model and orchestration graph for ToolForge.
//!
//! This crate owns everything the role agents share but that does not talk to
//! the outside world:
//!
//! - **Messages**: the tagged conversation entries exchanged with the model
//! - **State**: the per-turn [`ConversationState`] and the partial
//!   [`StateUpdate`] each node returns
//! - **Routing**: the keyword classifier that turns manager output into a
//!   [`RouteDecision`]
//! - **Gateway**: the [`ModelGateway`] contract implemented by `forge_llm`
//! - **Graph**: the fixed state machine that runs role nodes for one turn
//!
//! # Graph
//!
//! ```text
//! START ──▶ manager ──┬──▶ architect ──┬──▶ developer ──▶ END
//!                     │                └──────────────────▶ END
//!                     ├──▶ analyst ─────────────────────────▶ END
//!                     └─────────────────────────────────────▶ END
//! ```

pub mod error;
pub mod gateway;
pub mod graph;
pub mod message;
pub mod route;
pub mod state;

pub use error::{CoreError, CoreResult};
pub use gateway::{AssistantTurn, GatewayError, GatewayResult, ModelGateway, ModelRequest};
pub use graph::{
    Node, NodeId, NodeStep, OrchestrationGraph, Route, TurnOutcome, MAX_NODE_VISITS,
};
pub use message::{Message, ToolCall, ToolDefinition};
pub use route::{classify, RouteDecision};
pub use state::{ConversationState, NextAction, StateUpdate};
