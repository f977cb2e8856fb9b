//! # forge_agents
//!
//! The four ToolForge roles and the session that drives them.
//!
//! | Role      | Sees                        | Tools                      |
//! |-----------|-----------------------------|----------------------------|
//! | Manager   | latest request (full on chat) | none                     |
//! | Architect | full history                | none                       |
//! | Developer | architect's spec only       | `write_to_file`            |
//! | Analyst   | full history                | `list_files`, `read_file`  |
//!
//! [`build_graph`] wires the roles into a [`forge_core::OrchestrationGraph`]
//! and [`ChatSession`] runs it one atomic turn at a time.

pub mod analyst;
pub mod architect;
pub mod developer;
pub mod error;
pub mod manager;
pub mod prompts;
pub mod session;

use std::sync::Arc;

use forge_core::{ModelGateway, OrchestrationGraph};
use forge_tools::ToolRegistry;

pub use analyst::AnalystNode;
pub use architect::ArchitectNode;
pub use developer::DeveloperNode;
pub use error::{AgentError, AgentResult};
pub use manager::ManagerNode;
pub use session::{ChatSession, TurnReport};

/// Build the role graph over one shared gateway. Each tool-using role binds
/// its own subset of `tools`.
pub fn build_graph(gateway: Arc<dyn ModelGateway>, tools: &ToolRegistry) -> OrchestrationGraph {
    OrchestrationGraph::new()
        .with_node(Arc::new(ManagerNode::new(gateway.clone())))
        .with_node(Arc::new(ArchitectNode::new(gateway.clone())))
        .with_node(Arc::new(DeveloperNode::new(gateway.clone(), tools)))
        .with_node(Arc::new(AnalystNode::new(gateway, tools)))
}
