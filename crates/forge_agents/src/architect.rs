//! Architect node.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use forge_core::{
    CoreResult, ConversationState, Message, ModelGateway, ModelRequest, Node, NodeId, StateUpdate,
};

use crate::prompts::architect_prompt;

/// Produces a `pass`-bodied skeleton on the coding path, or a prose design
/// answer otherwise. The reply becomes both the visible answer and the
/// `tool_spec` handed to the developer.
pub struct ArchitectNode {
    gateway: Arc<dyn ModelGateway>,
}

impl ArchitectNode {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl Node for ArchitectNode {
    fn id(&self) -> NodeId {
        NodeId::Architect
    }

    async fn run(&self, state: &ConversationState) -> CoreResult<StateUpdate> {
        info!(coding = state.is_coding_task, "Architect drafting");

        let reply = self
            .gateway
            .invoke(
                ModelRequest::new(architect_prompt(state.is_coding_task))
                    .messages(state.messages.iter().cloned()),
            )
            .await?;

        Ok(StateUpdate::new()
            .tool_spec(reply.content.clone())
            .message(Message::assistant(reply.content)))
    }
}
