//! Analyst node.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use forge_core::{
    CoreResult, ConversationState, Message, ModelGateway, ModelRequest, Node, NodeId, StateUpdate,
};
use forge_tools::{ToolRegistry, ANALYST_TOOLS};

use crate::prompts::ANALYST_SYSTEM_PROMPT;

/// Explains existing artifacts, optionally listing and reading them first.
/// Unlike the developer, the analyst sees the full history.
pub struct AnalystNode {
    gateway: Arc<dyn ModelGateway>,
    tools: ToolRegistry,
}

impl AnalystNode {
    /// Create an analyst bound to the read-only subset of `tools`.
    pub fn new(gateway: Arc<dyn ModelGateway>, tools: &ToolRegistry) -> Self {
        Self {
            gateway,
            tools: tools.select(ANALYST_TOOLS),
        }
    }
}

#[async_trait]
impl Node for AnalystNode {
    fn id(&self) -> NodeId {
        NodeId::Analyst
    }

    async fn run(&self, state: &ConversationState) -> CoreResult<StateUpdate> {
        let first = self
            .gateway
            .invoke(
                ModelRequest::new(ANALYST_SYSTEM_PROMPT)
                    .messages(state.messages.iter().cloned())
                    .tools(self.tools.definitions()),
            )
            .await?;

        if !first.has_tool_calls() {
            return Ok(StateUpdate::new().message(first.into_message()));
        }

        info!("Analyst requested {} tool calls", first.tool_calls.len());
        let calls = first.tool_calls.clone();
        let mut produced = vec![first.into_message()];
        produced.extend(self.tools.execute_calls(&calls).await);

        let explanation = self
            .gateway
            .invoke(
                ModelRequest::new(ANALYST_SYSTEM_PROMPT)
                    .messages(state.messages.iter().cloned())
                    .messages(produced.iter().cloned()),
            )
            .await?;
        if explanation.has_tool_calls() {
            warn!(
                "Analyst explanation requested {} more tool calls; ignoring them",
                explanation.tool_calls.len()
            );
        }
        produced.push(Message::assistant(explanation.content));

        Ok(StateUpdate::new().messages(produced))
    }
}
