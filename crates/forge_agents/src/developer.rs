//! Developer node.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use forge_core::{
    CoreResult, ConversationState, Message, ModelGateway, ModelRequest, Node, NodeId, StateUpdate,
};
use forge_tools::{ToolRegistry, DEVELOPER_TOOLS};

use crate::prompts::DEVELOPER_SYSTEM_PROMPT;

/// Implements the architect's spec with one round of write tool calls.
///
/// The model only ever sees the spec, never the chat history.
pub struct DeveloperNode {
    gateway: Arc<dyn ModelGateway>,
    tools: ToolRegistry,
}

impl DeveloperNode {
    /// Create a developer bound to the write-capable subset of `tools`.
    pub fn new(gateway: Arc<dyn ModelGateway>, tools: &ToolRegistry) -> Self {
        Self {
            gateway,
            tools: tools.select(DEVELOPER_TOOLS),
        }
    }
}

#[async_trait]
impl Node for DeveloperNode {
    fn id(&self) -> NodeId {
        NodeId::Developer
    }

    async fn run(&self, state: &ConversationState) -> CoreResult<StateUpdate> {
        let spec = &state.tool_spec;
        if spec.trim().is_empty() {
            warn!("Developer received an empty spec");
        }

        let first = self
            .gateway
            .invoke(
                ModelRequest::new(DEVELOPER_SYSTEM_PROMPT)
                    .message(Message::human(format!("Implement this spec:\n{}", spec)))
                    .tools(self.tools.definitions()),
            )
            .await?;

        if !first.has_tool_calls() {
            info!("Developer replied without tool calls");
            return Ok(StateUpdate::new().message(first.into_message()));
        }

        let calls = first.tool_calls.clone();
        let mut produced = vec![first.into_message()];
        produced.extend(self.tools.execute_calls(&calls).await);

        let confirmation = self
            .gateway
            .invoke(
                ModelRequest::new(DEVELOPER_SYSTEM_PROMPT)
                    .message(Message::human(format!("Spec:\n{}", spec)))
                    .messages(produced.iter().cloned()),
            )
            .await?;
        if confirmation.has_tool_calls() {
            warn!(
                "Developer confirmation requested {} more tool calls; ignoring them",
                confirmation.tool_calls.len()
            );
        }
        produced.push(Message::assistant(confirmation.content));

        Ok(StateUpdate::new().messages(produced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::ToolCall;
    use forge_llm::ScriptedGateway;
    use forge_tools::{file_tools, Workspace, WRITE_TO_FILE};
    use serde_json::json;

    const SPEC: &str = "def f():\n    pass";

    fn state() -> ConversationState {
        let mut state = ConversationState::for_turn(vec![
            Message::human("earlier question"),
            Message::assistant("earlier answer"),
            Message::human("Создай f"),
            Message::assistant(SPEC),
        ]);
        state.tool_spec = SPEC.to_string();
        state.is_coding_task = true;
        state
    }

    fn write_call(id: &str, filename: &str, content: &str) -> ToolCall {
        let args = json!({"filename": filename, "content": content});
        ToolCall::new(id, WRITE_TO_FILE, args.as_object().cloned().unwrap())
    }

    #[tokio::test]
    async fn test_writes_file_and_confirms() {
        let temp = tempfile::tempdir().unwrap();
        let tools = file_tools(&Workspace::new(temp.path()));
        let gateway = ScriptedGateway::new()
            .reply_tool_calls("", vec![write_call("call_1", "f.py", "def f():\n    return 1\n")])
            .reply_text("Файл f.py сохранён.");
        let node = DeveloperNode::new(Arc::new(gateway.clone()), &tools);

        let update = node.run(&state()).await.unwrap();

        assert_eq!(update.messages.len(), 3);
        assert_eq!(update.messages[0].tool_calls()[0].id, "call_1");
        match &update.messages[1] {
            Message::ToolResult { tool_call_id, content } => {
                assert_eq!(tool_call_id, "call_1");
                assert!(content.starts_with("Successfully saved code to"));
            }
            other => panic!("expected tool result, got {other:?}"),
        }
        assert_eq!(update.messages[2], Message::assistant("Файл f.py сохранён."));
        assert_eq!(
            std::fs::read_to_string(temp.path().join("f.py")).unwrap(),
            "def f():\n    return 1\n"
        );
    }

    #[tokio::test]
    async fn test_history_is_not_sent() {
        let temp = tempfile::tempdir().unwrap();
        let tools = file_tools(&Workspace::new(temp.path()));
        let gateway = ScriptedGateway::new()
            .reply_tool_calls("", vec![write_call("call_1", "f.py", "X")])
            .reply_text("ok");
        let node = DeveloperNode::new(Arc::new(gateway.clone()), &tools);

        node.run(&state()).await.unwrap();

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(
            requests[0].conversation,
            vec![Message::human(format!("Implement this spec:\n{}", SPEC))]
        );
        assert_eq!(requests[0].tool_names(), vec![WRITE_TO_FILE]);

        assert_eq!(requests[1].conversation.len(), 3);
        assert_eq!(requests[1].conversation[0], Message::human(format!("Spec:\n{}", SPEC)));
        assert!(requests[1].conversation[1].is_assistant());
        assert!(requests[1].tools.is_empty());
        assert!(requests
            .iter()
            .flat_map(|r| r.conversation.iter())
            .all(|m| m.content() != "earlier question"));
    }

    #[tokio::test]
    async fn test_no_tool_calls_ends_after_first_reply() {
        let tools = file_tools(&Workspace::default());
        let gateway = ScriptedGateway::new().reply_text("I cannot implement this.");
        let node = DeveloperNode::new(Arc::new(gateway.clone()), &tools);

        let update = node.run(&state()).await.unwrap();
        assert_eq!(update.messages, vec![Message::assistant("I cannot implement this.")]);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_multiple_calls_keep_order() {
        let temp = tempfile::tempdir().unwrap();
        let tools = file_tools(&Workspace::new(temp.path()));
        let gateway = ScriptedGateway::new()
            .reply_tool_calls(
                "",
                vec![
                    write_call("b", "b.py", "B"),
                    write_call("a", "a.py", "A"),
                    ToolCall::new("c", "read_file", Default::default()),
                ],
            )
            .reply_text("done");
        let node = DeveloperNode::new(Arc::new(gateway), &tools);

        let update = node.run(&state()).await.unwrap();
        let ids: Vec<&str> = update.messages[1..4]
            .iter()
            .map(|m| match m {
                Message::ToolResult { tool_call_id, .. } => tool_call_id.as_str(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        // read_file is not bound to the developer
        assert!(update.messages[3].content().contains("is not available"));
    }
}
