//! Manager node: classifies the request and answers small talk itself.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use forge_core::{
    classify, CoreResult, ConversationState, Message, ModelGateway, ModelRequest, NextAction,
    Node, NodeId, RouteDecision, StateUpdate,
};

use crate::prompts::{CHAT_SYSTEM_PROMPT, MANAGER_SYSTEM_PROMPT};

/// Entry node of every turn.
///
/// Only the latest human message is shown to the classifier. When the
/// decision is chat, a second call answers over the whole history and the
/// turn stops here.
pub struct ManagerNode {
    gateway: Arc<dyn ModelGateway>,
}

impl ManagerNode {
    pub fn new(gateway: Arc<dyn ModelGateway>) -> Self {
        Self { gateway }
    }

    async fn decide(&self, state: &ConversationState) -> CoreResult<RouteDecision> {
        let request = state.last_human_content().unwrap_or_default();
        let reply = self
            .gateway
            .invoke(ModelRequest::new(MANAGER_SYSTEM_PROMPT).message(Message::human(request)))
            .await?;

        let decision = classify(&reply.content);
        info!("Manager decision: {} (model said {:?})", decision, reply.content.trim());
        Ok(decision)
    }

    async fn chat(&self, state: &ConversationState) -> CoreResult<StateUpdate> {
        let reply = self
            .gateway
            .invoke(ModelRequest::new(CHAT_SYSTEM_PROMPT).messages(state.messages.iter().cloned()))
            .await?;

        Ok(StateUpdate::new()
            .message(Message::assistant(reply.content))
            .next_action(NextAction::Stop)
            .coding_task(false))
    }
}

#[async_trait]
impl Node for ManagerNode {
    fn id(&self) -> NodeId {
        NodeId::Manager
    }

    async fn run(&self, state: &ConversationState) -> CoreResult<StateUpdate> {
        match self.decide(state).await? {
            RouteDecision::Chat => self.chat(state).await,
            decision => Ok(StateUpdate::new()
                .next_action(decision.next_action())
                .coding_task(decision.is_coding_task())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_core::{CoreError, GatewayError};
    use forge_llm::ScriptedGateway;

    fn state() -> ConversationState {
        ConversationState::for_turn(vec![
            Message::human("Привет"),
            Message::assistant("Здравствуйте!"),
            Message::human("Создай инструмент password_gen"),
        ])
    }

    #[tokio::test]
    async fn test_implement_routes_to_architect_with_coding() {
        let gateway = ScriptedGateway::new().reply_text("IMPLEMENT");
        let node = ManagerNode::new(Arc::new(gateway.clone()));

        let update = node.run(&state()).await.unwrap();
        assert_eq!(update.next_action, Some(NextAction::Architect));
        assert_eq!(update.is_coding_task, Some(true));
        assert!(update.messages.is_empty());

        let requests = gateway.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, MANAGER_SYSTEM_PROMPT);
        assert_eq!(
            requests[0].conversation,
            vec![Message::human("Создай инструмент password_gen")]
        );
        assert!(requests[0].tools.is_empty());
    }

    #[tokio::test]
    async fn test_design_routes_to_architect_without_coding() {
        let gateway = ScriptedGateway::new().reply_text(" design\n");
        let node = ManagerNode::new(Arc::new(gateway));

        let update = node.run(&state()).await.unwrap();
        assert_eq!(update.next_action, Some(NextAction::Architect));
        assert_eq!(update.is_coding_task, Some(false));
    }

    #[tokio::test]
    async fn test_analyst_route() {
        let gateway = ScriptedGateway::new().reply_text("ANALYST");
        let node = ManagerNode::new(Arc::new(gateway));

        let update = node.run(&state()).await.unwrap();
        assert_eq!(update.next_action, Some(NextAction::Analyst));
        assert_eq!(update.is_coding_task, Some(false));
        assert!(update.messages.is_empty());
    }

    #[tokio::test]
    async fn test_chat_answers_over_full_history() {
        let gateway = ScriptedGateway::new()
            .reply_text("hmm, not sure")
            .reply_text("Конечно, спрашивайте!");
        let node = ManagerNode::new(Arc::new(gateway.clone()));

        let state = state();
        let update = node.run(&state).await.unwrap();
        assert_eq!(update.next_action, Some(NextAction::Stop));
        assert_eq!(update.is_coding_task, Some(false));
        assert_eq!(update.messages, vec![Message::assistant("Конечно, спрашивайте!")]);

        let requests = gateway.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].system_prompt, CHAT_SYSTEM_PROMPT);
        assert_eq!(requests[1].conversation, state.messages);
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates() {
        let gateway = ScriptedGateway::new().fail("503");
        let node = ManagerNode::new(Arc::new(gateway));

        let err = node.run(&state()).await.unwrap_err();
        assert!(matches!(err, CoreError::Gateway(GatewayError::Transport(_))));
    }
}
