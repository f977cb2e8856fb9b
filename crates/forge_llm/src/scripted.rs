//! Scripted model gateway for testing.
//!
//! Replies are returned in the order they were queued and every request is
//! captured, so tests can assert both on what the agents did with a reply and
//! on what they sent to the model.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use forge_core::{AssistantTurn, GatewayError, GatewayResult, ModelGateway, ModelRequest, ToolCall};

/// Predefined reply for one gateway call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Turn(AssistantTurn),
    /// Fail the call with a transport error carrying this message
    Failure(String),
}

/// Gateway that replays queued replies.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an assistant turn.
    pub fn reply(self, turn: AssistantTurn) -> Self {
        self.replies.lock().push_back(ScriptedReply::Turn(turn));
        self
    }

    /// Queue a plain text reply.
    pub fn reply_text(self, content: impl Into<String>) -> Self {
        self.reply(AssistantTurn::text(content))
    }

    /// Queue a reply that requests tool calls.
    pub fn reply_tool_calls(self, content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        self.reply(AssistantTurn {
            content: content.into(),
            tool_calls: calls,
        })
    }

    /// Queue a failing call.
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(ScriptedReply::Failure(message.into()));
        self
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn invoke(&self, request: ModelRequest) -> GatewayResult<AssistantTurn> {
        self.requests.lock().push(request);

        match self.replies.lock().pop_front() {
            Some(ScriptedReply::Turn(turn)) => Ok(turn),
            Some(ScriptedReply::Failure(message)) => Err(GatewayError::Transport(message)),
            None => Err(GatewayError::MalformedResponse(
                "no scripted reply left".to_string(),
            )),
        }
    }
}

impl std::fmt::Debug for ScriptedGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedGateway")
            .field("remaining", &self.remaining())
            .field("calls", &self.call_count())
            .finish()
    }
}
