//! Model gateway contract.
//!
//! Nodes never talk to a model provider directly; they receive an
//! `Arc<dyn ModelGateway>` at construction time. `forge_llm` provides the
//! HTTP implementation and a scripted fake for tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::message::{Message, ToolCall, ToolDefinition};

/// Result type alias for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures of a model call. These are never recovered inside a node.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Model gateway not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A single model request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelRequest {
    /// System instruction placed before the conversation
    pub system_prompt: String,
    /// Conversation entries sent after the system instruction
    pub conversation: Vec<Message>,
    /// Tools the model may call; empty means none are bound
    pub tools: Vec<ToolDefinition>,
}

impl ModelRequest {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            ..Self::default()
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.conversation.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.conversation.extend(messages);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    /// Names of the bound tools.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }
}

/// Assistant reply returned by the gateway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssistantTurn {
    /// Text content, possibly empty when only tool calls were produced
    pub content: String,
    /// Requested tool calls in the order the model emitted them
    pub tool_calls: Vec<ToolCall>,
}

impl AssistantTurn {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn with_tool_call(mut self, call: ToolCall) -> Self {
        self.tool_calls.push(call);
        self
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    pub fn into_message(self) -> Message {
        Message::Assistant {
            content: self.content,
            tool_calls: self.tool_calls,
        }
    }
}

/// Language model boundary.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Complete one assistant turn.
    async fn invoke(&self, request: ModelRequest) -> GatewayResult<AssistantTurn>;
}
