//! Per-turn conversation state and the partial updates nodes return.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Manager's routing output for the current turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextAction {
    #[default]
    None,
    Architect,
    Analyst,
    Stop,
}

impl NextAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Architect => "ARCHITECT",
            Self::Analyst => "ANALYST",
            Self::Stop => "STOP",
        }
    }
}

impl std::fmt::Display for NextAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// State threaded through one graph run.
///
/// `next_action` and `is_coding_task` only carry meaning inside the turn that
/// set them; [`ConversationState::for_turn`] starts every turn with both reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    /// Append-only message history
    pub messages: Vec<Message>,
    /// Last specification produced by the architect
    pub tool_spec: String,
    /// Manager routing decision
    pub next_action: NextAction,
    /// Whether the architect output should be handed to the developer
    pub is_coding_task: bool,
}

impl ConversationState {
    /// Fresh turn state over an existing history.
    pub fn for_turn(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Content of the most recent human message, if any.
    pub fn last_human_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_human())
            .map(Message::content)
    }

    /// Apply a node's partial update. Messages are appended, never replaced;
    /// scalar fields are overwritten only when the update sets them.
    pub fn apply(&mut self, update: &StateUpdate) {
        self.messages.extend(update.messages.iter().cloned());
        if let Some(spec) = &update.tool_spec {
            self.tool_spec = spec.clone();
        }
        if let Some(action) = update.next_action {
            self.next_action = action;
        }
        if let Some(coding) = update.is_coding_task {
            self.is_coding_task = coding;
        }
    }
}

/// Partial state update produced by a node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub messages: Vec<Message>,
    pub tool_spec: Option<String>,
    pub next_action: Option<NextAction>,
    pub is_coding_task: Option<bool>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn tool_spec(mut self, spec: impl Into<String>) -> Self {
        self.tool_spec = Some(spec.into());
        self
    }

    pub fn next_action(mut self, action: NextAction) -> Self {
        self.next_action = Some(action);
        self
    }

    pub fn coding_task(mut self, coding: bool) -> Self {
        self.is_coding_task = Some(coding);
        self
    }

    /// Text of the last assistant message, if non-blank. An earlier
    /// assistant message is never used as a fallback.
    pub fn last_assistant_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.is_assistant())
            .map(Message::content)
            .filter(|c| !c.trim().is_empty())
    }
}
