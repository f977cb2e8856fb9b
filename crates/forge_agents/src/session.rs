//! Chat session driver.
//!
//! A session owns the committed conversation history and runs one graph turn
//! per user input. Turns are all-or-nothing: the graph works on a copy of the
//! history and the copy is committed only when the run succeeds.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use forge_core::{ConversationState, Message, NodeId, NodeStep, OrchestrationGraph};

use crate::error::{AgentError, AgentResult};

/// What happened during one committed turn.
#[derive(Debug, Clone)]
pub struct TurnReport {
    /// Node executions in order
    pub steps: Vec<NodeStep>,
    /// Messages appended to the history, starting with the user input
    pub appended: Vec<Message>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl TurnReport {
    /// Nodes visited, in order.
    pub fn path(&self) -> Vec<NodeId> {
        self.steps.iter().map(|s| s.node).collect()
    }

    /// Last non-empty assistant text of the turn, if any.
    pub fn final_answer(&self) -> Option<&str> {
        self.appended
            .iter()
            .rev()
            .filter(|m| m.is_assistant())
            .map(Message::content)
            .find(|c| !c.trim().is_empty())
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Interactive session over a fixed orchestration graph.
pub struct ChatSession {
    graph: Arc<OrchestrationGraph>,
    history: Vec<Message>,
}

impl ChatSession {
    pub fn new(graph: Arc<OrchestrationGraph>) -> Self {
        Self {
            graph,
            history: Vec::new(),
        }
    }

    /// Committed messages, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Drop the whole history.
    pub fn clear(&mut self) {
        info!("Clearing {} messages from session history", self.history.len());
        self.history.clear();
    }

    /// Run one turn for `input`.
    pub async fn send(&mut self, input: &str) -> AgentResult<TurnReport> {
        self.send_observed(input, |_| {}).await
    }

    /// Run one turn for `input`, reporting each node as it completes.
    ///
    /// On error nothing is committed, so the history is exactly what it was
    /// before the call. The same holds if the returned future is dropped
    /// before completion.
    pub async fn send_observed<F>(&mut self, input: &str, observer: F) -> AgentResult<TurnReport>
    where
        F: FnMut(&NodeStep) + Send,
    {
        let input = input.trim();
        if input.is_empty() {
            return Err(AgentError::EmptyInput);
        }

        let started_at = Utc::now();
        let mut working = self.history.clone();
        working.push(Message::human(input));
        let state = ConversationState::for_turn(working);

        let outcome = match self.graph.run_observed(state, observer).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Turn discarded, history left at {} messages", self.history.len());
                return Err(e.into());
            }
        };

        let committed = self.history.len();
        self.history = outcome.state.messages;
        let appended = self.history[committed..].to_vec();
        let finished_at = Utc::now();

        info!(
            path = ?outcome.steps.iter().map(|s| s.node.as_str()).collect::<Vec<_>>(),
            appended = appended.len(),
            "Turn committed"
        );

        Ok(TurnReport {
            steps: outcome.steps,
            appended,
            started_at,
            finished_at,
        })
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("graph", &self.graph)
            .field("history_len", &self.history.len())
            .finish()
    }
}
