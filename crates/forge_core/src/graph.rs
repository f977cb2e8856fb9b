//! Orchestration graph.
//!
//! A fixed, acyclic state machine over the four role nodes. Routing is decided
//! by pure functions over [`ConversationState`] after each node has applied
//! its update; the executor itself holds no per-turn state and can be reused
//! for every turn.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{CoreError, CoreResult};
use crate::message::Message;
use crate::state::{ConversationState, NextAction, StateUpdate};

/// Upper bound on node executions per turn (manager → architect → developer).
pub const MAX_NODE_VISITS: usize = 3;

/// Graph node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Manager,
    Architect,
    Developer,
    Analyst,
}

impl NodeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Manager => "manager",
            NodeId::Architect => "architect",
            NodeId::Developer => "developer",
            NodeId::Analyst => "analyst",
        }
    }

    pub fn all() -> [NodeId; 4] {
        [
            NodeId::Manager,
            NodeId::Architect,
            NodeId::Developer,
            NodeId::Analyst,
        ]
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where control goes after a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Node(NodeId),
    Terminal,
}

/// Router applied after the manager.
pub fn manager_router(state: &ConversationState) -> Route {
    match state.next_action {
        NextAction::Architect => Route::Node(NodeId::Architect),
        NextAction::Analyst => Route::Node(NodeId::Analyst),
        NextAction::Stop | NextAction::None => Route::Terminal,
    }
}

/// Router applied after the architect.
pub fn architect_router(state: &ConversationState) -> Route {
    if state.is_coding_task {
        Route::Node(NodeId::Developer)
    } else {
        Route::Terminal
    }
}

/// Next route after `node` has applied its update to `state`.
pub fn route_after(node: NodeId, state: &ConversationState) -> Route {
    match node {
        NodeId::Manager => manager_router(state),
        NodeId::Architect => architect_router(state),
        NodeId::Developer | NodeId::Analyst => Route::Terminal,
    }
}

/// A role node: reads the turn state and returns a partial update.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Node: Send + Sync {
    fn id(&self) -> NodeId;

    async fn run(&self, state: &ConversationState) -> CoreResult<StateUpdate>;
}

/// One completed node execution.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStep {
    pub node: NodeId,
    pub update: StateUpdate,
}

/// Result of a full graph run.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// State after the last node
    pub state: ConversationState,
    /// Node executions in order
    pub steps: Vec<NodeStep>,
}

impl TurnOutcome {
    /// Nodes visited, in order.
    pub fn path(&self) -> Vec<NodeId> {
        self.steps.iter().map(|s| s.node).collect()
    }

    /// Messages produced during the run, in order.
    pub fn new_messages(&self) -> impl Iterator<Item = &Message> {
        self.steps.iter().flat_map(|s| s.update.messages.iter())
    }
}

/// Executor for the role graph.
#[derive(Default)]
pub struct OrchestrationGraph {
    nodes: HashMap<NodeId, Arc<dyn Node>>,
}

impl OrchestrationGraph {
    /// Create a graph with no nodes registered.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Register a node under its own id, replacing any previous one.
    pub fn register(&mut self, node: Arc<dyn Node>) {
        let id = node.id();
        debug!("Registering node: {}", id);
        self.nodes.insert(id, node);
    }

    pub fn with_node(mut self, node: Arc<dyn Node>) -> Self {
        self.register(node);
        self
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Check that every node the routers can reach is registered.
    pub fn validate(&self) -> CoreResult<()> {
        NodeId::all()
            .into_iter()
            .find(|id| !self.contains(*id))
            .map_or(Ok(()), |missing| Err(CoreError::NodeNotRegistered(missing)))
    }

    /// Run one turn starting at the manager.
    pub async fn run(&self, state: ConversationState) -> CoreResult<TurnOutcome> {
        self.run_observed(state, |_| {}).await
    }

    /// Run one turn, reporting each completed node to `observer` as soon as
    /// its update has been applied.
    pub async fn run_observed<F>(
        &self,
        mut state: ConversationState,
        mut observer: F,
    ) -> CoreResult<TurnOutcome>
    where
        F: FnMut(&NodeStep) + Send,
    {
        self.validate()?;

        let mut steps = Vec::new();
        let mut route = Route::Node(NodeId::Manager);

        while let Route::Node(id) = route {
            if steps.len() == MAX_NODE_VISITS {
                error!("Graph exceeded {} node visits", MAX_NODE_VISITS);
                return Err(CoreError::VisitLimitExceeded(MAX_NODE_VISITS));
            }

            let node = self
                .nodes
                .get(&id)
                .cloned()
                .ok_or(CoreError::NodeNotRegistered(id))?;

            info!("Executing node: {}", id);
            let update = match node.run(&state).await {
                Ok(update) => update,
                Err(e) => {
                    error!("Node {} failed: {}", id, e);
                    return Err(e);
                }
            };

            state.apply(&update);
            route = route_after(id, &state);
            debug!(
                node = %id,
                new_messages = update.messages.len(),
                next = ?route,
                "Node completed"
            );

            let step = NodeStep { node: id, update };
            observer(&step);
            steps.push(step);
        }

        Ok(TurnOutcome { state, steps })
    }
}

impl std::fmt::Debug for OrchestrationGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrchestrationGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayError;

    fn mock_node(id: NodeId, times: usize, update: StateUpdate) -> Arc<dyn Node> {
        let mut node = MockNode::new();
        node.expect_id().return_const(id);
        node.expect_run()
            .times(times)
            .returning(move |_| Ok(update.clone()));
        Arc::new(node)
    }

    fn graph(manager: StateUpdate, architect: usize, developer: usize, analyst: usize) -> OrchestrationGraph {
        OrchestrationGraph::new()
            .with_node(mock_node(NodeId::Manager, 1, manager))
            .with_node(mock_node(
                NodeId::Architect,
                architect,
                StateUpdate::new()
                    .tool_spec("def f():\n    pass")
                    .message(Message::assistant("def f():\n    pass")),
            ))
            .with_node(mock_node(
                NodeId::Developer,
                developer,
                StateUpdate::new().message(Message::assistant("saved")),
            ))
            .with_node(mock_node(
                NodeId::Analyst,
                analyst,
                StateUpdate::new().message(Message::assistant("explained")),
            ))
    }

    fn turn() -> ConversationState {
        ConversationState::for_turn(vec![Message::human("request")])
    }

    #[tokio::test]
    async fn test_coding_path_reaches_developer() {
        let graph = graph(
            StateUpdate::new()
                .next_action(NextAction::Architect)
                .coding_task(true),
            1,
            1,
            0,
        );

        let outcome = graph.run(turn()).await.unwrap();
        assert_eq!(
            outcome.path(),
            vec![NodeId::Manager, NodeId::Architect, NodeId::Developer]
        );
        assert_eq!(outcome.state.tool_spec, "def f():\n    pass");
        assert_eq!(outcome.state.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_design_path_stops_after_architect() {
        let graph = graph(
            StateUpdate::new()
                .next_action(NextAction::Architect)
                .coding_task(false),
            1,
            0,
            0,
        );

        let outcome = graph.run(turn()).await.unwrap();
        assert_eq!(outcome.path(), vec![NodeId::Manager, NodeId::Architect]);
    }

    #[tokio::test]
    async fn test_analyst_path() {
        let graph = graph(StateUpdate::new().next_action(NextAction::Analyst), 0, 0, 1);

        let outcome = graph.run(turn()).await.unwrap();
        assert_eq!(outcome.path(), vec![NodeId::Manager, NodeId::Analyst]);
        assert_eq!(outcome.new_messages().count(), 1);
    }

    #[tokio::test]
    async fn test_chat_terminates_at_manager() {
        let graph = graph(
            StateUpdate::new()
                .next_action(NextAction::Stop)
                .coding_task(false)
                .message(Message::assistant("Hello!")),
            0,
            0,
            0,
        );

        let outcome = graph.run(turn()).await.unwrap();
        assert_eq!(outcome.path(), vec![NodeId::Manager]);
        assert_eq!(outcome.state.messages.last().unwrap().content(), "Hello!");
    }

    #[tokio::test]
    async fn test_unset_action_terminates() {
        let graph = graph(StateUpdate::new(), 0, 0, 0);
        let outcome = graph.run(turn()).await.unwrap();
        assert_eq!(outcome.path(), vec![NodeId::Manager]);
    }

    #[tokio::test]
    async fn test_observer_sees_each_step() {
        let graph = graph(
            StateUpdate::new()
                .next_action(NextAction::Architect)
                .coding_task(true),
            1,
            1,
            0,
        );

        let mut seen = Vec::new();
        graph
            .run_observed(turn(), |step| seen.push(step.node))
            .await
            .unwrap();
        assert_eq!(seen, vec![NodeId::Manager, NodeId::Architect, NodeId::Developer]);
    }

    #[tokio::test]
    async fn test_node_error_aborts_turn() {
        let mut manager = MockNode::new();
        manager.expect_id().return_const(NodeId::Manager);
        manager
            .expect_run()
            .times(1)
            .returning(|_| Err(GatewayError::Transport("connection refused".into()).into()));

        let graph = OrchestrationGraph::new()
            .with_node(Arc::new(manager))
            .with_node(mock_node(NodeId::Architect, 0, StateUpdate::new()))
            .with_node(mock_node(NodeId::Developer, 0, StateUpdate::new()))
            .with_node(mock_node(NodeId::Analyst, 0, StateUpdate::new()));

        let err = graph.run(turn()).await.unwrap_err();
        assert!(matches!(err, CoreError::Gateway(GatewayError::Transport(_))));
    }

    #[tokio::test]
    async fn test_missing_node_is_rejected() {
        let graph = OrchestrationGraph::new().with_node(mock_node(
            NodeId::Manager,
            0,
            StateUpdate::new(),
        ));
        let err = graph.run(turn()).await.unwrap_err();
        assert!(matches!(err, CoreError::NodeNotRegistered(NodeId::Architect)));
    }

    #[test]
    fn test_every_route_terminates_within_limit() {
        let actions = [
            NextAction::None,
            NextAction::Architect,
            NextAction::Analyst,
            NextAction::Stop,
        ];

        for action in actions {
            for coding in [false, true] {
                let state = ConversationState {
                    next_action: action,
                    is_coding_task: coding,
                    ..ConversationState::default()
                };

                let mut visits = 1;
                let mut route = route_after(NodeId::Manager, &state);
                while let Route::Node(id) = route {
                    visits += 1;
                    route = route_after(id, &state);
                }
                assert!(visits <= MAX_NODE_VISITS, "{action:?}/{coding}: {visits}");
            }
        }
    }

    #[test]
    fn test_routers() {
        let mut state = ConversationState::default();
        assert_eq!(manager_router(&state), Route::Terminal);

        state.next_action = NextAction::Architect;
        assert_eq!(manager_router(&state), Route::Node(NodeId::Architect));
        assert_eq!(architect_router(&state), Route::Terminal);

        state.is_coding_task = true;
        assert_eq!(architect_router(&state), Route::Node(NodeId::Developer));

        state.next_action = NextAction::Analyst;
        assert_eq!(manager_router(&state), Route::Node(NodeId::Analyst));

        assert_eq!(route_after(NodeId::Developer, &state), Route::Terminal);
        assert_eq!(route_after(NodeId::Analyst, &state), Route::Terminal);
    }
}
