//! Tool trait and registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use forge_core::{Message, ToolCall, ToolDefinition};

use crate::error::{ToolError, ToolResult};

/// A named capability the model may call.
///
/// `execute` always yields text: failures are reported in the returned
/// string rather than as an error.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition
    fn definition(&self) -> &ToolDefinition;

    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Execute the tool with decoded arguments
    async fn execute(&self, args: &Map<String, Value>) -> String;
}

/// Decode a tool's argument map into a typed struct.
pub fn parse_args<T: DeserializeOwned>(tool: &str, args: &Map<String, Value>) -> ToolResult<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ToolError::invalid_arguments(tool, e.to_string()))
}

/// Registry of tools keyed by name.
///
/// Names are kept ordered so the definitions bound to a model request are
/// stable between calls.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        debug!(tool = %name, "Registering tool");
        self.tools.insert(name, tool);
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Definitions to bind to a model request.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition().clone()).collect()
    }

    /// A registry restricted to `names`. Unknown names are skipped.
    pub fn select(&self, names: &[&str]) -> Self {
        let mut subset = Self::new();
        for name in names {
            match self.get(name) {
                Some(tool) => subset.register(tool),
                None => warn!(tool = %name, "Requested tool is not registered"),
            }
        }
        subset
    }

    /// Run a single call. Calls to tools outside this registry yield an
    /// error text instead of running anything.
    pub async fn invoke(&self, call: &ToolCall) -> String {
        match self.get(&call.name) {
            Some(tool) => {
                info!(tool = %call.name, args = %serde_json::Value::Object(call.args.clone()), "Executing tool");
                tool.execute(&call.args).await
            }
            None => {
                let err = ToolError::UnknownTool {
                    name: call.name.clone(),
                    available: self.names().join(", "),
                };
                warn!("{}", err);
                format!("Error: {}", err)
            }
        }
    }

    /// Run calls one after another, producing one tool result per call in
    /// the same order.
    pub async fn execute_calls(&self, calls: &[ToolCall]) -> Vec<Message> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let output = self.invoke(call).await;
            results.push(Message::tool_result(&call.id, output));
        }
        results
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
