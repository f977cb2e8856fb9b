//! OpenAI-compatible chat completions gateway.
//!
//! Works against any `/chat/completions` endpoint that speaks the OpenAI wire
//! format with function tools (LiteLLM, vLLM, DeepSeek, OpenAI itself).

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use forge_core::{
    AssistantTurn, GatewayError, GatewayResult, Message, ModelGateway, ModelRequest, ToolCall,
    ToolDefinition,
};

use crate::config::LlmConfig;

/// Gateway that calls an OpenAI-compatible HTTP endpoint.
pub struct OpenAiGateway {
    config: LlmConfig,
    client: reqwest::Client,
}

impl OpenAiGateway {
    /// Create a gateway with explicit configuration
    pub fn new(config: LlmConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::NotConfigured(e.to_string()))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    async fn invoke(&self, request: ModelRequest) -> GatewayResult<AssistantTurn> {
        let url = self.config.completions_url();
        let body = ChatRequest {
            model: &self.config.model,
            messages: to_wire_messages(&request),
            temperature: self.config.temperature,
            tools: request.tools.iter().map(WireTool::from).collect(),
        };

        debug!(
            model = %self.config.model,
            messages = body.messages.len(),
            tools = ?request.tool_names(),
            "Sending chat completion"
        );

        let mut builder = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(format!("{} after {:?}", url, self.config.timeout))
            } else {
                GatewayError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let result: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout(format!("{} after {:?}", url, self.config.timeout))
            } else {
                GatewayError::MalformedResponse(format!("Failed to parse response: {}", e))
            }
        })?;

        let message = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| GatewayError::MalformedResponse("No choices in response".to_string()))?;

        Ok(from_wire_message(message))
    }
}

/// Remove `<think>…</think>` reasoning blocks emitted inline by reasoning models.
pub fn strip_reasoning(content: &str) -> String {
    static THINK: OnceLock<Regex> = OnceLock::new();
    let re = THINK.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));
    re.replace_all(content, "").trim().to_string()
}

fn to_wire_messages(request: &ModelRequest) -> Vec<WireMessage> {
    let mut messages = Vec::with_capacity(request.conversation.len() + 1);
    messages.push(WireMessage::text("system", &request.system_prompt));

    for message in &request.conversation {
        let wire = match message {
            Message::System { content } => WireMessage::text("system", content),
            Message::Human { content } => WireMessage::text("user", content),
            Message::Assistant {
                content,
                tool_calls,
            } => WireMessage {
                role: "assistant",
                content: if content.is_empty() && !tool_calls.is_empty() {
                    None
                } else {
                    Some(content.clone())
                },
                tool_calls: tool_calls.iter().map(WireToolCall::from).collect(),
                tool_call_id: None,
            },
            Message::ToolResult {
                tool_call_id,
                content,
            } => WireMessage {
                role: "tool",
                content: Some(content.clone()),
                tool_calls: Vec::new(),
                tool_call_id: Some(tool_call_id.clone()),
            },
        };
        messages.push(wire);
    }

    messages
}

fn from_wire_message(message: ResponseMessage) -> AssistantTurn {
    let content = strip_reasoning(message.content.as_deref().unwrap_or_default());
    let tool_calls = message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            let id = call
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));
            let args = decode_arguments(&call.function.name, &call.function.arguments);
            ToolCall::new(id, call.function.name, args)
        })
        .collect();

    AssistantTurn {
        content,
        tool_calls,
    }
}

/// Decode a JSON-encoded argument string. Malformed input yields an empty
/// map so the tool can report the missing arguments itself.
fn decode_arguments(tool: &str, raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!(tool = %tool, "Tool arguments are not an object: {}", other);
            Map::new()
        }
        Err(e) => {
            warn!(tool = %tool, "Failed to decode tool arguments: {}", e);
            Map::new()
        }
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<WireToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn text(role: &'static str, content: &str) -> Self {
        Self {
            role,
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

impl From<&ToolCall> for WireToolCall {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            kind: "function",
            function: WireFunction {
                name: call.name.clone(),
                arguments: Value::Object(call.args.clone()).to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireToolFunction,
}

#[derive(Debug, Serialize)]
struct WireToolFunction {
    name: String,
    description: String,
    parameters: Value,
}

impl From<&ToolDefinition> for WireTool {
    fn from(def: &ToolDefinition) -> Self {
        Self {
            kind: "function",
            function: WireToolFunction {
                name: def.name.clone(),
                description: def.description.clone(),
                parameters: def.parameters.clone(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct ResponseChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    #[serde(default)]
    id: Option<String>,
    function: WireFunction,
}
