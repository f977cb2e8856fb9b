//! # forge_llm
//!
//! Model gateway implementations for ToolForge.
//!
//! - [`OpenAiGateway`]: OpenAI-compatible `/chat/completions` client with
//!   function tools, configured from [`LlmConfig`]
//! - [`ScriptedGateway`]: replays queued replies and records requests, used
//!   by agent and end-to-end tests
//!
//! Model failures are returned as [`forge_core::GatewayError`] and are never
//! retried here.

pub mod config;
pub mod openai;
pub mod scripted;

pub use config::{
    LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_BASE_URL,
    ENV_MODEL, ENV_TIMEOUT_SECS,
};
pub use openai::{strip_reasoning, OpenAiGateway};
pub use scripted::{ScriptedGateway, ScriptedReply};
