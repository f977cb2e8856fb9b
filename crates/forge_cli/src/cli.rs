//! Command-line options.
//!
//! Every option can also come from the environment (or a `.env` file loaded
//! before parsing).

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use forge_llm::{
    LlmConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, ENV_API_KEY, ENV_BASE_URL,
    ENV_MODEL, ENV_TIMEOUT_SECS,
};
use forge_tools::{Workspace, DEFAULT_TOOLS_DIR};

/// ToolForge - multi-agent terminal that designs and writes small Python tools
#[derive(Parser, Debug)]
#[command(name = "toolforge")]
#[command(version, about = "ToolForge - multi-agent terminal that designs and writes small Python tools")]
#[command(long_about = r#"
ToolForge routes every request through a small team of model-backed roles:

  manager    → classifies the request, answers small talk itself
  architect  → drafts a function skeleton or a prose design
  developer  → implements the skeleton and saves it to the tools directory
  analyst    → lists and reads saved tools to answer questions about them

Type 'quit' or 'exit' (or send end of input) to leave.
"#)]
pub struct Cli {
    /// Base URL of the OpenAI-compatible endpoint
    #[arg(long, env = ENV_BASE_URL, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// API key sent as a bearer token
    #[arg(long, env = ENV_API_KEY, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name passed to the endpoint
    #[arg(long, env = ENV_MODEL, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Directory where generated tools are saved
    #[arg(long, env = "TOOLS_DIR", default_value = DEFAULT_TOOLS_DIR)]
    pub tools_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, env = ENV_TIMEOUT_SECS, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Enable debug logging for ToolForge crates
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig::default()
            .with_base_url(self.base_url.clone())
            .with_api_key(self.api_key.clone().filter(|k| !k.trim().is_empty()))
            .with_model(self.model.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::new(self.tools_dir.clone())
    }
}
