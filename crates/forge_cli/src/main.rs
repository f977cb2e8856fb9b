//! ToolForge terminal - main entry point.
//!
//! Exit codes:
//! - 0: Clean exit
//! - 1: Startup failure

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use forge_agents::{build_graph, ChatSession};
use forge_llm::OpenAiGateway;
use forge_tools::file_tools;

mod cli;
mod render;
mod repl;

use cli::Cli;

fn init_logging(verbose: bool, json: bool) {
    let default_directives = if verbose {
        "warn,forge=debug"
    } else {
        "warn,forge=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_target(false).with_writer(std::io::stderr)))
        .try_init();

    if result.is_err() {
        // Logging already initialized, continue
    }
}

async fn run(cli: Cli) -> Result<()> {
    let workspace = cli.workspace();
    workspace
        .ensure()
        .with_context(|| format!("Failed to create tools directory {}", workspace.root().display()))?;

    let config = cli.llm_config();
    info!(model = %config.model, base_url = %config.base_url, "Connecting to model endpoint");
    let gateway = OpenAiGateway::new(config).context("Failed to configure model gateway")?;

    let tools = file_tools(&workspace);
    let graph = build_graph(Arc::new(gateway), &tools);
    let mut session = ChatSession::new(Arc::new(graph));

    println!("{}", render::banner(&cli.tools_dir));

    let lines = repl::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    let interrupts = repl::spawn_ctrl_c_listener();
    repl::run(&mut session, lines, interrupts).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
