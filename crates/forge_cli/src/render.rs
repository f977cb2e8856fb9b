//! Terminal rendering of node output.

use std::path::Path;

use forge_core::{NodeId, NodeStep};

const SEPARATOR_WIDTH: usize = 40;

fn header(node: NodeId) -> &'static str {
    match node {
        NodeId::Manager => "🧠 MANAGER DECISION",
        NodeId::Architect => "📐 ARCHITECT DESIGN",
        NodeId::Developer => "🔨 DEVELOPER OUTPUT",
        NodeId::Analyst => "🧐 ANALYST EXPLANATION",
    }
}

/// One labelled block framed by dash separators.
pub fn block(node: NodeId, content: &str) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    format!(
        "\n{sep}\n[{header}]\n{sep}\n{content}\n{sep}\n",
        sep = separator,
        header = header(node),
        content = content.trim()
    )
}

/// Blocks to print for a completed node, in order.
///
/// The manager always reports its routing and, when it answered itself, the
/// answer. Other nodes show their last non-empty assistant text, if any.
pub fn step_blocks(step: &NodeStep) -> Vec<String> {
    let update = &step.update;
    match step.node {
        NodeId::Manager => {
            let action = update
                .next_action
                .map(|a| a.as_str())
                .unwrap_or("UNKNOWN");
            let mut blocks = vec![block(NodeId::Manager, &format!("Routing to: {}", action))];
            if let Some(answer) = update.last_assistant_text() {
                blocks.push(block(NodeId::Manager, answer));
            }
            blocks
        }
        node => update
            .last_assistant_text()
            .map(|text| vec![block(node, text)])
            .unwrap_or_default(),
    }
}

pub fn print_step(step: &NodeStep) {
    for b in step_blocks(step) {
        println!("{}", b);
    }
}

fn display_dir(dir: &Path) -> String {
    let shown = dir.display().to_string();
    let shown = shown.trim_end_matches('/');
    if dir.is_absolute() || shown.starts_with("./") || shown.starts_with("../") {
        format!("{}/", shown)
    } else {
        format!("./{}/", shown)
    }
}

pub fn banner(tools_dir: &Path) -> String {
    [
        "\n=== ToolForge AI Terminal ===".to_string(),
        format!("Working directory: {}", display_dir(tools_dir)),
        "Можете попробовать такие команды:".to_string(),
        "1. 'Создай инструмент password_gen который создает пароли'".to_string(),
        "2. 'Каковы основные принципы langchain?'".to_string(),
        "3. 'Кратко расскажи какие инструменты созданы и для чего'".to_string(),
        "Для выхода введите: 'quit', 'exit'".to_string(),
    ]
    .join("\n")
}
