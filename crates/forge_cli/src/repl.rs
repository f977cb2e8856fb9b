//! Read-eval-print loop over a chat session.
//!
//! Lines and interrupts both arrive on channels. Stdin is read on a plain OS
//! thread because a blocking read cannot be cancelled, and a runtime that owns
//! one cannot shut down until the user presses enter.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use forge_agents::{AgentError, ChatSession};

use crate::render;

/// What the loop should do with one line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Quit,
    Skip,
    Send(&'a str),
}

pub fn parse_line(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        Command::Quit
    } else if trimmed.is_empty() {
        Command::Skip
    } else {
        Command::Send(trimmed)
    }
}

/// Forward lines from `reader` until it ends, fails, or the receiver is gone.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Forward every Ctrl-C as one interrupt.
pub fn spawn_ctrl_c_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).await.is_err() {
                break;
            }
        }
    });
    rx
}

fn prompt() -> Result<()> {
    print!("\nUser: ");
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Run until the user quits, input ends, or an interrupt arrives at the
/// prompt. An interrupt while a turn is running cancels only that turn.
pub async fn run(
    session: &mut ChatSession,
    mut lines: mpsc::Receiver<String>,
    mut interrupts: mpsc::Receiver<()>,
) -> Result<()> {
    loop {
        prompt()?;

        let line = tokio::select! {
            biased;
            line = lines.recv() => line,
            Some(()) = interrupts.recv() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let text = match parse_line(&line) {
            Command::Quit => break,
            Command::Skip => continue,
            Command::Send(text) => text,
        };

        println!("\n--- 🚀 Processing Request ---");
        let turn = tokio::select! {
            biased;
            result = session.send_observed(text, render::print_step) => Some(result),
            Some(()) = interrupts.recv() => None,
        };

        match turn {
            Some(Ok(report)) => debug!(
                steps = report.steps.len(),
                duration_ms = report.duration_ms(),
                "Turn finished"
            ),
            Some(Err(AgentError::EmptyInput)) => continue,
            Some(Err(e)) => {
                println!("Error occurred: {:#}", anyhow::Error::from(e));
            }
            None => {
                warn!("Turn cancelled by user");
                println!("\nRequest cancelled.");
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
