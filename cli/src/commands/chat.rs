//! # Helpdesk Chat Command
//!
//! File: cli/src/commands/chat.rs
//!
//! ## Overview
//!
//! Implements `helpdesk chat`, an interactive terminal conversation with the
//! response registry. Each line typed by the user is answered with
//! `ResponseRegistry::respond`. The session ends when the user types one of
//! the configured exit phrases or closes the input stream.
//!
//! ## Examples
//!
//! ```bash
//! helpdesk chat
//! ```
//!
//! ```text
//! You: hello
//! Bot: Hi there! Welcome to Helpdesk support. How can I help you?
//! You: bye
//! Bot: Goodbye! Thanks for connecting with Helpdesk.
//! ```
//!
//! Ctrl+C prints the farewell and exits cleanly. A line that is not valid
//! UTF-8 is answered like any other invalid message and the session goes on.
//!
use crate::core::config::ChatConfig;
use crate::core::error::{HelpdeskError, Result};
use crate::core::registry::{Outcome, ResponseRegistry};
use crate::core::validation::{normalize, UserInput};
use clap::Parser;
use std::io::{BufRead, ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// # Chat Arguments (`ChatArgs`)
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Skip the welcome banner.
    #[arg(long, short)]
    pub quiet: bool,
}

/// How a chat session finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ExitPhrase,
    EndOfInput,
}

/// Totals reported once a session is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Lines answered, including the exit phrase.
    pub messages: usize,
    pub ended_by: SessionEnd,
}

/// # Handle Chat Command (`handle_chat`)
///
/// Loads the configuration, builds the registry, and runs a session on the
/// process's stdin and stdout.
///
/// ## Arguments
///
/// * `args`: Parsed `chat` flags.
/// * `config_path`: Explicit config file from `--config`, if given.
///
/// ## Errors
///
/// Returns an error if the configuration cannot be loaded or the terminal
/// cannot be read or written.
pub async fn handle_chat(args: ChatArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    let (cfg, registry) = super::load_registry(config_path)?;

    tokio::spawn(farewell_on_interrupt(cfg.chat.farewell.clone()));

    let stdin = std::io::stdin();
    // Unlocked stdout, so the interrupt task can still print the farewell.
    let summary = run_session(
        &registry,
        &cfg.chat,
        !args.quiet,
        stdin.lock(),
        std::io::stdout(),
    )?;

    info!(
        "Chat session ended ({:?}) after {} message(s)",
        summary.ended_by, summary.messages
    );
    Ok(())
}

/// Waits for Ctrl+C, then says goodbye and ends the process.
async fn farewell_on_interrupt(farewell: String) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Chat interrupted by Ctrl+C");
            println!("\n{}", farewell);
            std::process::exit(0);
        }
        Err(e) => warn!("Failed to install Ctrl+C handler: {}", e),
    }
}

/// # Run Chat Session (`run_session`)
///
/// Reads lines from `input` and writes prompts and replies to `output` until
/// an exit phrase or end of input.
///
/// On an exit phrase the registry's own entry for it is printed if it has
/// one (the baseline table answers "bye"), otherwise the configured farewell.
///
/// ## Arguments
///
/// * `registry`: The table that answers each line.
/// * `chat`: Exit phrases and farewell text.
/// * `show_banner`: Whether to print the welcome banner first.
/// * `input`, `output`: The conversation streams.
///
/// ## Returns
///
/// * `SessionSummary`: How many lines were answered and what ended the session.
///
/// ## Errors
///
/// Returns `HelpdeskError::Io` if reading from `input` or writing to `output`
/// fails.
pub fn run_session<R: BufRead, W: Write>(
    registry: &ResponseRegistry,
    chat: &ChatConfig,
    show_banner: bool,
    mut input: R,
    mut output: W,
) -> std::result::Result<SessionSummary, HelpdeskError> {
    let exit_phrases: Vec<String> = chat.exit_phrases.iter().map(|p| normalize(p)).collect();

    if show_banner {
        writeln!(output, "🤖 Helpdesk Contact Center - Chat")?;
        writeln!(
            output,
            "Type '{}' to exit the conversation.",
            chat.exit_phrases.join("' or '")
        )?;
        writeln!(output, "{}", "-".repeat(50))?;
    }

    let mut messages = 0;
    let mut line = String::new();
    loop {
        write!(output, "You: ")?;
        output.flush()?;

        line.clear();
        let read = match input.read_line(&mut line) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping a line that is not valid UTF-8");
                messages += 1;
                let reply = registry.respond(UserInput::NonText { kind: "non-UTF-8 text" });
                writeln!(output, "Bot: {}", reply)?;
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        if read == 0 {
            writeln!(output)?;
            writeln!(output, "{}", chat.farewell)?;
            return Ok(SessionSummary {
                messages,
                ended_by: SessionEnd::EndOfInput,
            });
        }
        let message = line.trim_end_matches(['\r', '\n']);
        messages += 1;

        if exit_phrases.contains(&normalize(message)) {
            debug!("Exit phrase received: {}", message);
            let reply = match registry.resolve(message) {
                Ok(Outcome::Matched(reply)) => reply,
                _ => chat.farewell.clone(),
            };
            writeln!(output, "Bot: {}", reply)?;
            return Ok(SessionSummary {
                messages,
                ended_by: SessionEnd::ExitPhrase,
            });
        }

        writeln!(output, "Bot: {}", registry.respond(message))?;
    }
}
