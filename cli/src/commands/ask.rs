//! # Helpdesk Ask Command
//!
//! File: cli/src/commands/ask.rs
//!
//! Implements `helpdesk ask <message...>`: answers one message and exits.
//! The words are joined with single spaces, so `helpdesk ask credit card`
//! and `helpdesk ask "credit card"` are the same question.
//!
use crate::core::error::Result;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// # Ask Arguments (`AskArgs`)
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The message to answer.
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,
}

/// # Handle Ask Command (`handle_ask`)
///
/// ## Errors
///
/// Returns an error if the configuration or responses file cannot be loaded.
pub async fn handle_ask(args: AskArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling ask command with args: {:?}", args);
    let (_, registry) = super::load_registry(config_path)?;
    println!("{}", registry.respond(args.message.join(" ")));
    Ok(())
}
