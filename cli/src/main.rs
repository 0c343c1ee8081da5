//! # Helpdesk Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the Helpdesk CLI.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to appropriate command handlers
//!
//! ## Architecture
//!
//! Every command builds its own `ResponseRegistry` from the loaded
//! configuration and passes it explicitly to whatever needs it; there is no
//! process-wide registry.
//!
//! ## Examples
//!
//! ```bash
//! # Talk to the bot in the terminal
//! helpdesk chat
//!
//! # Answer a single question
//! helpdesk ask credit card
//!
//! # Serve the JSON API with info-level logs
//! helpdesk -v srv --port 8080
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (chat, guided, ask, list, srv)
mod core; // Registry, validation, config, errors

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "helpdesk",
    about = "🤖 Helpdesk: rule-based contact-centre responder",
    long_about = "Answer customer messages from a table of canned responses.\n\
                  Chat in the terminal, walk through a guided flow, or serve a JSON HTTP API.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Load this config file instead of searching for .helpdesk.toml and the user config.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Chat with the bot in the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Walk through the scripted account/loan assistant.
    #[command(alias = "g")]
    Guided(commands::guided::GuidedArgs),
    /// Answer a single message and exit.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
    /// Print every trigger and its response.
    #[command(alias = "l")]
    List(commands::list::ListArgs),
    /// Serve the JSON HTTP API.
    Srv(commands::srv::SrvArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Chat(args) => commands::chat::handle_chat(args, config_path).await,
        Commands::Guided(args) => commands::guided::handle_guided(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args, config_path).await,
        Commands::List(args) => commands::list::handle_list(args, config_path).await,
        Commands::Srv(args) => commands::srv::handle_srv(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
