//! # Helpdesk List Command
//!
//! File: cli/src/commands/list.rs
//!
//! ## Overview
//!
//! Implements `helpdesk list`, which prints every trigger the registry knows
//! together with its response, after configuration entries have been
//! applied. Useful for checking what a `.helpdesk.toml` or responses file
//! actually contributed.
//!
//! ## Examples
//!
//! ```bash
//! helpdesk list
//! helpdesk list --json
//! ```
//!
//! Example output:
//!
//! ```text
//! account     => I can help you with account-related queries. ...
//! bye         => Goodbye! Thanks for connecting with Helpdesk.
//! ...
//!
//! 5 response(s).
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// # List Arguments (`ListArgs`)
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Print the table as a JSON object instead of aligned text.
    #[arg(long)]
    pub json: bool,
}

/// # Handle List Command (`handle_list`)
///
/// Prints the registry snapshot as an aligned table or, with `--json`, as a
/// pretty-printed JSON object.
///
/// ## Arguments
///
/// * `args`: Parsed `list` flags.
/// * `config_path`: Explicit config file from `--config`, if given.
///
/// ## Errors
///
/// Returns an error if the configuration or responses file cannot be loaded.
pub async fn handle_list(args: ListArgs, config_path: Option<&Path>) -> Result<()> {
    info!("Handling list command with args: {:?}", args);
    let (_, registry) = super::load_registry(config_path)?;
    let entries = registry.list();

    let rendered = if args.json {
        serde_json::to_string_pretty(&entries).context("Failed to serialize responses")?
    } else {
        format_table(&entries)
    };
    println!("{}", rendered);
    Ok(())
}

/// Formats entries as `trigger => response` lines with the arrows aligned.
fn format_table(entries: &BTreeMap<String, String>) -> String {
    let width = entries.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (trigger, response) in entries {
        out.push_str(&format!("{:<width$} => {}\n", trigger, response, width = width));
    }
    out.push_str(&format!("\n{} response(s).", entries.len()));
    out
}
