//! # Helpdesk Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the Helpdesk CLI. Every
//! command is a thin caller around one `ResponseRegistry`: it builds the
//! registry from the loaded configuration and hands messages to it.
//!
//! ## Command Groups
//!
//! - `ask`: Answer a single message and exit
//! - `chat`: Interactive terminal conversation
//! - `guided`: Scripted account/loan walkthrough
//! - `list`: Print the response table
//! - `srv`: JSON HTTP API
//!
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::registry::ResponseRegistry;
use anyhow::Context;
use std::path::Path;

/// One-shot question answering.
pub mod ask;
/// Interactive chat loop over stdin/stdout.
pub mod chat;
/// Scripted account/loan flow.
pub mod guided;
/// Listing of the response table.
pub mod list;
/// HTTP API server.
pub mod srv;

/// # Load Registry (`load_registry`)
///
/// Loads configuration and builds the registry it describes.
///
/// ## Arguments
///
/// * `config_path`: Explicit config file from `--config`. When `None`, the
///   user and project config files are searched for and merged.
///
/// ## Returns
///
/// * The merged configuration together with the seeded registry.
///
/// ## Errors
///
/// Returns an error if a config file is invalid or the responses file cannot
/// be read.
pub(crate) fn load_registry(config_path: Option<&Path>) -> Result<(Config, ResponseRegistry)> {
    let cfg = config::load_config(config_path).context("Failed to load Helpdesk configuration")?;
    let registry = ResponseRegistry::from_config(&cfg.responses)
        .context("Failed to build the response registry")?;
    Ok((cfg, registry))
}
