//! # Helpdesk Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the application-level error types used by the
//! Helpdesk commands. Registry lookups never surface these: the registry has
//! its own small taxonomy (see `core::registry::RegistryError`) and always
//! recovers locally. The errors here cover everything around it, such as
//! configuration loading, reading responses files, terminal I/O and running
//! the HTTP server.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `HelpdeskError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if config.chat.exit_phrases.is_empty() {
//!     return Err(HelpdeskError::Config("No exit phrases configured".into()).into());
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the Helpdesk application.
#[derive(Error, Debug)]
pub enum HelpdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Responses file '{path}' could not be loaded: {reason}")]
    ResponsesFile { path: PathBuf, reason: String },

    #[error("Terminal I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Server(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
