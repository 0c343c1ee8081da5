//! # Helpdesk Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the core components of Helpdesk: the response
//! registry that every surface talks to, the input validation it applies,
//! and the configuration and error infrastructure around them.
//!
//! ## Architecture
//!
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//! - `registry`: The canned-response table and its lookup operations
//! - `validation`: Input checks and normalization applied before lookup
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{HelpdeskError, Result}; // For error handling
//! use crate::core::registry::ResponseRegistry; // For answering messages
//! ```
//!
pub mod config;
pub mod error;
pub mod registry;
pub mod validation;
