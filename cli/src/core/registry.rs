//! # Helpdesk Response Registry
//!
//! File: cli/src/core/registry.rs
//!
//! ## Overview
//!
//! The `ResponseRegistry` maps normalized trigger phrases to canned response
//! text. It is the only piece of the application with real behaviour; the
//! terminal loops and the HTTP server each hold one registry and call it once
//! per incoming message.
//!
//! Matching is exact: the message is validated, lowercased and trimmed, and
//! then looked up in the table. There is no fuzzy matching.
//!
//! ## Architecture
//!
//! - The table lives behind a `RwLock`. Lookups and listings share the read
//!   lock; `insert` takes the write lock for its single map update.
//! - `resolve` reports the lookup as an explicit `Outcome`, or a
//!   `RegistryError` when the table cannot be read.
//! - `respond` folds every result, including failures, into one of the
//!   response strings, so callers always get something to show the user.
//!
//! ## Examples
//!
//! ```rust
//! let registry = ResponseRegistry::new();
//! assert_eq!(registry.respond("HELLO"), registry.respond("hello"));
//!
//! registry.insert("Opening Hours", "We are open 9am to 5pm.");
//! assert_eq!(registry.respond("opening hours"), "We are open 9am to 5pm.");
//! ```
//!
use crate::core::config::ResponsesConfig;
use crate::core::error::{HelpdeskError, Result};
use crate::core::validation::{self, UserInput};
use anyhow::Context;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Returned when the message fails validation.
pub const INVALID_INPUT_FALLBACK: &str =
    "I'm sorry, I didn't understand that. Could you please rephrase your question?";

/// Returned when a valid message has no table entry.
pub const NO_MATCH_FALLBACK: &str = "I'm sorry, I didn't understand that. Could you rephrase?";

/// Returned when the table could not be consulted at all.
pub const INTERNAL_FAILURE_FALLBACK: &str =
    "I'm sorry, I'm experiencing technical difficulties. Please try again later.";

/// Entries every registry starts with.
const BASELINE_RESPONSES: [(&str, &str); 5] = [
    (
        "hello",
        "Hi there! Welcome to Helpdesk support. How can I help you?",
    ),
    (
        "account",
        "I can help you with account-related queries. Could you specify if it's balance or login issues?",
    ),
    (
        "loan",
        "We offer personal, home, and business loans. Would you like interest rate details?",
    ),
    (
        "credit card",
        "Sure! We have multiple credit card options. Do you want to hear about rewards or fees?",
    ),
    ("bye", "Goodbye! Thanks for connecting with Helpdesk."),
];

/// Failure to consult the response table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A writer panicked while holding the table lock.
    #[error("response table is unavailable: a writer panicked while holding the lock")]
    Unavailable,
}

/// Result of looking a message up in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched(String),
    NoMatch,
    InvalidInput,
}

impl Outcome {
    /// The text shown to the user for this outcome.
    pub fn into_text(self) -> String {
        match self {
            Outcome::Matched(response) => response,
            Outcome::NoMatch => NO_MATCH_FALLBACK.to_string(),
            Outcome::InvalidInput => INVALID_INPUT_FALLBACK.to_string(),
        }
    }
}

/// Table of trigger phrases and their canned responses.
#[derive(Debug)]
pub struct ResponseRegistry {
    entries: RwLock<BTreeMap<String, String>>,
}

impl Default for ResponseRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseRegistry {
    /// Creates a registry seeded with the baseline entries.
    pub fn new() -> Self {
        let entries: BTreeMap<String, String> = BASELINE_RESPONSES
            .iter()
            .map(|(trigger, response)| (trigger.to_string(), response.to_string()))
            .collect();
        info!(
            "Response registry initialized with {} predefined responses",
            entries.len()
        );
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// # Build From Configuration (`from_config`)
    ///
    /// Starts from the baseline table, then inserts entries from the external
    /// responses file (if configured) followed by the inline entries, so
    /// inline entries win on conflicts. Entries that `insert` rejects are
    /// logged and skipped.
    ///
    /// ## Errors
    ///
    /// Returns an error if the responses file cannot be read or is not a flat
    /// TOML table of strings.
    pub fn from_config(config: &ResponsesConfig) -> Result<Self> {
        let registry = Self::new();

        if let Some(file) = &config.file {
            let from_file = load_responses_file(Path::new(file))?;
            info!("Loading {} responses from {}", from_file.len(), file);
            registry.extend_logged(&from_file);
        }

        registry.extend_logged(&config.entries);
        Ok(registry)
    }

    fn extend_logged(&self, entries: &BTreeMap<String, String>) {
        for (trigger, response) in entries {
            if !self.insert(trigger.as_str(), response) {
                warn!("Skipping response entry for trigger '{}'", trigger);
            }
        }
    }

    /// Returns `true` when `input` may be looked up. See [`validation::validate`].
    pub fn validate(&self, input: &UserInput) -> bool {
        validation::validate(input)
    }

    /// # Resolve a Message (`resolve`)
    ///
    /// Validates, normalizes and looks up `input`.
    ///
    /// ## Errors
    ///
    /// Returns `RegistryError::Unavailable` when the table lock is poisoned.
    pub fn resolve(
        &self,
        input: impl Into<UserInput>,
    ) -> std::result::Result<Outcome, RegistryError> {
        let input = input.into();
        let text = match input.as_text() {
            Some(text) if self.validate(&input) => text,
            _ => {
                warn!("Invalid input received: {}", preview(&input));
                return Ok(Outcome::InvalidInput);
            }
        };

        let cleaned = validation::normalize(text);
        let entries = self.read()?;
        match entries.get(&cleaned) {
            Some(response) => {
                info!("Found predefined response for: {}", cleaned);
                Ok(Outcome::Matched(response.clone()))
            }
            None => {
                info!("No predefined response found for: {}", cleaned);
                Ok(Outcome::NoMatch)
            }
        }
    }

    /// Returns the response for `input`, always non-empty.
    ///
    /// Invalid input, unknown phrases and table failures each map to their
    /// own fallback string.
    pub fn respond(&self, input: impl Into<UserInput>) -> String {
        match self.resolve(input) {
            Ok(outcome) => outcome.into_text(),
            Err(e) => {
                error!("Error processing user input: {}", e);
                INTERNAL_FAILURE_FALLBACK.to_string()
            }
        }
    }

    /// # Insert a Response (`insert`)
    ///
    /// Stores `response` under the normalized `trigger`, overwriting any
    /// existing entry. Returns `false` without touching the table when the
    /// trigger is not text or is blank, when the response is empty, or when
    /// the table is unavailable. Use [`Self::try_insert`] to tell the last
    /// case apart from the others.
    pub fn insert(&self, trigger: impl Into<UserInput>, response: &str) -> bool {
        match self.try_insert(trigger, response) {
            Ok(stored) => stored,
            Err(e) => {
                error!("Error adding response: {}", e);
                false
            }
        }
    }

    /// # Try to Insert a Response (`try_insert`)
    ///
    /// Same rules as [`Self::insert`], with table failures reported
    /// separately from rejected entries.
    ///
    /// ## Arguments
    ///
    /// * `trigger`: The phrase to answer. Stored lowercased and trimmed.
    /// * `response`: The text to answer it with. Must not be empty.
    ///
    /// ## Returns
    ///
    /// * `Ok(true)` when the entry was stored.
    /// * `Ok(false)` when the trigger or response was rejected.
    ///
    /// ## Errors
    ///
    /// Returns `RegistryError::Unavailable` when the table lock is poisoned.
    pub fn try_insert(
        &self,
        trigger: impl Into<UserInput>,
        response: &str,
    ) -> std::result::Result<bool, RegistryError> {
        let trigger = trigger.into();
        let key = match trigger.as_text().map(validation::normalize) {
            Some(key) if !key.is_empty() => key,
            _ => return Ok(false),
        };
        if response.is_empty() {
            return Ok(false);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| RegistryError::Unavailable)?;
        entries.insert(key.clone(), response.to_string());
        info!("Added new response for key: {}", key);
        Ok(true)
    }

    /// Returns a copy of every entry, ordered by trigger.
    pub fn list(&self) -> BTreeMap<String, String> {
        match self.entries.read() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => {
                // The only writer is a single map insert, so the data is intact.
                warn!("Listing responses from a poisoned table");
                poisoned.into_inner().clone()
            }
        }
    }

    /// A registry whose table lock was poisoned by a panicking writer.
    #[cfg(test)]
    pub(crate) fn poisoned() -> std::sync::Arc<Self> {
        let registry = std::sync::Arc::new(Self::new());
        let writer = std::sync::Arc::clone(&registry);
        let result = std::thread::spawn(move || {
            let _guard = writer.entries.write();
            panic!("writer failed mid-update");
        })
        .join();
        assert!(result.is_err());
        registry
    }

    fn read(
        &self,
    ) -> std::result::Result<RwLockReadGuard<'_, BTreeMap<String, String>>, RegistryError> {
        self.entries.read().map_err(|_| RegistryError::Unavailable)
    }
}

/// Short, log-safe rendering of an input.
fn preview(input: &UserInput) -> String {
    match input {
        UserInput::Text(text) => {
            let head: String = text.chars().take(50).collect();
            format!("{}...", head)
        }
        UserInput::NonText { kind } => format!("<{}>", kind),
    }
}

/// # Load Responses File (`load_responses_file`)
///
/// Reads a flat TOML table of `trigger = "response"` pairs.
///
/// ```toml
/// "opening hours" = "We are open 9am to 5pm, Monday to Friday."
/// mortgage = "Our mortgage team can be reached on extension 4."
/// ```
fn load_responses_file(path: &Path) -> Result<BTreeMap<String, String>> {
    debug!("Reading responses file {}", path.display());
    if !path.is_file() {
        return Err(HelpdeskError::ResponsesFile {
            path: path.to_path_buf(),
            reason: "path does not exist or is not a regular file".into(),
        }
        .into());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read responses file: {}", path.display()))?;
    toml::from_str(&content).map_err(|e| {
        anyhow::Error::from(HelpdeskError::ResponsesFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::tempdir;

    const HELLO: &str = "Hi there! Welcome to Helpdesk support. How can I help you?";

    #[test]
    fn test_new_registry_is_seeded() {
        let registry = ResponseRegistry::new();
        let entries = registry.list();
        assert_eq!(entries.len(), BASELINE_RESPONSES.len());
        assert!(entries.contains_key("hello"));
        assert!(entries.contains_key("bye"));
        assert!(entries.contains_key("credit card"));
    }

    #[test]
    fn test_respond_known_inputs() {
        let registry = ResponseRegistry::new();
        for (trigger, response) in BASELINE_RESPONSES {
            assert_eq!(registry.respond(trigger), response);
        }
    }

    #[test]
    fn test_respond_is_case_insensitive_and_trims() {
        let registry = ResponseRegistry::new();
        assert_eq!(registry.respond("HELLO"), HELLO);
        assert_eq!(registry.respond("Hello"), HELLO);
        assert_eq!(registry.respond("hello"), HELLO);
        assert_eq!(registry.respond("  Hello \n"), HELLO);
        assert_eq!(
            registry.respond("CREDIT CARD"),
            registry.respond("credit card")
        );
    }

    #[test]
    fn test_respond_unknown_input_is_no_match() {
        let registry = ResponseRegistry::new();
        for text in ["xyz-unregistered", "random text", "help me", "HELLO WORLD", "!@#$%^&*()"] {
            assert_eq!(registry.respond(text), NO_MATCH_FALLBACK);
        }
    }

    #[test]
    fn test_respond_invalid_input_uses_distinct_fallback() {
        let registry = ResponseRegistry::new();
        assert_ne!(INVALID_INPUT_FALLBACK, NO_MATCH_FALLBACK);
        assert_eq!(registry.respond(""), INVALID_INPUT_FALLBACK);
        assert_eq!(registry.respond("   "), INVALID_INPUT_FALLBACK);
        assert_eq!(registry.respond("a".repeat(2000)), INVALID_INPUT_FALLBACK);
        assert_eq!(
            registry.respond("<script>alert(1)</script>"),
            INVALID_INPUT_FALLBACK
        );
    }

    #[test]
    fn test_respond_non_text_input() {
        let registry = ResponseRegistry::new();
        assert!(!registry.validate(&UserInput::from(json!(123))));
        assert_eq!(registry.respond(json!(123)), INVALID_INPUT_FALLBACK);
        assert_eq!(registry.respond(json!(null)), INVALID_INPUT_FALLBACK);
        assert_eq!(registry.respond(None::<&str>), INVALID_INPUT_FALLBACK);
    }

    #[test]
    fn test_respond_strips_separator_controls() {
        let registry = ResponseRegistry::new();
        assert_eq!(registry.respond("\u{1c}"), INVALID_INPUT_FALLBACK);
        assert_eq!(registry.respond("hello\u{1f}"), registry.respond("hello"));
        assert!(!registry.insert("\u{1d}", "R1"));
    }

    #[test]
    fn test_resolve_reports_outcomes() {
        let registry = ResponseRegistry::new();
        assert_eq!(
            registry.resolve("loan"),
            Ok(Outcome::Matched(
                "We offer personal, home, and business loans. Would you like interest rate details?"
                    .to_string()
            ))
        );
        assert_eq!(registry.resolve("mortgage"), Ok(Outcome::NoMatch));
        assert_eq!(registry.resolve("data:x"), Ok(Outcome::InvalidInput));
    }

    #[test]
    fn test_insert_then_respond() {
        let registry = ResponseRegistry::new();
        assert!(registry.insert("Test", "R1"));
        assert_eq!(registry.respond("TEST"), "R1");
        assert_eq!(registry.list().get("test").map(String::as_str), Some("R1"));
    }

    #[test]
    fn test_insert_normalizes_and_overwrites() {
        let registry = ResponseRegistry::new();
        assert!(registry.insert("  Opening Hours ", "9 to 5"));
        assert!(registry.list().contains_key("opening hours"));
        assert!(registry.insert("HELLO", "Replaced greeting"));
        assert_eq!(registry.respond("hello"), "Replaced greeting");
        assert_eq!(registry.list().len(), BASELINE_RESPONSES.len() + 1);
    }

    #[test]
    fn test_insert_rejects_invalid_arguments() {
        let registry = ResponseRegistry::new();
        let before = registry.list();
        assert!(!registry.insert("", "R1"));
        assert!(!registry.insert("   ", "R1"));
        assert!(!registry.insert(None::<&str>, "R1"));
        assert!(!registry.insert(json!(42), "R1"));
        assert!(!registry.insert("key", ""));
        assert_eq!(registry.list(), before);
    }

    #[test]
    fn test_list_returns_a_copy() {
        let registry = ResponseRegistry::new();
        let mut snapshot = registry.list();
        snapshot.insert("new_key".into(), "new_value".into());
        snapshot.remove("hello");
        let fresh = registry.list();
        assert!(!fresh.contains_key("new_key"));
        assert!(fresh.contains_key("hello"));
    }

    #[test]
    fn test_poisoned_table_is_contained() {
        let registry = ResponseRegistry::poisoned();
        assert_eq!(registry.resolve("hello"), Err(RegistryError::Unavailable));
        assert_eq!(registry.respond("hello"), INTERNAL_FAILURE_FALLBACK);
        // Invalid input is still classified before the table is touched.
        assert_eq!(registry.respond(""), INVALID_INPUT_FALLBACK);
        assert!(!registry.insert("late", "entry"));
        assert_eq!(
            registry.try_insert("late", "entry"),
            Err(RegistryError::Unavailable)
        );
        // Rejected arguments are still reported as rejections.
        assert_eq!(registry.try_insert("", "entry"), Ok(false));
        assert_eq!(registry.list().len(), BASELINE_RESPONSES.len());
    }

    #[test]
    fn test_try_insert_reports_stored_or_rejected() {
        let registry = ResponseRegistry::new();
        assert_eq!(registry.try_insert("Branch", "Main street"), Ok(true));
        assert_eq!(registry.try_insert("branch", ""), Ok(false));
        assert_eq!(registry.try_insert(json!(1), "x"), Ok(false));
        assert_eq!(registry.respond("BRANCH"), "Main street");
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let registry = Arc::new(ResponseRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.insert(format!("topic {}", i), "answer");
                    assert_eq!(registry.respond("hello"), HELLO);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.list().len(), BASELINE_RESPONSES.len() + 8);
    }

    #[test]
    fn test_from_config_layers_file_then_inline() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("responses.toml");
        fs::write(
            &file_path,
            r#"
                "Opening Hours" = "From file"
                mortgage = "Mortgage desk"
                blank = ""
            "#,
        )
        .unwrap();

        let mut entries = BTreeMap::new();
        entries.insert("opening hours".to_string(), "Inline wins".to_string());
        let config = ResponsesConfig {
            file: Some(file_path.to_string_lossy().to_string()),
            entries,
        };

        let registry = ResponseRegistry::from_config(&config).unwrap();
        assert_eq!(registry.respond("opening hours"), "Inline wins");
        assert_eq!(registry.respond("MORTGAGE"), "Mortgage desk");
        assert_eq!(registry.respond("blank"), NO_MATCH_FALLBACK);
        assert_eq!(registry.respond("hello"), HELLO);
    }

    #[test]
    fn test_from_config_missing_file_is_error() {
        let temp_dir = tempdir().unwrap();
        let config = ResponsesConfig {
            file: Some(temp_dir.path().join("absent.toml").to_string_lossy().to_string()),
            entries: BTreeMap::new(),
        };
        let err = ResponseRegistry::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("could not be loaded"));
    }

    #[test]
    fn test_from_config_rejects_nested_tables() {
        let temp_dir = tempdir().unwrap();
        let file_path = temp_dir.path().join("responses.toml");
        fs::write(&file_path, "[section]\nkey = \"value\"\n").unwrap();
        let config = ResponsesConfig {
            file: Some(file_path.to_string_lossy().to_string()),
            entries: BTreeMap::new(),
        };
        assert!(ResponseRegistry::from_config(&config).is_err());
    }
}
