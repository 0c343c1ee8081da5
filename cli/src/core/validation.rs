//! # Helpdesk Input Validation
//!
//! File: cli/src/core/validation.rs
//!
//! ## Overview
//!
//! Sanity checks applied to every user message before it reaches the
//! response table. Validation only accepts or rejects; it never rewrites the
//! message. The pattern list is a fixed compatibility denylist matched as
//! plain lowercase substrings.
//!
//! Messages arrive as a `UserInput`, which makes the "was this even a string"
//! check explicit: the HTTP API can receive numbers, booleans or objects in
//! the `message` field, and those are carried through as `NonText` so they
//! can be rejected here instead of failing earlier during deserialization.
//!
use serde_json::Value;
use tracing::warn;

/// Longest accepted message, counted in characters before trimming.
pub const MAX_INPUT_CHARS: usize = 1000;

/// Substrings that cause a message to be rejected, matched case-insensitively.
pub const DENYLISTED_PATTERNS: [&str; 4] = ["<script", "javascript:", "data:", "vbscript:"];

/// A single incoming user message, discriminated by whether it is text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
    Text(String),
    /// Any non-string value. `kind` names what arrived, for logging.
    NonText { kind: &'static str },
}

impl UserInput {
    /// The message text, if this input is a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            UserInput::Text(text) => Some(text),
            UserInput::NonText { .. } => None,
        }
    }
}

impl From<&str> for UserInput {
    fn from(text: &str) -> Self {
        UserInput::Text(text.to_string())
    }
}

impl From<String> for UserInput {
    fn from(text: String) -> Self {
        UserInput::Text(text)
    }
}

impl From<Value> for UserInput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => UserInput::Text(text),
            Value::Null => UserInput::NonText { kind: "null" },
            Value::Bool(_) => UserInput::NonText { kind: "boolean" },
            Value::Number(_) => UserInput::NonText { kind: "number" },
            Value::Array(_) => UserInput::NonText { kind: "array" },
            Value::Object(_) => UserInput::NonText { kind: "object" },
        }
    }
}

impl<T: Into<UserInput>> From<Option<T>> for UserInput {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(inner) => inner.into(),
            None => UserInput::NonText { kind: "none" },
        }
    }
}

/// Returns `true` when `input` is acceptable for lookup.
///
/// Rejects non-text input, blank text, text longer than
/// [`MAX_INPUT_CHARS`] characters and text containing any of
/// [`DENYLISTED_PATTERNS`]. Total over every input; never panics.
pub fn validate(input: &UserInput) -> bool {
    let text = match input {
        UserInput::Text(text) => text,
        UserInput::NonText { .. } => return false,
    };

    if trim_blank(text).is_empty() || text.chars().count() > MAX_INPUT_CHARS {
        return false;
    }

    let lowered = text.to_lowercase();
    if let Some(pattern) = DENYLISTED_PATTERNS
        .iter()
        .find(|pattern| lowered.contains(*pattern))
    {
        warn!("Potentially dangerous input detected: {}", pattern);
        return false;
    }

    true
}

/// Lowercases and trims a trigger or message for table lookup.
pub fn normalize(text: &str) -> String {
    trim_blank(text).to_lowercase()
}

/// Strips Unicode whitespace plus the ASCII separators U+001C to U+001F,
/// which `str::trim` keeps.
fn trim_blank(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}
