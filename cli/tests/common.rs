//! # Helpdesk CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test runs
//! the compiled `helpdesk` binary with an explicit `--config` file inside a
//! temporary directory, so neither a user config nor a `.helpdesk.toml` on
//! the machine running the tests can change the results.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// # Get Helpdesk Command (`helpdesk_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `helpdesk` binary.
///
/// ## Panics
/// Panics if the `helpdesk` binary cannot be found via `Command::cargo_bin`.
pub fn helpdesk_cmd() -> Command {
    Command::cargo_bin("helpdesk").expect("Failed to find helpdesk binary for testing")
}

/// A temporary working directory holding `helpdesk.toml` with `contents`.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    pub fn new(contents: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("helpdesk.toml"), contents).expect("Failed to write config");
        Self { dir }
    }

    /// A `helpdesk` command running in this directory with this config.
    pub fn cmd(&self) -> Command {
        let mut cmd = helpdesk_cmd();
        cmd.current_dir(self.dir.path())
            .arg("--config")
            .arg(self.dir.path().join("helpdesk.toml"));
        cmd
    }
}
