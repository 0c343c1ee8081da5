//! # Helpdesk Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module implements the configuration system for Helpdesk, handling
//! loading, merging, validation, and access to configuration data. It
//! combines defaults, user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file passed with `--config` (replaces the search below)
//! 2. Project-specific `.helpdesk.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/helpdesk/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [chat]
//! exit_phrases = ["bye", "exit", "quit", "goodbye"]
//!
//! [responses]
//! file = "~/.config/helpdesk/responses.toml"
//!
//! [responses.entries]
//! "opening hours" = "We are open 9am to 5pm, Monday to Friday."
//! ```
//!
//! Loading and using configuration:
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! let registry = ResponseRegistry::from_config(&cfg.responses)?;
//! ```
//!
use crate::core::error::{HelpdeskError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub responses: ResponsesConfig,
}

/// Settings for `helpdesk srv`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// First port to try.
    #[serde(default = "default_port")]
    pub port: u16,
    /// How many consecutive ports to try before giving up.
    #[serde(default = "default_max_port_attempts")]
    pub max_port_attempts: u8,
    /// Send permissive CORS headers.
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

/// Settings for the terminal chat loop.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Phrases that end a chat session, compared after lowercasing and trimming.
    #[serde(default = "default_exit_phrases")]
    pub exit_phrases: Vec<String>,
    /// Printed when a session ends without a table reply for the exit phrase.
    #[serde(default = "default_farewell")]
    pub farewell: String,
}

/// Extra entries to seed the response registry with.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResponsesConfig {
    /// Optional flat TOML file of `trigger = "response"` pairs (can use ~).
    pub file: Option<String>,
    /// Inline entries, applied after the file.
    #[serde(default)]
    pub entries: BTreeMap<String, String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_port_attempts: default_max_port_attempts(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            exit_phrases: default_exit_phrases(),
            farewell: default_farewell(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
fn default_port() -> u16 {
    5000
}
fn default_max_port_attempts() -> u8 {
    10
}
fn default_enable_cors() -> bool {
    true
}
fn default_exit_phrases() -> Vec<String> {
    vec!["bye".to_string(), "exit".to_string(), "quit".to_string()]
}
fn default_farewell() -> String {
    "Goodbye! Thanks for using Helpdesk.".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".helpdesk.toml";

/// # Load Configuration (`load_config`)
///
/// Loads the effective configuration. With `explicit` set, only that file is
/// read; otherwise the user and project files are merged over the defaults.
/// Paths are expanded and the result is validated before it is returned.
///
/// ## Errors
///
/// Returns an error if a config file cannot be read or parsed, or if the
/// merged configuration fails validation.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    expand_config_paths(&mut config).context("Failed to expand paths in configuration")?;
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "Helpdesk", "helpdesk") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.helpdesk.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.helpdesk.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Reads one config file. A relative `responses.file` is taken relative to
/// the directory holding the config file.
fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;

    if let (Some(file), Some(parent)) = (config.responses.file.as_mut(), path.parent()) {
        if !file.starts_with('~') && Path::new(file.as_str()).is_relative() {
            *file = parent.join(file.as_str()).to_string_lossy().into_owned();
            debug!("Resolved relative responses file to: {}", file);
        }
    }
    Ok(config)
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();

    merged.server.host = if project_cfg.server.host != default_host() {
        project_cfg.server.host
    } else {
        user.server.host
    };
    merged.server.port = if project_cfg.server.port != default_port() {
        project_cfg.server.port
    } else {
        user.server.port
    };
    merged.server.max_port_attempts =
        if project_cfg.server.max_port_attempts != default_max_port_attempts() {
            project_cfg.server.max_port_attempts
        } else {
            user.server.max_port_attempts
        };
    merged.server.enable_cors = project_cfg.server.enable_cors && user.server.enable_cors;

    merged.chat.exit_phrases = if project_cfg.chat.exit_phrases != default_exit_phrases() {
        project_cfg.chat.exit_phrases
    } else {
        user.chat.exit_phrases
    };
    merged.chat.farewell = if project_cfg.chat.farewell != default_farewell() {
        project_cfg.chat.farewell
    } else {
        user.chat.farewell
    };

    merged.responses.file = project_cfg.responses.file.or(user.responses.file);
    merged.responses.entries = user.responses.entries;
    merged.responses.entries.extend(project_cfg.responses.entries);
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(file) = config.responses.file.as_mut() {
        *file = shellexpand::tilde(file.as_str()).into_owned();
        debug!("Expanded responses file path: {}", file);
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    if config.chat.exit_phrases.is_empty() {
        return Err(anyhow!(HelpdeskError::Config(
            "At least one chat exit phrase must be configured.".to_string()
        )));
    }
    if config.chat.exit_phrases.iter().any(|p| p.trim().is_empty()) {
        return Err(anyhow!(HelpdeskError::Config(
            "Chat exit phrases cannot be blank.".to_string()
        )));
    }
    if config.server.max_port_attempts == 0 {
        return Err(anyhow!(HelpdeskError::Config(
            "server.max_port_attempts must be at least 1.".to_string()
        )));
    }
    if let Some(file) = &config.responses.file {
        let path = PathBuf::from(file);
        if !path.exists() {
            return Err(anyhow!(HelpdeskError::Config(format!(
                "Configured responses file '{}' does not exist.",
                path.display()
            ))));
        } else if !path.is_file() {
            return Err(anyhow!(HelpdeskError::Config(format!(
                "Configured responses path '{}' exists but is not a file.",
                path.display()
            ))));
        }
    }
    if let Some(trigger) = config
        .responses
        .entries
        .keys()
        .find(|trigger| trigger.trim().is_empty())
    {
        return Err(anyhow!(HelpdeskError::Config(format!(
            "Response entry trigger '{}' is blank.",
            trigger
        ))));
    }
    info!("Configuration validation successful.");
    Ok(())
}
