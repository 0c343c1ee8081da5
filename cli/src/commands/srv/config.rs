//! # Helpdesk HTTP Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Resolves the settings `helpdesk srv` runs with. Values come from:
//! 1. Command-line arguments or the `HOST`/`PORT` environment variables (highest priority)
//! 2. The `[server]` section of the loaded configuration
//! 3. Default values (lowest priority, via `ServerSection::default`)
//!
//! ## Examples
//!
//! ```bash
//! helpdesk srv --port 9000 --host 0.0.0.0
//! PORT=9000 helpdesk srv --no-cors
//! ```
//!
use crate::core::config::ServerSection;
use clap::Parser;
use std::net::IpAddr;

/// # Server Command Arguments (`SrvArgs`)
///
/// Flags left unset fall back to the `[server]` section of the config file.
#[derive(Parser, Debug, Default)]
pub struct SrvArgs {
    /// Network port to listen on (default 5000).
    #[arg(long, short, env = "PORT")]
    pub port: Option<u16>,

    /// IP address to bind. Use `0.0.0.0` to accept connections on every interface.
    #[arg(long, env = "HOST")]
    pub host: Option<IpAddr>,

    /// Disable Cross-Origin Resource Sharing headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Fail instead of trying the next port when the requested one is taken.
    #[arg(long)]
    pub strict_port: bool,
}

/// # Effective Server Configuration (`ServerConfig`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
    /// Consecutive ports to try, starting at `port`. Always at least 1.
    pub max_port_attempts: u8,
}

impl ServerConfig {
    /// # Merge Arguments Over File Settings (`resolve`)
    ///
    /// Explicit arguments win; everything else comes from `section`.
    /// `--no-cors` can only turn CORS off, and `--strict-port` pins the
    /// attempt count to one.
    pub fn resolve(args: &SrvArgs, section: &ServerSection) -> Self {
        Self {
            port: args.port.unwrap_or(section.port),
            host: args.host.unwrap_or(section.host),
            enable_cors: section.enable_cors && !args.no_cors,
            max_port_attempts: if args.strict_port {
                1
            } else {
                section.max_port_attempts.max(1)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_resolve_uses_section_when_args_unset() {
        let section = ServerSection {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8081,
            max_port_attempts: 3,
            enable_cors: true,
        };
        let config = ServerConfig::resolve(&SrvArgs::default(), &section);
        assert_eq!(
            config,
            ServerConfig {
                port: 8081,
                host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                enable_cors: true,
                max_port_attempts: 3,
            }
        );
    }

    #[test]
    fn test_resolve_args_take_precedence() {
        let args = SrvArgs {
            port: Some(9000),
            host: Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            no_cors: true,
            strict_port: true,
        };
        let section = ServerSection {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8081,
            ..Default::default()
        };
        let config = ServerConfig::resolve(&args, &section);
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(!config.enable_cors);
        assert_eq!(config.max_port_attempts, 1);
    }

    #[test]
    fn test_resolve_defaults() {
        let config = ServerConfig::resolve(&SrvArgs::default(), &ServerSection::default());
        assert_eq!(config.port, 5000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert!(config.enable_cors);
        assert_eq!(config.max_port_attempts, 10);
    }

    #[test]
    fn test_file_cors_off_is_not_reenabled() {
        let section = ServerSection {
            enable_cors: false,
            ..Default::default()
        };
        let config = ServerConfig::resolve(&SrvArgs::default(), &section);
        assert!(!config.enable_cors);
    }
}
