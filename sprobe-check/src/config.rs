//! Configuration for the check binary.
//!
//! Values come from command-line flags and an optional TOML file. Flags take
//! precedence over the file, and the file over built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use sprobe_client::{ClientConfig, DEFAULT_HOST, DEFAULT_PORT};
use thiserror::Error;

/// Default tracing filter. Logs go to stderr, so stdout stays one line.
pub const DEFAULT_LOG_LEVEL: &str = "off";

/// Command-line arguments for the sentinel check
#[derive(Parser, Debug)]
#[command(name = "check_sentinel")]
#[command(version)]
#[command(about = "Health check for a Redis Sentinel process", long_about = None)]
pub struct CliArgs {
    /// Sentinel host name or address [default: 127.0.0.1]
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Sentinel port [default: 26379]
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Connect/read/write timeout in seconds (OS default when unset)
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log filter for stderr output (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub connection: ConnectionSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct ConnectionSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct LoggingSection {
    pub level: Option<String>,
}

/// Final resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub timeout: Option<Duration>,
    pub log_level: String,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{}'", .path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("port must be between 1 and 65535")]
    InvalidPort,
    #[error("timeout must be at least one second")]
    InvalidTimeout,
}

impl TomlConfig {
    /// Reads and parses a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Config {
    /// Resolves parsed flags, loading the TOML file they name, if any.
    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        Self::merge(cli, file)
    }

    /// Merges flags over file values over defaults.
    pub fn merge(cli: CliArgs, file: TomlConfig) -> Result<Self, ConfigError> {
        let port = cli.port.or(file.connection.port).unwrap_or(DEFAULT_PORT);
        if port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        let timeout = match cli.timeout.or(file.connection.timeout_secs) {
            Some(0) => return Err(ConfigError::InvalidTimeout),
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        Ok(Config {
            host: cli
                .host
                .or(file.connection.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            timeout,
            log_level: cli
                .log_level
                .or(file.logging.level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// Client settings; one timeout covers connect, read and write.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            host: self.host.clone(),
            port: self.port,
            connect_timeout: self.timeout,
            read_timeout: self.timeout,
            write_timeout: self.timeout,
        }
    }
}
