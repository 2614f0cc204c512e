//! Configuration management for vsmtpd
//!
//! Settings come from an optional config file followed by `VSMTPD_*`
//! environment variables. Every field has a default, so an empty
//! environment yields a working server on `127.0.0.1:2500`.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "vsmtpd";
const ENV_PREFIX: &str = "VSMTPD";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    /// IP address the listener binds to
    pub bind_address: String,

    /// Listener port
    pub port: u16,

    /// Name announced in the banner and replies. Defaults to the reverse-DNS
    /// name of the local endpoint.
    pub hostname: Option<String>,

    /// Maximum message size in bytes, advertised by EHLO
    pub size_limit: u64,

    /// Maximum inbound line length in bytes, CRLF included
    pub max_line_length: usize,

    /// Maximum concurrent sessions
    pub max_connections: usize,

    /// Look up endpoint hostnames in reverse DNS
    pub resolve_hostnames: bool,

    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 2500,
            hostname: None,
            size_limit: 25_000_000,
            max_line_length: 1000,
            max_connections: 100,
            resolve_hostnames: true,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load `vsmtpd.{toml,json,yaml,...}` from the working directory if
    /// present, with environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// Load an explicit config file, with environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.port == 0 {
            return Err(config::ConfigError::Message("port cannot be 0".into()));
        }

        if self.bind_address.is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.size_limit == 0 {
            return Err(config::ConfigError::Message(
                "size_limit must be greater than 0".into(),
            ));
        }

        // "." plus CRLF must fit
        if self.max_line_length < 3 {
            return Err(config::ConfigError::Message(
                "max_line_length must be at least 3".into(),
            ));
        }

        if self.max_connections == 0 {
            return Err(config::ConfigError::Message(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
