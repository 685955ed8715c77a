//! Server configuration
//!
//! Defaults, an optional `config.toml`, and `RILL_FTP_*` environment
//! overrides, in that order of precedence.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// IPv4 address for the control listener.
    pub bind_address: String,

    /// Control connection port; 0 binds an ephemeral port.
    pub control_port: u16,

    /// Initial working directory for sessions. Defaults to the server
    /// process working directory at startup.
    pub root_dir: Option<String>,

    /// Maximum accepted control command line, in bytes.
    pub max_command_length: usize,

    /// How long to wait for a data connection to be established.
    pub data_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            control_port: 8000,
            root_dir: None,
            max_command_length: 512,
            data_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Load configuration, layering an optional config.toml and environment
    /// overrides on top of the defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("RILL_FTP").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.bind_address.parse::<Ipv4Addr>().is_err() {
            return Err(config::ConfigError::Message(format!(
                "bind_address must be an IPv4 address, got {:?}",
                self.bind_address
            )));
        }
        if self.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Bind address and control port as a socket address string.
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    /// Data-channel establishment timeout as a Duration.
    pub fn data_timeout(&self) -> Duration {
        Duration::from_secs(self.data_timeout_secs)
    }

    /// The initial session working directory, resolved to an absolute path.
    pub fn initial_dir(&self) -> std::io::Result<PathBuf> {
        match &self.root_dir {
            Some(dir) => PathBuf::from(dir).canonicalize(),
            None => std::env::current_dir(),
        }
    }
}
