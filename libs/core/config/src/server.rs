use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Listen port used when `TODO_PORT` is unset
pub const DEFAULT_PORT: u16 = 7540;

/// Server configuration for the HTTP API
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables:
    /// - TODO_HOST: defaults to 0.0.0.0 (all interfaces)
    /// - TODO_PORT: defaults to 7540
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("TODO_HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_parse("TODO_PORT", &DEFAULT_PORT.to_string())?;

        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: DEFAULT_PORT,
        }
    }
}
