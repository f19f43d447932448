use std::net::SocketAddr;

use ecoroute_providers::credentials::ConfigError;

pub const BIND_ADDR_VAR: &str = "ECOROUTE_BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

pub struct ApiConfig {
    pub bind_addr: SocketAddr,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let bind_addr = value
            .trim()
            .parse()
            .map_err(|error: std::net::AddrParseError| ConfigError::InvalidValue {
                name: BIND_ADDR_VAR,
                message: error.to_string(),
            })?;

        Ok(ApiConfig { bind_addr })
    }
}
