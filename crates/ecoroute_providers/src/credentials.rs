use std::fmt::Debug;

use thiserror::Error;

pub const GOOGLE_MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const AQICN_API_KEY_VAR: &str = "AQICN_API_KEY";
pub const OPENWEATHERMAP_API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";
pub const RAPIDAPI_KEY_VAR: &str = "RAPIDAPI_KEY";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

/// API keys of every external provider. Loaded once at startup and handed to
/// the clients, read-only afterwards.
#[derive(Clone)]
pub struct ProviderCredentials {
    pub google_maps_api_key: String,
    pub aqicn_api_key: String,
    pub openweathermap_api_key: String,
    pub rapidapi_key: String,
}

impl ProviderCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        Ok(ProviderCredentials {
            google_maps_api_key: require(GOOGLE_MAPS_API_KEY_VAR)?,
            aqicn_api_key: require(AQICN_API_KEY_VAR)?,
            openweathermap_api_key: require(OPENWEATHERMAP_API_KEY_VAR)?,
            rapidapi_key: require(RAPIDAPI_KEY_VAR)?,
        })
    }
}

impl Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("google_maps_api_key", &"<redacted>")
            .field("aqicn_api_key", &"<redacted>")
            .field("openweathermap_api_key", &"<redacted>")
            .field("rapidapi_key", &"<redacted>")
            .finish()
    }
}
