use std::time::Duration;

use ecoroute_providers::{
    clients::ProviderSettings,
    credentials::{ConfigError, ProviderCredentials},
    retry::RetryPolicy,
};
use jiff::SpanRelativeTo;

use crate::emissions::EstimatorOptions;

pub const REQUEST_DEADLINE_VAR: &str = "ECOROUTE_REQUEST_DEADLINE";
pub const ENVIRONMENTAL_ADJUSTMENT_VAR: &str = "ECOROUTE_ENVIRONMENTAL_ADJUSTMENT";
pub const PROVIDER_TIMEOUT_VAR: &str = "ECOROUTE_PROVIDER_TIMEOUT";
pub const PROVIDER_MAX_ATTEMPTS_VAR: &str = "ECOROUTE_PROVIDER_MAX_ATTEMPTS";
pub const LOOKUP_TIMEOUT_VAR: &str = "ECOROUTE_LOOKUP_TIMEOUT";

const DEFAULT_REQUEST_DEADLINE: Duration = Duration::from_secs(30);

/// Process wide configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: ProviderCredentials,
    pub providers: ProviderSettings,
    pub estimator: EstimatorOptions,
    /// Upper bound for a whole optimization, provider calls included
    pub request_deadline: Duration,
}

impl Settings {
    /// Loads `.env.local` and `.env` when present, then reads the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::from_filename("./.env.local").ok();
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = ProviderCredentials::from_lookup(&lookup)?;

        let mut providers = ProviderSettings::default();
        if let Some(timeout) = lookup(PROVIDER_TIMEOUT_VAR) {
            providers.timeout = parse_duration(&timeout).map_err(|message| {
                ConfigError::InvalidValue {
                    name: PROVIDER_TIMEOUT_VAR,
                    message,
                }
            })?;
        }
        if let Some(attempts) = lookup(PROVIDER_MAX_ATTEMPTS_VAR) {
            providers.retry = RetryPolicy {
                max_attempts: parse_attempts(&attempts).map_err(|message| {
                    ConfigError::InvalidValue {
                        name: PROVIDER_MAX_ATTEMPTS_VAR,
                        message,
                    }
                })?,
                ..providers.retry
            };
        }

        if let Some(timeout) = lookup(LOOKUP_TIMEOUT_VAR) {
            providers.lookup_timeout = parse_duration(&timeout).map_err(|message| {
                ConfigError::InvalidValue {
                    name: LOOKUP_TIMEOUT_VAR,
                    message,
                }
            })?;
        }

        let request_deadline = match lookup(REQUEST_DEADLINE_VAR) {
            Some(value) => parse_duration(&value).map_err(|message| ConfigError::InvalidValue {
                name: REQUEST_DEADLINE_VAR,
                message,
            })?,
            None => DEFAULT_REQUEST_DEADLINE,
        };

        // The lookup must give up while there is still time left for the
        // local model to answer.
        providers.lookup_timeout = providers.lookup_timeout.min(request_deadline / 2);

        let environmental_adjustment = match lookup(ENVIRONMENTAL_ADJUSTMENT_VAR) {
            Some(value) => parse_bool(&value).map_err(|message| ConfigError::InvalidValue {
                name: ENVIRONMENTAL_ADJUSTMENT_VAR,
                message,
            })?,
            None => false,
        };

        Ok(Settings {
            credentials,
            providers,
            estimator: EstimatorOptions {
                environmental_adjustment,
            },
            request_deadline,
        })
    }
}

/// Accepts ISO 8601 ("PT30S"), friendly ("30s", "1m 30s") or plain seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();

    let duration = if let Ok(duration) = input.parse::<jiff::SignedDuration>() {
        duration
    } else if let Ok(duration) = input
        .parse::<jiff::Span>()
        .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
    {
        duration
    } else if let Ok(seconds) = input.parse::<u64>() {
        jiff::SignedDuration::from_secs(seconds as i64)
    } else {
        return Err(format!("Invalid duration {:?}", input));
    };

    if duration.is_zero() || duration.is_negative() {
        return Err(format!("Duration {:?} must be positive", input));
    }

    Duration::try_from(duration).map_err(|error| error.to_string())
}

fn parse_bool(input: &str) -> Result<bool, String> {
    match input.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("Invalid boolean {:?}", other)),
    }
}

fn parse_attempts(input: &str) -> Result<u32, String> {
    match input.trim().parse::<u32>() {
        Ok(0) => Err(String::from("At least one attempt is required")),
        Ok(attempts) => Ok(attempts),
        Err(error) => Err(error.to_string()),
    }
}
