use std::time::Duration;

use crate::{
    credentials::ProviderCredentials,
    environment_client::EnvironmentClient,
    error::ProviderError,
    google_maps_api::{GOOGLE_MAPS_API_URL, GoogleMapsClient},
    openweathermap_api::{OPENWEATHERMAP_API_URL, OpenWeatherMapClient},
    retry::RetryPolicy,
    travel_co2_api::{TRAVEL_CO2_API_URL, TravelCo2Client},
    waqi_api::{WAQI_API_URL, WaqiClient},
};

pub struct ClientParams {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct ProviderBaseUrls {
    pub google_maps: String,
    pub openweathermap: String,
    pub waqi: String,
    pub travel_co2: String,
}

impl Default for ProviderBaseUrls {
    fn default() -> Self {
        ProviderBaseUrls {
            google_maps: GOOGLE_MAPS_API_URL.to_string(),
            openweathermap: OPENWEATHERMAP_API_URL.to_string(),
            waqi: WAQI_API_URL.to_string(),
            travel_co2: TRAVEL_CO2_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Timeout of a single HTTP call, retries excluded
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Budget of the emissions lookup. It is tried once, the local model
    /// answers when it runs out.
    pub lookup_timeout: Duration,
    pub base_urls: ProviderBaseUrls,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        ProviderSettings {
            timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
            lookup_timeout: Duration::from_secs(5),
            base_urls: ProviderBaseUrls::default(),
        }
    }
}

/// Every external client the optimizer talks to, built from one set of
/// credentials.
pub struct ProviderClients {
    pub maps: GoogleMapsClient,
    pub environment: EnvironmentClient,
    pub emissions: TravelCo2Client,
}

impl ProviderClients {
    pub fn new(
        credentials: &ProviderCredentials,
        settings: &ProviderSettings,
    ) -> Result<Self, ProviderError> {
        let params = |api_key: &str, base_url: &str| ClientParams {
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: settings.timeout,
            retry: settings.retry,
        };

        Ok(ProviderClients {
            maps: GoogleMapsClient::new(params(
                &credentials.google_maps_api_key,
                &settings.base_urls.google_maps,
            ))?,
            environment: EnvironmentClient::new(
                OpenWeatherMapClient::new(params(
                    &credentials.openweathermap_api_key,
                    &settings.base_urls.openweathermap,
                ))?,
                WaqiClient::new(params(
                    &credentials.aqicn_api_key,
                    &settings.base_urls.waqi,
                ))?,
            ),
            emissions: TravelCo2Client::new(ClientParams {
                timeout: settings.lookup_timeout,
                retry: RetryPolicy::NONE,
                ..params(&credentials.rapidapi_key, &settings.base_urls.travel_co2)
            })?,
        })
    }
}
