use crate::{
    adapters::EnvironmentProvider, coordinate::Coordinate, error::ProviderError,
    openweathermap_api::OpenWeatherMapClient, waqi_api::WaqiClient, weather::WeatherReading,
};

/// Weather and air quality, each from its own provider.
pub struct EnvironmentClient {
    weather_client: OpenWeatherMapClient,
    air_quality_client: WaqiClient,
}

impl EnvironmentClient {
    pub fn new(weather_client: OpenWeatherMapClient, air_quality_client: WaqiClient) -> Self {
        Self {
            weather_client,
            air_quality_client,
        }
    }
}

impl EnvironmentProvider for EnvironmentClient {
    async fn weather(&self, coordinate: Coordinate) -> Result<WeatherReading, ProviderError> {
        self.weather_client.current_weather(coordinate).await
    }

    async fn air_quality(&self, coordinate: Coordinate) -> Result<i32, ProviderError> {
        self.air_quality_client.air_quality_index(coordinate).await
    }
}
