use serde::Deserialize;

use crate::{
    clients::ClientParams,
    coordinate::Coordinate,
    error::ProviderError,
    http::{build_client, decode, read_body},
    weather::WeatherReading,
};

pub const OPENWEATHERMAP_API_URL: &str = "https://api.openweathermap.org/data/2.5";
const WEATHER_PATH: &str = "/weather";

#[derive(Deserialize)]
struct CurrentWeatherResponse {
    main: MainReadings,
    wind: WindReadings,
    rain: Option<RainReadings>,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct WindReadings {
    speed: f64,
}

#[derive(Deserialize)]
struct RainReadings {
    /// Rain volume over the last hour, in mm
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

pub struct OpenWeatherMapClient {
    params: ClientParams,
    client: reqwest::Client,
}

impl OpenWeatherMapClient {
    pub fn new(params: ClientParams) -> Result<Self, ProviderError> {
        let client = build_client(params.timeout)?;
        Ok(Self { params, client })
    }

    pub async fn current_weather(
        &self,
        coordinate: Coordinate,
    ) -> Result<WeatherReading, ProviderError> {
        let body = self
            .params
            .retry
            .run("OpenWeatherMapApi weather", || self.request_weather(coordinate))
            .await?;

        parse_weather(&body)
    }

    async fn request_weather(&self, coordinate: Coordinate) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(format!("{}{}", self.params.base_url, WEATHER_PATH))
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("appid", self.params.api_key.clone()),
                ("units", String::from("metric")),
            ])
            .send()
            .await?;

        read_body("OpenWeatherMapApi", response).await
    }
}

pub fn parse_weather(body: &str) -> Result<WeatherReading, ProviderError> {
    let response: CurrentWeatherResponse = decode(body)?;

    Ok(WeatherReading {
        temperature_c: response.main.temp,
        humidity_percent: response.main.humidity,
        wind_speed_ms: response.wind.speed,
        precipitation_mm: response
            .rain
            .and_then(|rain| rain.one_hour)
            .unwrap_or(0.0),
    })
}
