use serde::Deserialize;
use serde_json::Value;

use crate::{
    clients::ClientParams,
    coordinate::Coordinate,
    error::ProviderError,
    http::{build_client, decode, read_body},
};

pub const WAQI_API_URL: &str = "https://api.waqi.info";

#[derive(Deserialize)]
struct FeedResponse {
    status: String,
    data: Value,
}

/// Air quality index lookups against the World Air Quality Index project.
pub struct WaqiClient {
    params: ClientParams,
    client: reqwest::Client,
}

impl WaqiClient {
    pub fn new(params: ClientParams) -> Result<Self, ProviderError> {
        let client = build_client(params.timeout)?;
        Ok(Self { params, client })
    }

    pub async fn air_quality_index(&self, coordinate: Coordinate) -> Result<i32, ProviderError> {
        let body = self
            .params
            .retry
            .run("WaqiApi feed", || self.request_feed(coordinate))
            .await?;

        parse_air_quality(&body)
    }

    async fn request_feed(&self, coordinate: Coordinate) -> Result<String, ProviderError> {
        let url = format!(
            "{}/feed/geo:{};{}/",
            self.params.base_url, coordinate.latitude, coordinate.longitude
        );

        let response = self
            .client
            .get(url)
            .query(&[("token", self.params.api_key.as_str())])
            .send()
            .await?;

        read_body("WaqiApi", response).await
    }
}

pub fn parse_air_quality(body: &str) -> Result<i32, ProviderError> {
    let response: FeedResponse = decode(body)?;

    if response.status != "ok" {
        return Err(ProviderError::Status {
            status: response.status,
            message: response.data.as_str().unwrap_or_default().to_owned(),
        });
    }

    // Stations without a current reading report "-"
    match response.data.get("aqi") {
        Some(Value::Number(aqi)) => aqi
            .as_i64()
            .or_else(|| aqi.as_f64().map(|aqi| aqi.round() as i64))
            .and_then(|aqi| i32::try_from(aqi).ok())
            .ok_or(ProviderError::MissingField("data.aqi")),
        Some(Value::String(aqi)) => aqi
            .trim()
            .parse::<i32>()
            .map_err(|_| ProviderError::MissingField("data.aqi")),
        _ => Err(ProviderError::MissingField("data.aqi")),
    }
}
