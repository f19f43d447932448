use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Current weather at a single coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReading {
    #[serde(rename = "temperature")]
    pub temperature_c: f64,

    #[serde(rename = "humidity")]
    pub humidity_percent: f64,

    #[serde(rename = "wind_speed")]
    pub wind_speed_ms: f64,

    #[serde(rename = "precipitation")]
    pub precipitation_mm: f64,
}
