use ecoroute_providers::weather::WeatherReading;
use schemars::JsonSchema;
use serde::Serialize;

/// Temperature at which weather does not change emissions, in °C.
const REFERENCE_TEMPERATURE_C: f64 = 20.0;
/// AQI at which air quality does not change emissions.
const REFERENCE_AIR_QUALITY_INDEX: f64 = 50.0;

const TEMPERATURE_COEFFICIENT: f64 = 0.01;
const HUMIDITY_COEFFICIENT: f64 = 0.001;
const WIND_SPEED_COEFFICIENT: f64 = 0.005;
const AIR_QUALITY_COEFFICIENT: f64 = 0.002;

/// Weather and air quality at the origin, captured once per optimization and
/// assumed uniform along every candidate route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct EnvironmentSnapshot {
    pub weather: WeatherReading,
    pub air_quality_index: i32,
}

impl EnvironmentSnapshot {
    /// Negative indices are clamped to 0.
    pub fn new(weather: WeatherReading, air_quality_index: i32) -> Self {
        EnvironmentSnapshot {
            weather,
            air_quality_index: air_quality_index.max(0),
        }
    }

    pub fn weather_factor(&self) -> f64 {
        let factor = 1.0
            + (self.weather.temperature_c - REFERENCE_TEMPERATURE_C) * TEMPERATURE_COEFFICIENT
            + self.weather.humidity_percent * HUMIDITY_COEFFICIENT
            + self.weather.wind_speed_ms * WIND_SPEED_COEFFICIENT;

        factor.max(0.0)
    }

    pub fn air_quality_factor(&self) -> f64 {
        1.0 + (self.air_quality_index as f64 - REFERENCE_AIR_QUALITY_INDEX) * AIR_QUALITY_COEFFICIENT
    }
}
