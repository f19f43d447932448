use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One candidate path between two places, as returned by the route provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Route {
    /// Distance in meters
    #[serde(rename = "distance")]
    pub distance_meters: u64,

    /// Travel time in seconds
    #[serde(rename = "duration")]
    pub duration_seconds: u64,

    /// Encoded polyline of the whole route
    #[serde(rename = "polyline")]
    pub encoded_path: String,

    /// Turn-by-turn steps, kept in the provider's own format
    pub steps: Vec<serde_json::Value>,
}

impl Route {
    pub fn distance_km(&self) -> f64 {
        self.distance_meters as f64 / 1000.0
    }
}
