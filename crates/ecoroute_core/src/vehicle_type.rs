use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Emission rate applied to vehicle types without a dedicated entry, in g CO2/km.
pub const DEFAULT_EMISSION_RATE: f64 = 150.0;

/// Vehicle used for a delivery. Unknown names are kept in `Other` and use the
/// default emission rate instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleType {
    Car,
    Truck,
    Van,
    Bike,
    Flying,
    PublicTransport,
    Electric,
    Other(String),
}

impl VehicleType {
    /// Base emission rate in g CO2 per km.
    pub fn emission_rate(&self) -> f64 {
        match self {
            VehicleType::Car => 120.0,
            VehicleType::Truck => 300.0,
            VehicleType::Van => 200.0,
            VehicleType::Bike => 0.0,
            VehicleType::Flying => 250.0,
            VehicleType::PublicTransport => 50.0,
            VehicleType::Electric => 30.0,
            VehicleType::Other(_) => DEFAULT_EMISSION_RATE,
        }
    }

    /// Whether the external trip emissions lookup knows this transport type.
    pub fn is_lookup_eligible(&self) -> bool {
        matches!(
            self,
            VehicleType::Car | VehicleType::Flying | VehicleType::PublicTransport
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Truck => "truck",
            VehicleType::Van => "van",
            VehicleType::Bike => "bike",
            VehicleType::Flying => "flying",
            VehicleType::PublicTransport => "public-transport",
            VehicleType::Electric => "electric",
            VehicleType::Other(name) => name,
        }
    }
}

impl From<&str> for VehicleType {
    fn from(value: &str) -> Self {
        match value {
            "car" => VehicleType::Car,
            "truck" => VehicleType::Truck,
            "van" => VehicleType::Van,
            "bike" => VehicleType::Bike,
            "flying" => VehicleType::Flying,
            "public-transport" => VehicleType::PublicTransport,
            "electric" => VehicleType::Electric,
            other => VehicleType::Other(other.to_owned()),
        }
    }
}

impl From<String> for VehicleType {
    fn from(value: String) -> Self {
        VehicleType::from(value.as_str())
    }
}

impl From<VehicleType> for String {
    fn from(value: VehicleType) -> Self {
        value.as_str().to_owned()
    }
}

impl FromStr for VehicleType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(VehicleType::from(s))
    }
}

impl Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
