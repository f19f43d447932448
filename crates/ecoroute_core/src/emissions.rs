use ecoroute_providers::{adapters::EmissionsLookup, route::Route};
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{environment::EnvironmentSnapshot, vehicle_type::VehicleType};

/// Relative increase of emissions per kg of cargo.
const WEIGHT_FACTOR_PER_KG: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EmissionsSource {
    /// Reported by the external trip emissions service
    Lookup,
    LocalModel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, JsonSchema)]
pub struct EmissionsEstimate {
    /// CO2-equivalent. Grams for the local model, the provider's unit for lookups.
    pub co2e: f64,
    pub source: EmissionsSource,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatorOptions {
    /// Scale the local model by weather and air quality at the origin.
    pub environmental_adjustment: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmissionsContext<'a> {
    pub package_weight_kg: f64,
    pub environment: Option<&'a EnvironmentSnapshot>,
}

/// Deterministic estimate from distance, vehicle, cargo weight and, when
/// given, the environment. Zero distance always yields zero.
pub fn local_emissions(
    route: &Route,
    vehicle: &VehicleType,
    package_weight_kg: f64,
    environment: Option<&EnvironmentSnapshot>,
) -> f64 {
    let distance_km = route.distance_km();
    let base_emissions = vehicle.emission_rate() * distance_km;
    let weight_factor = 1.0 + package_weight_kg.max(0.0) * WEIGHT_FACTOR_PER_KG;

    let environment_factor = environment
        .map(|environment| environment.weather_factor() * environment.air_quality_factor())
        .unwrap_or(1.0);

    let total_emissions = base_emissions * weight_factor * environment_factor;

    debug!(
        vehicle = %vehicle,
        distance_km,
        base_emissions,
        weight_factor,
        environment_factor,
        total_emissions,
        "Local emissions model"
    );

    total_emissions
}

pub struct EmissionsEstimator<L> {
    lookup: L,
    options: EstimatorOptions,
}

impl<L: EmissionsLookup> EmissionsEstimator<L> {
    pub fn new(lookup: L, options: EstimatorOptions) -> Self {
        Self { lookup, options }
    }

    pub fn options(&self) -> EstimatorOptions {
        self.options
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Asks the external lookup first for eligible vehicles. Any lookup
    /// failure is logged and answered by the local model.
    pub async fn estimate(
        &self,
        origin: &str,
        destination: &str,
        route: &Route,
        vehicle: &VehicleType,
        context: &EmissionsContext<'_>,
    ) -> EmissionsEstimate {
        let reported = self.lookup_trip(origin, destination, vehicle).await;
        self.estimate_with(reported, route, vehicle, context)
    }

    /// Trip emissions reported by the external lookup, `None` when the
    /// vehicle is not eligible or the lookup failed. The answer only depends
    /// on the places and the vehicle, so one call serves every route.
    pub async fn lookup_trip(
        &self,
        origin: &str,
        destination: &str,
        vehicle: &VehicleType,
    ) -> Option<f64> {
        if !vehicle.is_lookup_eligible() {
            return None;
        }

        match self
            .lookup
            .trip_emissions(origin, destination, vehicle.as_str())
            .await
        {
            Ok(co2e) if co2e.is_finite() && co2e >= 0.0 => Some(co2e),
            Ok(co2e) => {
                warn!(
                    "Emissions lookup returned an invalid value {} for {}, falling back to local model",
                    co2e, vehicle
                );
                None
            }
            Err(error) => {
                warn!(
                    "Emissions lookup failed for {} ({}), falling back to local model",
                    vehicle, error
                );
                None
            }
        }
    }

    /// Uses the reported lookup value when there is one, the local model
    /// otherwise.
    pub fn estimate_with(
        &self,
        reported: Option<f64>,
        route: &Route,
        vehicle: &VehicleType,
        context: &EmissionsContext<'_>,
    ) -> EmissionsEstimate {
        if let Some(co2e) = reported {
            return EmissionsEstimate {
                co2e,
                source: EmissionsSource::Lookup,
            };
        }

        let environment = context
            .environment
            .filter(|_| self.options.environmental_adjustment);

        EmissionsEstimate {
            co2e: local_emissions(route, vehicle, context.package_weight_kg, environment),
            source: EmissionsSource::LocalModel,
        }
    }
}
