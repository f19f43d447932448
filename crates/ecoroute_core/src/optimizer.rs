use std::sync::Arc;

use ecoroute_providers::{
    adapters::{EmissionsLookup, EnvironmentProvider, Geocoder, RouteProvider},
    clients::ProviderClients,
    environment_client::EnvironmentClient,
    error::ProviderError,
    google_maps_api::GoogleMapsClient,
    route::Route,
    travel_co2_api::TravelCo2Client,
    weather::WeatherReading,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    emissions::{
        EmissionsContext, EmissionsEstimate, EmissionsEstimator, EmissionsSource,
        EstimatorOptions,
    },
    environment::EnvironmentSnapshot,
    route_selector::{RouteComparison, SelectionError, select_best},
    vehicle_type::VehicleType,
};

#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("No routes found between {start:?} and {end:?}")]
    NoRoutesFound { start: String, end: String },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct OptimizeRouteRequest {
    pub start: String,
    pub end: String,

    /// One of car, truck, van, bike, flying, public-transport or electric.
    /// Other values are accepted and use the default emission rate.
    #[schemars(with = "String")]
    pub vehicle_type: VehicleType,

    /// Cargo weight in kg, defaults to 0
    #[serde(default)]
    pub package_weight: Option<f64>,
}

impl OptimizeRouteRequest {
    pub fn validate(&self) -> Result<f64, OptimizeError> {
        if self.start.trim().is_empty() {
            return Err(OptimizeError::InvalidInput(String::from(
                "Field 'start' must not be empty",
            )));
        }

        if self.end.trim().is_empty() {
            return Err(OptimizeError::InvalidInput(String::from(
                "Field 'end' must not be empty",
            )));
        }

        match self.package_weight {
            None => Ok(0.0),
            Some(weight) if weight.is_finite() && weight >= 0.0 => Ok(weight),
            Some(weight) => Err(OptimizeError::InvalidInput(format!(
                "Field 'package_weight' must be a non-negative number, got {}",
                weight
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AlternativeRouteEmissions {
    pub route: Route,
    pub emissions: f64,
    pub emissions_source: EmissionsSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct OptimizationResult {
    pub route: RouteComparison,
    pub emissions: f64,
    pub emissions_source: EmissionsSource,
    pub alternative_routes: Vec<AlternativeRouteEmissions>,
    pub weather: WeatherReading,
    pub air_quality: i32,
}

/// Sequences the providers, the route selection and the emissions estimates
/// into one route optimization.
pub struct Optimizer<R, G, E, L> {
    route_provider: R,
    geocoder: G,
    environment: E,
    estimator: EmissionsEstimator<L>,
}

pub type ProviderOptimizer = Optimizer<
    Arc<GoogleMapsClient>,
    Arc<GoogleMapsClient>,
    EnvironmentClient,
    TravelCo2Client,
>;

impl ProviderOptimizer {
    pub fn from_clients(clients: ProviderClients, options: EstimatorOptions) -> Self {
        let maps = Arc::new(clients.maps);

        Optimizer::new(
            maps.clone(),
            maps,
            clients.environment,
            EmissionsEstimator::new(clients.emissions, options),
        )
    }
}

impl<R, G, E, L> Optimizer<R, G, E, L>
where
    R: RouteProvider,
    G: Geocoder,
    E: EnvironmentProvider,
    L: EmissionsLookup,
{
    pub fn new(
        route_provider: R,
        geocoder: G,
        environment: E,
        estimator: EmissionsEstimator<L>,
    ) -> Self {
        Self {
            route_provider,
            geocoder,
            environment,
            estimator,
        }
    }

    #[instrument(
        skip_all,
        fields(start = %request.start, end = %request.end, vehicle_type = %request.vehicle_type)
    )]
    pub async fn optimize_route(
        &self,
        request: &OptimizeRouteRequest,
    ) -> Result<OptimizationResult, OptimizeError> {
        let package_weight_kg = request.validate()?;

        let (routes, origin) = tokio::join!(
            self.route_provider.fetch_routes(&request.start, &request.end),
            self.geocoder.geocode(&request.start),
        );

        let routes = routes?;
        if routes.is_empty() {
            return Err(OptimizeError::NoRoutesFound {
                start: request.start.clone(),
                end: request.end.clone(),
            });
        }

        let comparison = select_best(routes)?;
        debug!(
            "Best route scored {:.2} against {} alternatives",
            comparison.best_score,
            comparison.other_routes.len()
        );

        let origin = origin?;
        let (weather, air_quality) = tokio::try_join!(
            self.environment.weather(origin),
            self.environment.air_quality(origin),
        )?;
        let environment = EnvironmentSnapshot::new(weather, air_quality);

        let context = EmissionsContext {
            package_weight_kg,
            environment: Some(&environment),
        };

        let reported = self
            .estimator
            .lookup_trip(&request.start, &request.end, &request.vehicle_type)
            .await;

        let best = self.estimate(reported, request, &comparison.best_route, &context);

        let mut alternative_routes = Vec::with_capacity(comparison.other_routes.len());
        for alternative in &comparison.other_routes {
            let estimate = self.estimate(reported, request, &alternative.route, &context);

            alternative_routes.push(AlternativeRouteEmissions {
                route: alternative.route.clone(),
                emissions: estimate.co2e,
                emissions_source: estimate.source,
            });
        }

        info!(
            "Optimized route with {} alternatives, best emissions {:.2} ({:?})",
            alternative_routes.len(),
            best.co2e,
            best.source
        );

        Ok(OptimizationResult {
            route: comparison,
            emissions: best.co2e,
            emissions_source: best.source,
            alternative_routes,
            weather: environment.weather,
            air_quality: environment.air_quality_index,
        })
    }

    fn estimate(
        &self,
        reported: Option<f64>,
        request: &OptimizeRouteRequest,
        route: &Route,
        context: &EmissionsContext<'_>,
    ) -> EmissionsEstimate {
        self.estimator
            .estimate_with(reported, route, &request.vehicle_type, context)
    }
}
