//! Contracts of the external data sources the route optimizer depends on.

use std::sync::Arc;

use crate::{coordinate::Coordinate, error::ProviderError, route::Route, weather::WeatherReading};

pub trait Geocoder: Send + Sync {
    /// Resolves a free-form place name to a coordinate.
    fn geocode(
        &self,
        place: &str,
    ) -> impl Future<Output = Result<Coordinate, ProviderError>> + Send;
}

pub trait RouteProvider: Send + Sync {
    /// Candidate routes between two places, in provider order. An empty list
    /// means the provider found no route, it is not an error.
    fn fetch_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<Vec<Route>, ProviderError>> + Send;
}

pub trait EnvironmentProvider: Send + Sync {
    fn weather(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<WeatherReading, ProviderError>> + Send;

    fn air_quality(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<i32, ProviderError>> + Send;
}

pub trait EmissionsLookup: Send + Sync {
    /// CO2-equivalent reported by a third party for a trip between two places.
    fn trip_emissions(
        &self,
        origin: &str,
        destination: &str,
        transport_type: &str,
    ) -> impl Future<Output = Result<f64, ProviderError>> + Send;
}

impl<T: Geocoder> Geocoder for Arc<T> {
    fn geocode(
        &self,
        place: &str,
    ) -> impl Future<Output = Result<Coordinate, ProviderError>> + Send {
        (**self).geocode(place)
    }
}

impl<T: RouteProvider> RouteProvider for Arc<T> {
    fn fetch_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<Vec<Route>, ProviderError>> + Send {
        (**self).fetch_routes(origin, destination)
    }
}
