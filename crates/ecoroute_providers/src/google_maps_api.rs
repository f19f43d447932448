use serde::Deserialize;
use tracing::debug;

use crate::{
    adapters::{Geocoder, RouteProvider},
    clients::ClientParams,
    coordinate::Coordinate,
    error::ProviderError,
    http::{build_client, decode, read_body},
    route::Route,
};

pub const GOOGLE_MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api";
const DIRECTIONS_PATH: &str = "/directions/json";
const GEOCODE_PATH: &str = "/geocode/json";

const STATUS_OK: &str = "OK";
/// No route could be found between origin and destination
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";
/// Origin or destination could not be geocoded by the directions service
const STATUS_NOT_FOUND: &str = "NOT_FOUND";

#[derive(Deserialize)]
struct DirectionsResponse {
    status: Option<String>,
    error_message: Option<String>,
    routes: Option<Vec<DirectionsRoute>>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
    overview_polyline: OverviewPolyline,
}

#[derive(Deserialize)]
struct DirectionsLeg {
    distance: ValueField,
    duration: ValueField,
    #[serde(default)]
    steps: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ValueField {
    value: u64,
}

#[derive(Deserialize)]
struct OverviewPolyline {
    points: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    status: Option<String>,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: GeocodeGeometry,
}

#[derive(Deserialize)]
struct GeocodeGeometry {
    location: LatLng,
}

#[derive(Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Directions and geocoding through the Google Maps web services.
pub struct GoogleMapsClient {
    params: ClientParams,
    client: reqwest::Client,
}

impl GoogleMapsClient {
    pub fn new(params: ClientParams) -> Result<Self, ProviderError> {
        let client = build_client(params.timeout)?;
        Ok(Self { params, client })
    }

    async fn request_directions(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(format!("{}{}", self.params.base_url, DIRECTIONS_PATH))
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("alternatives", "true"),
                ("key", self.params.api_key.as_str()),
            ])
            .send()
            .await?;

        read_body("GoogleMapsApi", response).await
    }

    async fn request_geocode(&self, place: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(format!("{}{}", self.params.base_url, GEOCODE_PATH))
            .query(&[("address", place), ("key", self.params.api_key.as_str())])
            .send()
            .await?;

        read_body("GoogleMapsApi", response).await
    }
}

impl RouteProvider for GoogleMapsClient {
    async fn fetch_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<Vec<Route>, ProviderError> {
        let routes = self
            .params
            .retry
            .run("GoogleMapsApi directions", move || async move {
                parse_directions(&self.request_directions(origin, destination).await?)
            })
            .await?;

        debug!(
            "GoogleMapsApi: {} candidate routes from {:?} to {:?}",
            routes.len(),
            origin,
            destination
        );

        Ok(routes)
    }
}

impl Geocoder for GoogleMapsClient {
    async fn geocode(&self, place: &str) -> Result<Coordinate, ProviderError> {
        self.params
            .retry
            .run("GoogleMapsApi geocode", move || async move {
                parse_geocode(&self.request_geocode(place).await?, place)
            })
            .await
    }
}

pub fn parse_directions(body: &str) -> Result<Vec<Route>, ProviderError> {
    let response: DirectionsResponse = decode(body)?;

    match response.status.as_deref() {
        None | Some(STATUS_OK) => {}
        Some(STATUS_ZERO_RESULTS) | Some(STATUS_NOT_FOUND) => return Ok(Vec::new()),
        Some(status) => {
            return Err(ProviderError::Status {
                status: status.to_owned(),
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    response
        .routes
        .unwrap_or_default()
        .into_iter()
        .map(|route| {
            let leg = route
                .legs
                .into_iter()
                .next()
                .ok_or(ProviderError::MissingField("legs"))?;

            Ok(Route {
                distance_meters: leg.distance.value,
                duration_seconds: leg.duration.value,
                encoded_path: route.overview_polyline.points,
                steps: leg.steps,
            })
        })
        .collect()
}

pub fn parse_geocode(body: &str, place: &str) -> Result<Coordinate, ProviderError> {
    let response: GeocodeResponse = decode(body)?;

    match response.status.as_deref() {
        None | Some(STATUS_OK) | Some(STATUS_ZERO_RESULTS) => {}
        Some(status) => {
            return Err(ProviderError::Status {
                status: status.to_owned(),
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    response
        .results
        .first()
        .map(|result| Coordinate::new(result.geometry.location.lat, result.geometry.location.lng))
        .ok_or_else(|| ProviderError::NotFound(place.to_owned()))
}
