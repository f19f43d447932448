use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ecoroute_providers::{
    adapters::{EmissionsLookup, EnvironmentProvider, Geocoder, RouteProvider},
    coordinate::Coordinate,
    error::ProviderError,
    route::Route,
    weather::WeatherReading,
};

pub fn route(distance_meters: u64, duration_seconds: u64) -> Route {
    Route {
        distance_meters,
        duration_seconds,
        encoded_path: format!("path_{}_{}", distance_meters, duration_seconds),
        steps: Vec::new(),
    }
}

pub fn weather() -> WeatherReading {
    WeatherReading {
        temperature_c: 20.0,
        humidity_percent: 0.0,
        wind_speed_ms: 0.0,
        precipitation_mm: 0.0,
    }
}

fn decode_error() -> ProviderError {
    ProviderError::Deserialize(serde_json::from_str::<serde_json::Value>("{").unwrap_err())
}

fn unavailable() -> ProviderError {
    ProviderError::Api {
        status: 503,
        message: String::from("Service Unavailable"),
    }
}

pub struct FakeRouteProvider {
    routes: Option<Vec<Route>>,
    calls: AtomicUsize,
}

impl FakeRouteProvider {
    pub fn returning(routes: Vec<Route>) -> Self {
        Self {
            routes: Some(routes),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            routes: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteProvider for FakeRouteProvider {
    async fn fetch_routes(
        &self,
        _origin: &str,
        _destination: &str,
    ) -> Result<Vec<Route>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.routes.clone().ok_or_else(unavailable)
    }
}

pub struct FakeGeocoder {
    coordinate: Option<Coordinate>,
    places: Mutex<Vec<String>>,
}

impl FakeGeocoder {
    pub fn returning(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            places: Mutex::new(Vec::new()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            coordinate: None,
            places: Mutex::new(Vec::new()),
        }
    }

    pub fn places(&self) -> Vec<String> {
        self.places.lock().unwrap().clone()
    }
}

impl Geocoder for FakeGeocoder {
    async fn geocode(&self, place: &str) -> Result<Coordinate, ProviderError> {
        self.places.lock().unwrap().push(place.to_owned());
        self.coordinate
            .ok_or_else(|| ProviderError::NotFound(place.to_owned()))
    }
}

pub struct FakeEnvironment {
    weather: WeatherReading,
    air_quality_index: i32,
    coordinates: Mutex<Vec<Coordinate>>,
}

impl FakeEnvironment {
    pub fn new(weather: WeatherReading, air_quality_index: i32) -> Self {
        Self {
            weather,
            air_quality_index,
            coordinates: Mutex::new(Vec::new()),
        }
    }

    /// Coordinates of every weather and air quality request.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.coordinates.lock().unwrap().clone()
    }
}

impl EnvironmentProvider for FakeEnvironment {
    async fn weather(&self, coordinate: Coordinate) -> Result<WeatherReading, ProviderError> {
        self.coordinates.lock().unwrap().push(coordinate);
        Ok(self.weather)
    }

    async fn air_quality(&self, coordinate: Coordinate) -> Result<i32, ProviderError> {
        self.coordinates.lock().unwrap().push(coordinate);
        Ok(self.air_quality_index)
    }
}

pub struct FakeEmissionsLookup {
    co2e: Option<f64>,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl FakeEmissionsLookup {
    pub fn returning(co2e: f64) -> Self {
        Self {
            co2e: Some(co2e),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn decode_error() -> Self {
        Self {
            co2e: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl EmissionsLookup for FakeEmissionsLookup {
    async fn trip_emissions(
        &self,
        origin: &str,
        destination: &str,
        transport_type: &str,
    ) -> Result<f64, ProviderError> {
        self.calls.lock().unwrap().push((
            origin.to_owned(),
            destination.to_owned(),
            transport_type.to_owned(),
        ));
        self.co2e.ok_or_else(decode_error)
    }
}
