use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    adapters::EmissionsLookup,
    clients::ClientParams,
    error::ProviderError,
    http::{build_client, decode, read_body},
};

pub const TRAVEL_CO2_API_HOST: &str = "travel-co2-climate-carbon-emissions.p.rapidapi.com";
pub const TRAVEL_CO2_API_URL: &str =
    "https://travel-co2-climate-carbon-emissions.p.rapidapi.com/api/v1";
const SIMPLE_TRIPS_PATH: &str = "/simpletrips";

#[derive(Debug, Serialize)]
pub struct SimpleTripsRequestBody<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub ways: u32,
    pub people: u32,
    pub language: &'a str,
    pub title: String,
    pub transport_types: [&'a str; 1],
}

impl<'a> SimpleTripsRequestBody<'a> {
    pub fn new(from: &'a str, to: &'a str, transport_type: &'a str) -> Self {
        SimpleTripsRequestBody {
            from,
            to,
            ways: 1,
            people: 1,
            language: "en",
            title: format!("Carbon emissions from {} to {}", from, to),
            transport_types: [transport_type],
        }
    }
}

#[derive(Deserialize)]
struct SimpleTripsResponse {
    trips: Option<Vec<Trip>>,
}

#[derive(Deserialize)]
struct Trip {
    co2e: Option<f64>,
}

/// Trip emissions from the RapidAPI "Travel CO2" service.
pub struct TravelCo2Client {
    params: ClientParams,
    client: reqwest::Client,
}

impl TravelCo2Client {
    pub fn new(params: ClientParams) -> Result<Self, ProviderError> {
        let client = build_client(params.timeout)?;
        Ok(Self { params, client })
    }

    async fn request_simple_trips(
        &self,
        body: &SimpleTripsRequestBody<'_>,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}{}", self.params.base_url, SIMPLE_TRIPS_PATH))
            .header("x-rapidapi-key", &self.params.api_key)
            .header("x-rapidapi-host", TRAVEL_CO2_API_HOST)
            .json(body)
            .send()
            .await?;

        read_body("TravelCo2Api", response).await
    }
}

impl EmissionsLookup for TravelCo2Client {
    async fn trip_emissions(
        &self,
        origin: &str,
        destination: &str,
        transport_type: &str,
    ) -> Result<f64, ProviderError> {
        let body = SimpleTripsRequestBody::new(origin, destination, transport_type);

        let response = self
            .params
            .retry
            .run("TravelCo2Api simpletrips", || self.request_simple_trips(&body))
            .await?;

        debug!("TravelCo2Api: response {}", response);

        parse_trip_emissions(&response)
    }
}

pub fn parse_trip_emissions(body: &str) -> Result<f64, ProviderError> {
    let response: SimpleTripsResponse = decode(body)?;

    response
        .trips
        .unwrap_or_default()
        .first()
        .ok_or(ProviderError::MissingField("trips"))?
        .co2e
        .ok_or(ProviderError::MissingField("trips[0].co2e"))
}
