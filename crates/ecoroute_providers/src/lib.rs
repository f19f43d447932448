pub mod adapters;
pub mod clients;
pub mod coordinate;
pub mod credentials;
pub mod environment_client;
pub mod error;
pub mod google_maps_api;
pub mod openweathermap_api;
pub mod retry;
pub mod route;
pub mod travel_co2_api;
pub mod waqi_api;
pub mod weather;

mod http;
