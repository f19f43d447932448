use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::post;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::route::optimize_route::{optimize_route_handler, preflight_handler};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/optimize_route",
            post(optimize_route_handler).options(preflight_handler),
        )
        .layer(ServiceBuilder::new().layer(cors_layer))
        .layer(middleware::from_fn(preflight_no_content))
        .with_state(state)
}

/// The CORS layer answers preflights itself with `200 OK`, answer them with
/// `204 No Content` instead.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;

    if is_preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }

    response
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::Json;
    use axum::body::Body;
    use axum::extract::Query;
    use axum::http::{Request, header};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use ecoroute_core::emissions::EstimatorOptions;
    use ecoroute_core::optimizer::ProviderOptimizer;
    use ecoroute_providers::clients::{ProviderBaseUrls, ProviderClients, ProviderSettings};
    use ecoroute_providers::credentials::ProviderCredentials;
    use ecoroute_providers::retry::RetryPolicy;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::error::INTERNAL_ERROR_MESSAGE;

    const DIRECTIONS: &str =
        include_str!("../../crates/ecoroute_providers/tests/fixtures/google_directions.json");
    const GEOCODE: &str =
        include_str!("../../crates/ecoroute_providers/tests/fixtures/google_geocode.json");
    const WEATHER: &str =
        include_str!("../../crates/ecoroute_providers/tests/fixtures/openweathermap_weather.json");
    const FEED: &str = include_str!("../../crates/ecoroute_providers/tests/fixtures/waqi_feed.json");
    const SIMPLE_TRIPS: &str =
        include_str!("../../crates/ecoroute_providers/tests/fixtures/travel_co2_simpletrips.json");

    /// Origin for which the fake directions service finds nothing
    const NOWHERE: &str = "Nowhere";
    /// Origin for which the fake directions service answers too late
    const SLOWTOWN: &str = "Slowtown";
    /// Origin for which the fake emissions service answers garbage
    const GARBLED: &str = "Garbled";
    /// Origin for which the fake emissions service never answers in time
    const STALLED: &str = "Stalled";

    fn json_response(body: &'static str) -> Response {
        ([(header::CONTENT_TYPE, "application/json")], body).into_response()
    }

    async fn fake_directions(Query(query): Query<Vec<(String, String)>>) -> Response {
        let origin = query
            .iter()
            .find(|(name, _)| name == "origin")
            .map(|(_, value)| value.as_str());

        match origin {
            Some(NOWHERE) => json_response(r#"{ "status": "ZERO_RESULTS", "routes": [] }"#),
            Some(SLOWTOWN) => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                json_response(DIRECTIONS)
            }
            _ => json_response(DIRECTIONS),
        }
    }

    async fn fake_simple_trips(Json(body): Json<Value>) -> Response {
        if body["from"] == GARBLED {
            return json_response("<html>Bad gateway</html>");
        }
        if body["from"] == STALLED {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
        json_response(SIMPLE_TRIPS)
    }

    async fn spawn_fake_providers() -> SocketAddr {
        let app = Router::new()
            .route("/maps/directions/json", get(fake_directions))
            .route("/maps/geocode/json", get(|| async { json_response(GEOCODE) }))
            .route("/owm/weather", get(|| async { json_response(WEATHER) }))
            .route("/waqi/feed/{*location}", get(|| async { json_response(FEED) }))
            .route("/co2/simpletrips", post(fake_simple_trips));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        addr
    }

    fn credentials() -> ProviderCredentials {
        ProviderCredentials {
            google_maps_api_key: String::from("google-secret"),
            aqicn_api_key: String::from("aqicn-secret"),
            openweathermap_api_key: String::from("owm-secret"),
            rapidapi_key: String::from("rapid-secret"),
        }
    }

    fn app_with_base_url(base_url: &str, request_deadline: Duration) -> Router {
        let settings = ProviderSettings {
            timeout: Duration::from_secs(5),
            retry: RetryPolicy::NONE,
            lookup_timeout: Duration::from_millis(300),
            base_urls: ProviderBaseUrls {
                google_maps: format!("{}/maps", base_url),
                openweathermap: format!("{}/owm", base_url),
                waqi: format!("{}/waqi", base_url),
                travel_co2: format!("{}/co2", base_url),
            },
        };

        let clients = ProviderClients::new(&credentials(), &settings).unwrap();
        let optimizer = ProviderOptimizer::from_clients(clients, EstimatorOptions::default());

        create_router(Arc::new(AppState {
            optimizer,
            request_deadline,
        }))
    }

    async fn test_app() -> Router {
        let addr = spawn_fake_providers().await;
        app_with_base_url(&format!("http://{}", addr), Duration::from_secs(1))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/optimize_route")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_optimize_route() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(json!({
                "start": "Berlin",
                "end": "Potsdam",
                "vehicle_type": "car",
                "package_weight": 0
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;

        assert_eq!(body["route"]["best_route"]["distance"], 10_000);
        assert_eq!(body["route"]["best_route"]["duration"], 600);
        assert_eq!(
            body["route"]["other_routes"][0]["reason"],
            "Score: 750.00 (Best: 700.00)"
        );
        assert_eq!(body["emissions"], 4.87);
        assert_eq!(body["emissions_source"], "lookup");
        assert_eq!(body["alternative_routes"].as_array().unwrap().len(), 1);
        assert_eq!(body["weather"]["temperature"], 14.2);
        assert_eq!(body["weather"]["precipitation"], 0.31);
        assert_eq!(body["air_quality"], 57);
    }

    #[tokio::test]
    async fn test_lookup_failure_falls_back_to_local_model() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(json!({
                "start": GARBLED,
                "end": "Potsdam",
                "vehicle_type": "car"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;

        assert_eq!(body["emissions"], 1200.0);
        assert_eq!(body["emissions_source"], "local_model");
        assert_eq!(body["alternative_routes"][0]["emissions"], 600.0);
    }

    #[tokio::test]
    async fn test_stalled_lookup_falls_back_within_deadline() {
        let addr = spawn_fake_providers().await;
        let app = app_with_base_url(&format!("http://{}", addr), Duration::from_secs(3));

        let response = app
            .oneshot(post_json(json!({
                "start": STALLED,
                "end": "Potsdam",
                "vehicle_type": "car"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;

        assert_eq!(body["emissions"], 1200.0);
        assert_eq!(body["emissions_source"], "local_model");
        assert_eq!(body["alternative_routes"][0]["emissions"], 600.0);
        assert_eq!(body["alternative_routes"][0]["emissions_source"], "local_model");
    }

    #[tokio::test]
    async fn test_truck_uses_local_model_with_weight() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(json!({
                "start": "Berlin",
                "end": "Potsdam",
                "vehicle_type": "truck",
                "package_weight": 100
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;

        assert_eq!(body["emissions"], 6000.0);
        assert_eq!(body["emissions_source"], "local_model");
    }

    #[tokio::test]
    async fn test_no_routes_found() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(json!({
                "start": NOWHERE,
                "end": "Potsdam",
                "vehicle_type": "car"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("No routes found"));
    }

    #[tokio::test]
    async fn test_empty_body() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/optimize_route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json(response).await["error"].is_string());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/optimize_route")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(read_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_field() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(json!({ "start": "Berlin", "vehicle_type": "car" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("end"));
    }

    #[tokio::test]
    async fn test_negative_weight() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(json!({
                "start": "Berlin",
                "end": "Potsdam",
                "vehicle_type": "van",
                "package_weight": -3.5
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("package_weight"));
    }

    #[tokio::test]
    async fn test_preflight() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/optimize_route")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.is_empty());

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/optimize_route")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_provider_failure_is_opaque() {
        // Nothing listens on the discard port
        let app = app_with_base_url("http://127.0.0.1:9", Duration::from_secs(5));

        let response = app
            .oneshot(post_json(json!({
                "start": "Berlin",
                "end": "Potsdam",
                "vehicle_type": "car"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body, json!({ "error": INTERNAL_ERROR_MESSAGE }));
    }

    #[tokio::test]
    async fn test_deadline_is_opaque() {
        let addr = spawn_fake_providers().await;
        let app = app_with_base_url(&format!("http://{}", addr), Duration::from_millis(200));

        let response = app
            .oneshot(post_json(json!({
                "start": SLOWTOWN,
                "end": "Potsdam",
                "vehicle_type": "car"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert_eq!(body, json!({ "error": INTERNAL_ERROR_MESSAGE }));
    }
}
