mod config;
mod error;
mod route;
mod router;
mod state;

use std::sync::Arc;

use axum::serve;
use ecoroute_core::optimizer::{OptimizationResult, OptimizeRouteRequest, ProviderOptimizer};
use ecoroute_core::settings::Settings;
use ecoroute_providers::clients::ProviderClients;
use tracing::{Level, info};

use crate::config::ApiConfig;
use crate::router::create_router;
use crate::state::AppState;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    if std::env::args().any(|a| a == "--generate-schema") {
        write_schemas()?;
        return Ok(());
    }

    let settings = Settings::from_env()?;
    let config = ApiConfig::from_env()?;

    info!(
        "Request deadline {:?}, environmental adjustment {}",
        settings.request_deadline, settings.estimator.environmental_adjustment
    );

    let clients = ProviderClients::new(&settings.credentials, &settings.providers)?;
    let state = Arc::new(AppState {
        optimizer: ProviderOptimizer::from_clients(clients, settings.estimator),
        request_deadline: settings.request_deadline,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    serve(listener, app).await?;

    Ok(())
}

fn write_schemas() -> anyhow::Result<()> {
    use std::fs::{self, File};
    use std::io::Write;

    fs::create_dir_all("schemas")?;

    let schemas = [
        (
            "schemas/optimize_route_request.json",
            schemars::schema_for!(OptimizeRouteRequest),
        ),
        (
            "schemas/optimization_result.json",
            schemars::schema_for!(OptimizationResult),
        ),
    ];

    for (path, schema) in schemas {
        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(&schema)?.as_bytes())?;
        info!("JSON schema has been written to {}", path);
    }

    Ok(())
}
