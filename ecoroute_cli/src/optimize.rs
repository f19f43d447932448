use std::time::Duration;

use anyhow::Context;
use clap::Args;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use ecoroute_core::{
    emissions::EmissionsSource,
    optimizer::{OptimizationResult, OptimizeRouteRequest, ProviderOptimizer},
    route_selector::score,
    settings::{Settings, parse_duration},
    vehicle_type::VehicleType,
};
use ecoroute_providers::{clients::ProviderClients, route::Route};
use tracing::info;

#[derive(Args)]
pub struct OptimizeArgs {
    /// Origin, any address or place name the geocoder understands
    #[arg(short, long)]
    start: String,

    /// Destination
    #[arg(short, long)]
    end: String,

    /// car, truck, van, bike, flying, public-transport or electric
    #[arg(short, long, default_value = "car")]
    vehicle_type: VehicleType,

    /// Cargo weight in kg
    #[arg(short, long)]
    package_weight: Option<f64>,

    /// Scale the local emissions model by weather and air quality
    #[arg(long)]
    environmental: bool,

    /// Timeout for the whole optimization (e.g., "30s", "PT1M")
    #[arg(long, value_parser = parse_duration)]
    deadline: Option<Duration>,

    /// Print the raw JSON result instead of a table
    #[arg(long)]
    json: bool,
}

pub async fn run(args: OptimizeArgs) -> anyhow::Result<()> {
    let mut settings = Settings::from_env()?;
    if args.environmental {
        settings.estimator.environmental_adjustment = true;
    }
    let deadline = args.deadline.unwrap_or(settings.request_deadline);
    settings.providers.lookup_timeout = settings.providers.lookup_timeout.min(deadline / 2);

    let clients = ProviderClients::new(&settings.credentials, &settings.providers)?;
    let optimizer = ProviderOptimizer::from_clients(clients, settings.estimator);

    let request = OptimizeRouteRequest {
        start: args.start,
        end: args.end,
        vehicle_type: args.vehicle_type,
        package_weight: args.package_weight,
    };

    info!(
        "Optimizing route from {:?} to {:?} by {}",
        request.start, request.end, request.vehicle_type
    );

    let result = tokio::time::timeout(deadline, optimizer.optimize_route(&request))
        .await
        .with_context(|| format!("Optimization exceeded the deadline of {:?}", deadline))??;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", comparison_table(&result));
        println!(
            "Weather at {}: {:.1}°C, humidity {:.0}%, wind {:.1} m/s, precipitation {:.1} mm, AQI {}",
            request.start,
            result.weather.temperature_c,
            result.weather.humidity_percent,
            result.weather.wind_speed_ms,
            result.weather.precipitation_mm,
            result.air_quality
        );
    }

    Ok(())
}

fn comparison_table(result: &OptimizationResult) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Route",
        "Distance (km)",
        "Duration (min)",
        "Score",
        "Emissions (CO2e)",
        "Source",
    ]);

    table.add_row(route_row(
        "best",
        &result.route.best_route,
        result.emissions,
        result.emissions_source,
    ));

    for (index, alternative) in result.alternative_routes.iter().enumerate() {
        table.add_row(route_row(
            &format!("#{}", index + 1),
            &alternative.route,
            alternative.emissions,
            alternative.emissions_source,
        ));
    }

    table
}

fn route_row(label: &str, route: &Route, emissions: f64, source: EmissionsSource) -> Vec<Cell> {
    vec![
        Cell::new(label),
        Cell::new(format!("{:.2}", route.distance_km())),
        Cell::new(format!("{:.2}", route.duration_seconds as f64 / 60.0)),
        Cell::new(format!("{:.2}", score(route))),
        Cell::new(format!("{:.2}", emissions)),
        Cell::new(match source {
            EmissionsSource::Lookup => "lookup",
            EmissionsSource::LocalModel => "local model",
        }),
    ]
}
