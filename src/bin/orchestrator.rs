//! Hop 2 process: `GET /temperature`

use anyhow::Result;
use zipweather::api::orchestrator::{self, OrchestratorState};
use zipweather::config::{AppConfig, Service};
use zipweather::{telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(Service::Orchestrator)?;
    let telemetry = telemetry::init(&config.logging, &config.telemetry)?;

    tracing::info!(
        postal = %config.lookups.postal_base_url,
        weather = %config.lookups.weather_base_url,
        "Starting {} v{}",
        Service::Orchestrator.name(),
        zipweather::VERSION
    );

    let state = OrchestratorState::from_config(&config)?;
    let result = web::run(orchestrator::router(state), &config.server).await;

    telemetry.shutdown();
    result
}
