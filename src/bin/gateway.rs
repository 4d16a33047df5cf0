//! Hop 1 process: `POST /zipcode`

use anyhow::Result;
use zipweather::api::gateway::{self, GatewayState};
use zipweather::config::{AppConfig, Service};
use zipweather::{telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load(Service::Gateway)?;
    let telemetry = telemetry::init(&config.logging, &config.telemetry)?;

    tracing::info!(
        orchestrator = %config.gateway.orchestrator_url,
        "Starting {} v{}",
        Service::Gateway.name(),
        zipweather::VERSION
    );

    let state = GatewayState::from_config(&config)?;
    let result = web::run(gateway::router(state), &config.server).await;

    telemetry.shutdown();
    result
}
