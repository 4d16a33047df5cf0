//! Hop 2: `GET /temperature?zipcode=<code>`
//!
//! Resolves the city first and the temperature second; the second call needs
//! the first one's answer, so the two never run concurrently.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, field, info, info_span};

use super::{health, method_not_allowed};
use crate::config::AppConfig;
use crate::error::RelayError;
use crate::location_resolver::{LocationLookup, LocationResolver};
use crate::lookup::http_client;
use crate::models::{WeatherReading, ZipCode};
use crate::propagation::TracePropagation;
use crate::weather::{TemperatureLookup, TemperatureResolver};

/// Dependencies of the orchestrator handlers
#[derive(Clone)]
pub struct OrchestratorState {
    locations: Arc<dyn LocationLookup>,
    temperatures: Arc<dyn TemperatureLookup>,
    propagation: TracePropagation,
}

impl OrchestratorState {
    pub fn new(
        locations: Arc<dyn LocationLookup>,
        temperatures: Arc<dyn TemperatureLookup>,
        propagation: TracePropagation,
    ) -> Self {
        Self {
            locations,
            temperatures,
            propagation,
        }
    }

    /// Wire the real lookup clients from configuration
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = http_client()?;
        let api_key = config.lookups.weather_api_key.clone().unwrap_or_default();

        Ok(Self::new(
            Arc::new(LocationResolver::new(
                client.clone(),
                config.lookups.postal_base_url.clone(),
            )),
            Arc::new(TemperatureResolver::new(
                client,
                config.lookups.weather_base_url.clone(),
                api_key,
            )),
            TracePropagation::new(),
        ))
    }

    /// Validate, resolve the city, then resolve its temperature
    pub async fn temperature_for(
        &self,
        raw_zipcode: String,
        cancel: &CancellationToken,
    ) -> Result<WeatherReading, RelayError> {
        let zipcode = ZipCode::parse(raw_zipcode)?;

        let location = self
            .locations
            .resolve(&zipcode, cancel)
            .await
            .map_err(|source| RelayError::LocationNotFound { source })?;

        let reading = self
            .temperatures
            .current(&location, cancel)
            .await
            .map_err(|source| RelayError::TemperatureUnavailable { source })?;

        info!(city = %reading.city, temp_c = reading.temp_c, "Temperature resolved");
        Ok(reading)
    }
}

/// First `zipcode` value of the query string; absent reads as empty
fn first_zipcode(pairs: Vec<(String, String)>) -> String {
    pairs
        .into_iter()
        .find(|(name, _)| name == "zipcode")
        .map(|(_, value)| value)
        .unwrap_or_default()
}

pub fn router(state: OrchestratorState) -> Router {
    Router::new()
        .route(
            "/temperature",
            get(handle_temperature).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_temperature(
    State(state): State<OrchestratorState>,
    headers: HeaderMap,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<WeatherReading>, RelayError> {
    let zipcode = first_zipcode(pairs);
    let span = info_span!(
        "handle_temperature_request",
        zipcode = %zipcode,
        trace_id = field::Empty
    );
    state.propagation.set_parent_from_headers(&span, &headers);

    // Dropping the handler future (caller gone) cancels in-flight lookups
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    state
        .temperature_for(zipcode, &cancel)
        .instrument(span)
        .await
        .map(Json)
}
