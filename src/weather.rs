//! Current temperature lookup
//!
//! Asks the weather lookup service for the current conditions of a city
//! (`GET <base>?key=<key>&q=<city>`) and converts the Celsius reading into the
//! other two scales.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{Span, debug, field, instrument};

use crate::error::LookupError;
use crate::lookup::fetch_json;
use crate::models::{Location, WeatherReading};

/// Anything that can report the current temperature of a city
#[async_trait]
pub trait TemperatureLookup: Send + Sync {
    async fn current(
        &self,
        location: &Location,
        cancel: &CancellationToken,
    ) -> Result<WeatherReading, LookupError>;
}

/// Weather lookup response. Both levels may be absent; either one missing
/// makes the response unusable.
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    temp_c: Option<f64>,
}

impl CurrentWeatherResponse {
    fn temp_c(&self) -> Result<f64, LookupError> {
        let current = self
            .current
            .as_ref()
            .ok_or(LookupError::MissingTemperature { field: "current" })?;
        current.temp_c.ok_or(LookupError::MissingTemperature {
            field: "current.temp_c",
        })
    }
}

/// Client for the weather lookup service
#[derive(Clone)]
pub struct TemperatureResolver {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TemperatureResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemperatureResolver")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl TemperatureResolver {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl TemperatureLookup for TemperatureResolver {
    #[instrument(
        name = "get_temperature",
        skip(self, location, cancel),
        fields(city = %location.city, temp_c = field::Empty, temp_f = field::Empty, temp_k = field::Empty)
    )]
    async fn current(
        &self,
        location: &Location,
        cancel: &CancellationToken,
    ) -> Result<WeatherReading, LookupError> {
        debug!("Fetching current weather");

        let request = self
            .client
            .get(&self.base_url)
            .query(&[("key", self.api_key.as_str()), ("q", location.city.as_str())]);
        let response: CurrentWeatherResponse = fetch_json(request, cancel).await?;

        let reading = WeatherReading::from_celsius(location.city.clone(), response.temp_c()?);

        let span = Span::current();
        span.record("temp_c", reading.temp_c);
        span.record("temp_f", reading.temp_f);
        span.record("temp_k", reading.temp_k);
        debug!(temp_c = reading.temp_c, "Fetched current weather");

        Ok(reading)
    }
}
