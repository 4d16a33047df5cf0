//! `zipweather` - postal code to current temperature relay
//!
//! Two services make up the relay: a gateway accepting `POST /zipcode` and an
//! orchestrator answering `GET /temperature` by resolving the postal code to a
//! city and the city to its current temperature.

pub mod api;
pub mod config;
pub mod error;
pub mod location_resolver;
pub mod lookup;
pub mod models;
pub mod propagation;
pub mod telemetry;
#[cfg(test)]
mod test_support;
pub mod units;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::{AppConfig, Service};
pub use error::{ConfigError, LookupError, RelayError};
pub use location_resolver::{LocationLookup, LocationResolver};
pub use models::{Location, PostalCodeRequest, WeatherReading, ZipCode};
pub use propagation::TracePropagation;
pub use weather::{TemperatureLookup, TemperatureResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
