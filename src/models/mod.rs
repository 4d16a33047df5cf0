//! Data models for the zipweather services
//!
//! Every value here is request scoped:
//! - Zipcode: inbound postal code payload and its validated form
//! - Location: city resolved from a postal code
//! - Weather: temperature reading in three scales

pub mod location;
pub mod weather;
pub mod zipcode;

// Re-export all public types for convenient access
pub use location::Location;
pub use weather::WeatherReading;
pub use zipcode::{PostalCodeRequest, ZipCode};
