//! Weather reading model

use serde::{Deserialize, Serialize};

use crate::units;

/// Current temperature of a city in Celsius, Fahrenheit and Kelvin.
///
/// `temp_f` and `temp_k` are always derived from `temp_c`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherReading {
    /// City the reading was taken for
    pub city: String,
    /// Temperature in Celsius
    pub temp_c: f64,
    /// Temperature in Fahrenheit
    pub temp_f: f64,
    /// Temperature in Kelvin
    pub temp_k: f64,
}

impl WeatherReading {
    /// Build a reading from a Celsius measurement
    #[must_use]
    pub fn from_celsius(city: impl Into<String>, temp_c: f64) -> Self {
        Self {
            city: city.into(),
            temp_c,
            temp_f: units::celsius_to_fahrenheit(temp_c),
            temp_k: units::celsius_to_kelvin(temp_c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_celsius_derives_scales() {
        let reading = WeatherReading::from_celsius("Recife", 30.5);
        assert_eq!(reading.temp_c, 30.5);
        assert_eq!(reading.temp_f, 30.5 * 1.8 + 32.0);
        assert_eq!(reading.temp_k, 30.5 + 273.15);
    }

    #[test]
    fn test_serialized_shape() {
        let reading = WeatherReading::from_celsius("São Paulo", 25.0);
        let value = serde_json::to_value(&reading).unwrap();
        assert_eq!(
            value,
            json!({"city": "São Paulo", "temp_c": 25.0, "temp_f": 77.0, "temp_k": 298.15})
        );
    }
}
