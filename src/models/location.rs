//! Location model resolved from a postal code

use serde::{Deserialize, Serialize};

/// City a postal code belongs to
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Location {
    /// City name, never empty
    pub city: String,
}

impl Location {
    /// Create a location, or `None` when the city is empty
    #[must_use]
    pub fn new(city: impl Into<String>) -> Option<Self> {
        let city = city.into();
        if city.is_empty() {
            None
        } else {
            Some(Self { city })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_new() {
        let location = Location::new("São Paulo").unwrap();
        assert_eq!(location.city, "São Paulo");
    }

    #[test]
    fn test_empty_city_is_not_a_location() {
        assert!(Location::new("").is_none());
    }

    #[test]
    fn test_whitespace_city_is_kept() {
        assert_eq!(Location::new(" ").unwrap().city, " ");
    }
}
