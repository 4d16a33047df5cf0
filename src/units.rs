//! Temperature scale conversion

/// Convert Celsius to Fahrenheit
#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Convert Celsius to Kelvin
#[must_use]
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 32.0, 273.15)]
    #[case(100.0, 212.0, 373.15)]
    #[case(25.0, 77.0, 298.15)]
    fn test_known_points(#[case] celsius: f64, #[case] fahrenheit: f64, #[case] kelvin: f64) {
        assert_eq!(celsius_to_fahrenheit(celsius), fahrenheit);
        assert_eq!(celsius_to_kelvin(celsius), kelvin);
    }

    #[rstest]
    #[case(-40.0)]
    #[case(-17.5)]
    #[case(36.6)]
    fn test_results_are_not_rounded(#[case] celsius: f64) {
        assert_eq!(celsius_to_fahrenheit(celsius), celsius * 1.8 + 32.0);
        assert_eq!(celsius_to_kelvin(celsius), celsius + 273.15);
    }

    #[test]
    fn test_inexact_result_is_kept() {
        assert_ne!(celsius_to_fahrenheit(36.6), 97.88);
    }
}
