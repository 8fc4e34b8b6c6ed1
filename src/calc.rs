//! Unit conversions and derived quantities for surface observations.

use thiserror::Error;

/// Reference pressure for the Exner function, in hPa.
pub const REFERENCE_PRESSURE_HPA: f64 = 1000.0;

/// Poisson constant (R/cp) for dry air.
pub const POISSON_CONSTANT: f64 = 0.28562982892500527;

#[derive(Debug, Error, PartialEq)]
pub enum CalcError {
    #[error("Speed and direction lengths differ ({speed} vs {direction})")]
    LengthMismatch { speed: usize, direction: usize },
}

/// Converts a temperature from degrees Fahrenheit to degrees Celsius.
///
/// ```
/// assert_eq!(meteogram::degf_to_degc(212.0), 100.0);
/// ```
pub fn degf_to_degc(degf: f64) -> f64 {
    (degf - 32.0) * (5.0 / 9.0)
}

/// The Exner function `(p / 1000 hPa)^κ` with the dry-air Poisson constant.
pub fn exner_function(pressure: f64) -> f64 {
    exner_function_with(pressure, REFERENCE_PRESSURE_HPA, POISSON_CONSTANT)
}

/// The Exner function against a custom reference pressure and exponent.
///
/// `pressure` and `reference_pressure` must share a unit.
pub fn exner_function_with(pressure: f64, reference_pressure: f64, kappa: f64) -> f64 {
    (pressure / reference_pressure).powf(kappa)
}

/// Potential temperature (K) of air at `pressure` (hPa) and `temperature` (K).
///
/// ```
/// let theta = meteogram::potential_temperature(800.0, 273.0);
/// assert!((theta - 290.96).abs() < 0.01);
/// ```
pub fn potential_temperature(pressure: f64, temperature: f64) -> f64 {
    temperature / exner_function(pressure)
}

/// Splits one wind observation into `(u, v)`.
///
/// Direction follows the meteorological convention: the direction the wind
/// blows *from*, in degrees. A northerly wind has a negative `v`.
pub fn wind_component(speed: f64, direction_degrees: f64) -> (f64, f64) {
    let theta = direction_degrees.to_radians();
    (-speed * theta.sin(), -speed * theta.cos())
}

/// Elementwise [`wind_component`] over paired speed and direction series.
pub fn wind_components(
    speed: &[f64],
    direction_degrees: &[f64],
) -> Result<(Vec<f64>, Vec<f64>), CalcError> {
    if speed.len() != direction_degrees.len() {
        return Err(CalcError::LengthMismatch {
            speed: speed.len(),
            direction: direction_degrees.len(),
        });
    }

    Ok(speed
        .iter()
        .zip(direction_degrees)
        .map(|(&s, &d)| wind_component(s, d))
        .unzip())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_degf_to_degc_at_freezing() {
        assert_eq!(degf_to_degc(32.0), 0.0);
    }

    #[test]
    fn test_degf_to_degc_at_boiling() {
        assert_eq!(degf_to_degc(212.0), 100.0);
    }

    #[test]
    fn test_degf_to_degc_where_scales_meet() {
        assert_close(degf_to_degc(-40.0), -40.0, 1e-12);
    }

    #[test]
    fn test_potential_temperature() {
        assert_close(potential_temperature(800.0, 273.0), 290.96, 0.01);
    }

    #[test]
    fn test_potential_temperature_at_reference_pressure() {
        assert_eq!(potential_temperature(1000.0, 288.15), 288.15);
    }

    #[test]
    fn test_exner_function() {
        assert_close(exner_function(500.0), 0.8203833, 0.0001);
    }

    #[test]
    fn test_exner_function_custom_reference() {
        assert_close(exner_function_with(500.0, 500.0, POISSON_CONSTANT), 1.0, 1e-12);
        assert_close(exner_function_with(250.0, 1000.0, 0.5), 0.5, 1e-12);
    }

    #[test]
    fn test_wind_components() {
        let speed = [10.0, 10.0, 10.0, 0.0];
        let direction = [0.0, 45.0, 360.0, 45.0];

        let (u, v) = wind_components(&speed, &direction).unwrap();

        let true_u = [0.0, -7.0710, 0.0, 0.0];
        let true_v = [-10.0, -7.0710, -10.0, 0.0];
        for i in 0..4 {
            assert_close(u[i], true_u[i], 0.001);
            assert_close(v[i], true_v[i], 0.001);
        }
    }

    #[test]
    fn test_wind_component_cardinal_directions() {
        let (u, v) = wind_component(10.0, 90.0);
        assert_close(u, -10.0, 1e-9);
        assert_close(v, 0.0, 1e-9);

        let (u, v) = wind_component(10.0, 180.0);
        assert_close(u, 0.0, 1e-9);
        assert_close(v, 10.0, 1e-9);

        let (u, v) = wind_component(10.0, 270.0);
        assert_close(u, 10.0, 1e-9);
        assert_close(v, 0.0, 1e-9);
    }

    #[test]
    fn test_wind_components_length_mismatch() {
        let result = wind_components(&[1.0, 2.0], &[0.0]);
        assert_eq!(
            result,
            Err(CalcError::LengthMismatch {
                speed: 2,
                direction: 1
            })
        );
    }

    #[test]
    fn test_wind_components_empty() {
        let (u, v) = wind_components(&[], &[]).unwrap();
        assert!(u.is_empty());
        assert!(v.is_empty());
    }
}
