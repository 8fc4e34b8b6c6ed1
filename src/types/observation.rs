//! A single one-minute surface observation.

use crate::calc::{degf_to_degc, wind_component};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of one-minute ASOS data.
///
/// Measurements are optional: the archive leaves a field empty when a sensor
/// did not report for that minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Station identifier, e.g. `AMW`.
    pub station_id: String,
    /// Human readable station name, e.g. `Ames`.
    pub station_name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// Time of the observation.
    pub utc: DateTime<Utc>,
    pub temperature_degf: Option<f64>,
    pub dewpoint_degf: Option<f64>,
    pub wind_speed_knots: Option<f64>,
    /// Direction the wind blows from, degrees clockwise from north.
    pub wind_direction_degrees: Option<f64>,
}

impl Observation {
    pub fn temperature_degc(&self) -> Option<f64> {
        self.temperature_degf.map(degf_to_degc)
    }

    pub fn dewpoint_degc(&self) -> Option<f64> {
        self.dewpoint_degf.map(degf_to_degc)
    }

    /// `(u, v)` wind components in knots, if both speed and direction were reported.
    pub fn wind_components(&self) -> Option<(f64, f64)> {
        Some(wind_component(
            self.wind_speed_knots?,
            self.wind_direction_degrees?,
        ))
    }
}
