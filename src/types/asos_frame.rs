//! Contains `AsosFrame`, the tabular form of one-minute ASOS observations.

use crate::asos_data::error::AsosDataError;
use crate::calc::{degf_to_degc, wind_component};
use crate::types::observation::Observation;
use chrono::{DateTime, Utc};
use polars::prelude::*;

pub const COL_STATION_ID: &str = "station_id";
pub const COL_STATION_NAME: &str = "station_name";
pub const COL_LATITUDE: &str = "latitude_deg";
pub const COL_LONGITUDE: &str = "longitude_deg";
pub const COL_UTC: &str = "UTC";
pub const COL_TEMPERATURE: &str = "temperature_degF";
pub const COL_DEWPOINT: &str = "dewpoint_degF";
pub const COL_WIND_SPEED: &str = "wind_speed_knots";
pub const COL_WIND_DIRECTION: &str = "wind_direction_degrees";

// Added by `with_derived_quantities`
pub const COL_TEMPERATURE_C: &str = "temperature_degC";
pub const COL_DEWPOINT_C: &str = "dewpoint_degC";
pub const COL_WIND_U: &str = "wind_u_knots";
pub const COL_WIND_V: &str = "wind_v_knots";

/// Semantic column names, in the positional order of the archive's CSV.
pub const COLUMN_NAMES: [&str; 9] = [
    COL_STATION_ID,
    COL_STATION_NAME,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_UTC,
    COL_TEMPERATURE,
    COL_DEWPOINT,
    COL_WIND_SPEED,
    COL_WIND_DIRECTION,
];

pub(crate) fn observation_time_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// The schema of a loaded frame.
pub(crate) fn frame_schema() -> Schema {
    let mut schema = Schema::with_capacity(COLUMN_NAMES.len());
    for name in COLUMN_NAMES {
        let dtype = match name {
            COL_STATION_ID | COL_STATION_NAME => DataType::String,
            COL_UTC => observation_time_dtype(),
            _ => DataType::Float64,
        };
        schema.with_column(name.into(), dtype);
    }
    schema
}

/// A wrapper around a Polars `DataFrame` holding one-minute ASOS observations.
///
/// The frame has the columns listed in [`COLUMN_NAMES`]. The `UTC` column is a
/// timezone-naive millisecond datetime holding UTC instants, measurement columns
/// are nullable `f64`. Rows keep the order in which the archive returned them.
///
/// Instances are typically obtained via [`crate::download_asos_data`] or
/// [`crate::Asos::fetch`].
#[derive(Debug, Clone)]
pub struct AsosFrame {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
}

impl AsosFrame {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// A frame with the full schema and no rows.
    pub fn empty() -> Self {
        Self::new(DataFrame::empty_with_schema(&frame_schema()))
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Extracts every row into an [`Observation`].
    ///
    /// # Errors
    ///
    /// Returns [`AsosDataError::ColumnNotFound`] when a semantic column is
    /// missing and [`AsosDataError::MissingValue`] when a row lacks its
    /// station metadata or time.
    pub fn observations(&self) -> Result<Vec<Observation>, AsosDataError> {
        let df = &self.frame;
        let station_ids = string_values(df, COL_STATION_ID)?;
        let station_names = string_values(df, COL_STATION_NAME)?;
        let latitudes = float_values(df, COL_LATITUDE)?;
        let longitudes = float_values(df, COL_LONGITUDE)?;
        let times = time_values(df)?;
        let temperatures = float_values(df, COL_TEMPERATURE)?;
        let dewpoints = float_values(df, COL_DEWPOINT)?;
        let speeds = float_values(df, COL_WIND_SPEED)?;
        let directions = float_values(df, COL_WIND_DIRECTION)?;

        (0..df.height())
            .map(|row| {
                Ok(Observation {
                    station_id: required(station_ids[row].clone(), COL_STATION_ID, row)?,
                    station_name: required(station_names[row].clone(), COL_STATION_NAME, row)?,
                    latitude_deg: required(latitudes[row], COL_LATITUDE, row)?,
                    longitude_deg: required(longitudes[row], COL_LONGITUDE, row)?,
                    utc: required(times[row], COL_UTC, row)?,
                    temperature_degf: temperatures[row],
                    dewpoint_degf: dewpoints[row],
                    wind_speed_knots: speeds[row],
                    wind_direction_degrees: directions[row],
                })
            })
            .collect()
    }

    /// Keeps the observations between `start` and `end`, both inclusive.
    pub fn filter_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<AsosFrame, AsosDataError> {
        let start_naive = start.naive_utc();
        let end_naive = end.naive_utc();

        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(
                col(COL_UTC)
                    .cast(observation_time_dtype())
                    .gt_eq(lit(start_naive))
                    .and(col(COL_UTC).cast(observation_time_dtype()).lt_eq(lit(end_naive))),
            )
            .collect()?;
        Ok(AsosFrame::new(frame))
    }

    /// Adds Celsius temperatures and `u`/`v` wind components.
    ///
    /// The new columns are `temperature_degC`, `dewpoint_degC`, `wind_u_knots`
    /// and `wind_v_knots`. Wind components are null where speed or direction
    /// is missing.
    pub fn with_derived_quantities(&self) -> Result<AsosFrame, AsosDataError> {
        let mut frame = self.frame.clone();
        let to_celsius = |name: &str| -> Result<Vec<Option<f64>>, AsosDataError> {
            Ok(float_values(&frame, name)?
                .into_iter()
                .map(|degf| degf.map(degf_to_degc))
                .collect())
        };
        let temperature_c = to_celsius(COL_TEMPERATURE)?;
        let dewpoint_c = to_celsius(COL_DEWPOINT)?;
        frame.with_column(Series::new(COL_TEMPERATURE_C.into(), temperature_c))?;
        frame.with_column(Series::new(COL_DEWPOINT_C.into(), dewpoint_c))?;

        let speeds = float_values(&frame, COL_WIND_SPEED)?;
        let directions = float_values(&frame, COL_WIND_DIRECTION)?;
        let (u, v): (Vec<Option<f64>>, Vec<Option<f64>>) = speeds
            .iter()
            .zip(&directions)
            .map(|(speed, direction)| match (speed, direction) {
                (Some(s), Some(d)) => {
                    let (u, v) = wind_component(*s, *d);
                    (Some(u), Some(v))
                }
                _ => (None, None),
            })
            .unzip();

        frame.with_column(Series::new(COL_WIND_U.into(), u))?;
        frame.with_column(Series::new(COL_WIND_V.into(), v))?;
        Ok(AsosFrame::new(frame))
    }
}

/// Retrieves a column by name from a DataFrame.
fn get_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, AsosDataError> {
    df.column(name)
        .map_err(|e| AsosDataError::ColumnNotFound(name.to_string(), e))
}

fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, AsosDataError> {
    let column = get_column(df, name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, AsosDataError> {
    let column = get_column(df, name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn time_values(df: &DataFrame) -> Result<Vec<Option<DateTime<Utc>>>, AsosDataError> {
    let column = get_column(df, COL_UTC)?
        .cast(&observation_time_dtype())?
        .cast(&DataType::Int64)?;
    Ok(column
        .i64()?
        .into_iter()
        .map(|millis| millis.and_then(DateTime::<Utc>::from_timestamp_millis))
        .collect())
}

fn required<T>(value: Option<T>, column: &str, row: usize) -> Result<T, AsosDataError> {
    value.ok_or_else(|| AsosDataError::MissingValue {
        column: column.to_string(),
        row,
    })
}
