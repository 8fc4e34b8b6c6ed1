//! Turns the archive's CSV payload into an [`AsosFrame`].
//!
//! The payload has one header row and ends every line with a delimiter, so
//! each row carries an empty tenth field that is dropped after reading.

use crate::asos_data::error::AsosDataError;
use crate::types::asos_frame::{observation_time_dtype, AsosFrame, COLUMN_NAMES, COL_UTC};
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{info, warn};
use polars::prelude::*;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Fields per line, including the trailing artifact column.
pub(crate) const RAW_COLUMN_COUNT: usize = COLUMN_NAMES.len() + 1;

const TRAILER_COLUMN: &str = "trailer";

const TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parses a raw CSV payload. `source_name` only labels errors and logs.
pub(crate) fn parse_asos_csv(bytes: &[u8], source_name: &str) -> Result<AsosFrame, AsosDataError> {
    let text = String::from_utf8_lossy(bytes);
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header) = lines.next() else {
        return Err(AsosDataError::EmptyPayload(source_name.to_string()));
    };

    check_field_count(header, None, source_name)?;

    let mut row_count = 0;
    for (row, line) in lines.enumerate() {
        check_field_count(line, Some(row), source_name)?;
        row_count += 1;
    }
    if row_count == 0 {
        info!("No observations in {}", source_name);
        return Ok(AsosFrame::empty());
    }

    let mut df = read_raw_frame(bytes, source_name)?;

    if df.width() != RAW_COLUMN_COUNT {
        return Err(AsosDataError::SchemaMismatch {
            source_name: source_name.to_string(),
            row: None,
            expected: RAW_COLUMN_COUNT,
            found: df.width(),
        });
    }

    df.drop_in_place(TRAILER_COLUMN)
        .map_err(|e| AsosDataError::ColumnRenameError {
            source_name: source_name.to_string(),
            source: e,
        })?;
    df.set_column_names(COLUMN_NAMES.iter().copied())
        .map_err(|e| AsosDataError::ColumnRenameError {
            source_name: source_name.to_string(),
            source: e,
        })?;

    let millis = parse_time_column(&df, source_name)?;
    let utc = Series::new(COL_UTC.into(), millis).cast(&observation_time_dtype())?;
    df.with_column(utc)?;

    info!("Parsed {} observations from {}", df.height(), source_name);
    Ok(AsosFrame::new(df))
}

/// Rejects a line whose field count differs from the raw schema. Polars
/// would otherwise fill the fields of a short row with nulls.
fn check_field_count(
    line: &str,
    row: Option<usize>,
    source_name: &str,
) -> Result<(), AsosDataError> {
    let found = line.split(',').count();
    if found == RAW_COLUMN_COUNT {
        return Ok(());
    }
    warn!(
        "CSV column count ({}) does not match schema length ({}) for {} (data row {:?})",
        found, RAW_COLUMN_COUNT, source_name, row
    );
    Err(AsosDataError::SchemaMismatch {
        source_name: source_name.to_string(),
        row,
        expected: RAW_COLUMN_COUNT,
        found,
    })
}

/// Reads the payload with an explicit raw schema, so column types never
/// depend on inference.
fn read_raw_frame(bytes: &[u8], source_name: &str) -> Result<DataFrame, AsosDataError> {
    let io_error = |e| AsosDataError::CsvReadIo {
        source_name: source_name.to_string(),
        source: e,
    };
    let polars_error = |e| AsosDataError::CsvReadPolars {
        source_name: source_name.to_string(),
        source: e,
    };

    let mut temp_file = NamedTempFile::new().map_err(io_error)?;
    temp_file.write_all(bytes).map_err(io_error)?;
    temp_file.flush().map_err(io_error)?;

    CsvReadOptions::default()
        .with_has_header(false)
        .with_skip_rows(1)
        .with_schema(Some(Arc::new(raw_schema())))
        .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
        .map_err(polars_error)?
        .finish()
        .map_err(polars_error)
}

fn raw_schema() -> Schema {
    let mut schema = Schema::with_capacity(RAW_COLUMN_COUNT);
    for (index, name) in COLUMN_NAMES.iter().enumerate() {
        let dtype = match index {
            0 | 1 | 4 => DataType::String,
            _ => DataType::Float64,
        };
        schema.with_column(format!("raw_{name}").into(), dtype);
    }
    schema.with_column(TRAILER_COLUMN.into(), DataType::String);
    schema
}

/// Parses the observation time column into epoch milliseconds.
///
/// A single null or unparsable value fails the whole read.
fn parse_time_column(df: &DataFrame, source_name: &str) -> Result<Vec<i64>, AsosDataError> {
    let values = df
        .column(COL_UTC)
        .map_err(|e| AsosDataError::ColumnNotFound(COL_UTC.to_string(), e))?
        .str()?;

    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .and_then(parse_observation_time)
                .map(|time| time.timestamp_millis())
                .ok_or_else(|| AsosDataError::InvalidTimestamp {
                    source_name: source_name.to_string(),
                    row,
                    value: value.map(str::to_string),
                })
        })
        .collect()
}

/// Parses one observation time as written by the archive.
pub(crate) fn parse_observation_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::asos_frame::{COL_STATION_ID, COL_TEMPERATURE};
    use chrono::TimeZone;

    const HEADER: &str = "station,station_name,lat,lon,valid(UTC),tmpf,dwpf,sknt,drct,\n";

    fn payload(rows: &[&str]) -> Vec<u8> {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text.into_bytes()
    }

    #[test]
    fn test_parse_rows() {
        let bytes = payload(&[
            "AMW,Ames,41.990439,-93.618515,2018-03-25 12:00,29,24,8,113,",
            "AMW,Ames,41.990439,-93.618515,2018-03-25 12:01,29,24,,115,",
        ]);

        let frame = parse_asos_csv(&bytes, "test").unwrap();

        assert_eq!(frame.len(), 2);
        let names: Vec<String> = frame
            .frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, COLUMN_NAMES);

        let observations = frame.observations().unwrap();
        let first = &observations[0];
        assert_eq!(first.station_id, "AMW");
        assert_eq!(first.station_name, "Ames");
        assert_eq!(first.latitude_deg, 41.990439);
        assert_eq!(first.longitude_deg, -93.618515);
        assert_eq!(first.utc, Utc.with_ymd_and_hms(2018, 3, 25, 12, 0, 0).unwrap());
        assert_eq!(first.temperature_degf, Some(29.0));
        assert_eq!(first.dewpoint_degf, Some(24.0));
        assert_eq!(first.wind_speed_knots, Some(8.0));
        assert_eq!(first.wind_direction_degrees, Some(113.0));
        assert_eq!(observations[1].wind_speed_knots, None);
    }

    #[test]
    fn test_header_only_is_empty_frame() {
        let frame = parse_asos_csv(HEADER.as_bytes(), "future").unwrap();

        assert!(frame.is_empty());
        assert!(frame.frame.column(COL_STATION_ID).is_ok());
        assert!(frame.frame.column(COL_TEMPERATURE).is_ok());
    }

    #[test]
    fn test_empty_payload_is_an_error() {
        let result = parse_asos_csv(b"\n\n", "nothing");
        assert!(matches!(result, Err(AsosDataError::EmptyPayload(_))));
    }

    #[test]
    fn test_missing_trailer_is_schema_mismatch() {
        let bytes = b"station,station_name,lat,lon,valid(UTC),tmpf,dwpf,sknt,drct\n\
                      AMW,Ames,41.99,-93.61,2018-03-25 12:00,29,24,8,113\n";

        let result = parse_asos_csv(bytes, "no-trailer");

        assert!(matches!(
            result,
            Err(AsosDataError::SchemaMismatch {
                row: None,
                expected: 10,
                found: 9,
                ..
            })
        ));
    }

    #[test]
    fn test_short_data_row_is_schema_mismatch() {
        let bytes = payload(&[
            "AMW,Ames,41.990439,-93.618515,2018-03-25 12:00,29,24,8,113,",
            "AMW,Ames,41.99,-93.61,2018-03-25 12:01,29,24",
        ]);

        let result = parse_asos_csv(&bytes, "short-row");

        assert!(matches!(
            result,
            Err(AsosDataError::SchemaMismatch {
                row: Some(1),
                expected: 10,
                found: 7,
                ..
            })
        ));
    }

    #[test]
    fn test_long_data_row_is_schema_mismatch() {
        let bytes = payload(&["AMW,Ames,41.990439,-93.618515,2018-03-25 12:00,29,24,8,113,,extra"]);

        let result = parse_asos_csv(&bytes, "long-row");

        assert!(matches!(
            result,
            Err(AsosDataError::SchemaMismatch {
                row: Some(0),
                found: 11,
                ..
            })
        ));
    }

    #[test]
    fn test_unparsable_time_fails_the_read() {
        let bytes = payload(&[
            "AMW,Ames,41.990439,-93.618515,2018-03-25 12:00,29,24,8,113,",
            "AMW,Ames,41.990439,-93.618515,yesterday,29,24,8,113,",
        ]);

        let result = parse_asos_csv(&bytes, "bad-time");

        match result {
            Err(AsosDataError::InvalidTimestamp { row, value, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(value.as_deref(), Some("yesterday"));
            }
            other => panic!("expected InvalidTimestamp, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_time_fails_the_read() {
        let bytes = payload(&["AMW,Ames,41.990439,-93.618515,,29,24,8,113,"]);

        let result = parse_asos_csv(&bytes, "no-time");

        assert!(matches!(
            result,
            Err(AsosDataError::InvalidTimestamp { row: 0, .. })
        ));
    }

    #[test]
    fn test_non_numeric_measurement_is_csv_error() {
        let bytes = payload(&["AMW,Ames,41.990439,-93.618515,2018-03-25 12:00,warm,24,8,113,"]);

        let result = parse_asos_csv(&bytes, "bad-number");

        assert!(matches!(result, Err(AsosDataError::CsvReadPolars { .. })));
    }

    #[test]
    fn test_parse_observation_time_formats() {
        let expected = Utc.with_ymd_and_hms(2018, 3, 25, 12, 0, 0).unwrap();

        assert_eq!(parse_observation_time("2018-03-25 12:00"), Some(expected));
        assert_eq!(parse_observation_time("2018-03-25 12:00:00"), Some(expected));
        assert_eq!(parse_observation_time("2018-03-25T12:00:00Z"), Some(expected));
        assert_eq!(parse_observation_time(" 2018-03-25 12:00 "), Some(expected));
        assert_eq!(parse_observation_time("25/03/2018"), None);
    }
}
