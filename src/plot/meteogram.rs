//! Renders observations as a two-panel meteogram.
//!
//! The upper panel fills temperature and dewpoint down to a shared floor. The
//! lower panel fills wind speed and scatters wind direction on a secondary
//! axis. Both panels share the time axis.

use crate::plot::error::PlotError;
use crate::types::asos_frame::{COL_TEMPERATURE, COL_WIND_SPEED};
use crate::types::observation::Observation;
use bon::Builder;
use chrono::{DateTime, Duration, Utc};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const TAB_RED: RGBColor = RGBColor(214, 39, 40);
const TAB_GREEN: RGBColor = RGBColor(44, 160, 44);
const TAB_BLUE: RGBColor = RGBColor(31, 119, 180);
const TAB_OLIVE: RGBColor = RGBColor(188, 189, 34);

/// Padding added around data limits on the y axes.
pub const Y_PADDING: f64 = 5.0;

/// Wind direction axis limits: 0 to 360 degrees with some room either side.
pub const DIRECTION_LIMITS: (f64, f64) = (-10.0, 370.0);

/// Directions marked by reference lines when `direction_markers` is set.
pub const DIRECTION_FIDUCIALS: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Rendering options for [`plot_meteogram`].
///
/// # Examples
///
/// ```
/// use meteogram::MeteogramOptions;
///
/// let options = MeteogramOptions::builder().direction_markers(true).build();
/// assert_eq!(options.width, 1000);
/// assert!(options.direction_markers);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct MeteogramOptions {
    /// Image width in pixels.
    #[builder(default = 1000)]
    pub width: u32,
    /// Image height in pixels.
    #[builder(default = 500)]
    pub height: u32,
    /// Draw horizontal lines at 0, 90, 180 and 270 degrees on the direction axis.
    #[builder(default)]
    pub direction_markers: bool,
    /// Draw axis descriptions (°F, Knots, Degrees, Observation Time).
    #[builder(default = true)]
    pub axis_labels: bool,
}

impl Default for MeteogramOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Axis limits and series of a meteogram, computed before drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct MeteogramLayout {
    /// First and last observation time; a single instant is widened by a minute each way.
    pub time_limits: (DateTime<Utc>, DateTime<Utc>),
    /// `(min(temperature, dewpoint) - 5, max(temperature, dewpoint) + 5)`, in °F.
    pub temperature_limits: (f64, f64),
    /// `(min(speed) - 5, max(speed) + 5)`, in knots.
    pub wind_speed_limits: (f64, f64),
    temperature: Vec<(f64, f64)>,
    dewpoint: Vec<(f64, f64)>,
    wind_speed: Vec<(f64, f64)>,
    wind_direction: Vec<(f64, f64)>,
}

impl MeteogramLayout {
    /// Computes limits and series from observations.
    ///
    /// # Errors
    ///
    /// Returns [`PlotError::EmptyData`] for an empty slice and
    /// [`PlotError::NoValues`] when temperature/dewpoint or wind speed are
    /// missing in every observation.
    pub fn from_observations(observations: &[Observation]) -> Result<Self, PlotError> {
        let (Some(first), Some(last)) = (
            observations.iter().map(|obs| obs.utc).min(),
            observations.iter().map(|obs| obs.utc).max(),
        ) else {
            return Err(PlotError::EmptyData);
        };
        let time_limits = if first == last {
            (first - Duration::minutes(1), last + Duration::minutes(1))
        } else {
            (first, last)
        };

        let origin = time_limits.0;
        let series = |value: fn(&Observation) -> Option<f64>| -> Vec<(f64, f64)> {
            observations
                .iter()
                .filter_map(|obs| value(obs).map(|v| (seconds_since(origin, obs.utc), v)))
                .collect()
        };
        let temperature = series(|obs| obs.temperature_degf);
        let dewpoint = series(|obs| obs.dewpoint_degf);
        let wind_speed = series(|obs| obs.wind_speed_knots);
        let wind_direction = series(|obs| obs.wind_direction_degrees);

        let (temperature_min, temperature_max) =
            value_limits(temperature.iter().chain(&dewpoint))
                .ok_or_else(|| PlotError::NoValues(COL_TEMPERATURE.to_string()))?;
        let (speed_min, speed_max) = value_limits(wind_speed.iter())
            .ok_or_else(|| PlotError::NoValues(COL_WIND_SPEED.to_string()))?;

        Ok(Self {
            time_limits,
            temperature_limits: (temperature_min - Y_PADDING, temperature_max + Y_PADDING),
            wind_speed_limits: (speed_min - Y_PADDING, speed_max + Y_PADDING),
            temperature,
            dewpoint,
            wind_speed,
            wind_direction,
        })
    }

    fn x_range(&self) -> Range<f64> {
        0.0..seconds_since(self.time_limits.0, self.time_limits.1)
    }
}

fn seconds_since(origin: DateTime<Utc>, time: DateTime<Utc>) -> f64 {
    (time - origin).num_milliseconds() as f64 / 1000.0
}

fn value_limits<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> Option<(f64, f64)> {
    points.fold(None, |limits, &(_, value)| match limits {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

/// Renders a meteogram of `observations` as an SVG document.
///
/// # Errors
///
/// Fails with [`PlotError::EmptyData`] on empty input; see
/// [`MeteogramLayout::from_observations`] for the other preconditions.
pub fn plot_meteogram(
    observations: &[Observation],
    options: &MeteogramOptions,
) -> Result<String, PlotError> {
    let layout = MeteogramLayout::from_observations(observations)?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw_meteogram(&root, &layout, options).map_err(|e| PlotError::Drawing(e.to_string()))?;
        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }
    Ok(svg)
}

/// Renders a meteogram and writes the SVG to `path`.
pub fn save_meteogram(
    observations: &[Observation],
    options: &MeteogramOptions,
    path: &Path,
) -> Result<(), PlotError> {
    let svg = plot_meteogram(observations, options)?;
    std::fs::write(path, svg).map_err(|e| PlotError::Write(path.to_path_buf(), e))?;
    info!(
        "Saved meteogram of {} observations to {}",
        observations.len(),
        path.display()
    );
    Ok(())
}

fn draw_meteogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &MeteogramLayout,
    options: &MeteogramOptions,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let panels = root.split_evenly((2, 1));
    let (upper, lower) = (&panels[0], &panels[1]);

    let origin = layout.time_limits.0;
    let time_label = |x: &f64| {
        (origin + Duration::milliseconds((*x * 1000.0).round() as i64))
            .format("%m/%d %H:%M")
            .to_string()
    };

    let (temperature_floor, temperature_ceiling) = layout.temperature_limits;
    let mut temperature_chart = ChartBuilder::on(upper)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 30)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .build_cartesian_2d(layout.x_range(), temperature_floor..temperature_ceiling)?;

    let mut mesh = temperature_chart.configure_mesh();
    mesh.x_label_formatter(&time_label);
    if options.axis_labels {
        mesh.y_desc("\u{b0}F");
    }
    mesh.draw()?;

    temperature_chart.draw_series(AreaSeries::new(
        layout.temperature.iter().copied(),
        temperature_floor,
        TAB_RED.filled(),
    ))?;
    temperature_chart.draw_series(AreaSeries::new(
        layout.dewpoint.iter().copied(),
        temperature_floor,
        TAB_GREEN.filled(),
    ))?;

    let (speed_floor, speed_ceiling) = layout.wind_speed_limits;
    let mut wind_chart = ChartBuilder::on(lower)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .build_cartesian_2d(layout.x_range(), speed_floor..speed_ceiling)?
        .set_secondary_coord(layout.x_range(), DIRECTION_LIMITS.0..DIRECTION_LIMITS.1);

    let mut mesh = wind_chart.configure_mesh();
    mesh.x_label_formatter(&time_label);
    if options.axis_labels {
        mesh.x_desc("Observation Time").y_desc("Knots");
    }
    mesh.draw()?;

    let mut secondary_axes = wind_chart.configure_secondary_axes();
    if options.axis_labels {
        secondary_axes.y_desc("Degrees");
    }
    secondary_axes.draw()?;

    wind_chart.draw_series(AreaSeries::new(
        layout.wind_speed.iter().copied(),
        speed_floor,
        TAB_BLUE.filled(),
    ))?;
    wind_chart.draw_secondary_series(
        layout
            .wind_direction
            .iter()
            .map(|&point| Circle::new(point, 3, TAB_OLIVE.stroke_width(1))),
    )?;

    if options.direction_markers {
        let x_range = layout.x_range();
        for direction in DIRECTION_FIDUCIALS {
            wind_chart.draw_secondary_series(LineSeries::new(
                [(x_range.start, direction), (x_range.end, direction)],
                BLACK.mix(0.6).stroke_width(1),
            ))?;
        }
    }

    Ok(())
}
