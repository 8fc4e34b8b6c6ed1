//! Obtain, analyze and plot one-minute ASOS surface observations as a meteogram.
//!
//! The pipeline has four parts:
//!
//! * [`build_asos_request_url`] / [`RequestWindow`] turn a station and an
//!   optional time window into an Iowa Environmental Mesonet download URL.
//! * [`download_asos_data`] / [`Asos`] read the archive's CSV (remote or local)
//!   into an [`AsosFrame`].
//! * [`degf_to_degc`], [`exner_function`], [`potential_temperature`] and
//!   [`wind_components`] derive quantities from observations.
//! * [`plot_meteogram`] renders a two-panel meteogram as SVG.

mod asos;
mod asos_data;
mod calc;
mod clock;
mod error;
mod plot;
mod request;
mod types;

pub use asos::Asos;
pub use error::MeteogramError;

pub use calc::*;
pub use clock::{Clock, FixedClock, SystemClock};

pub use request::error::RequestError;
pub use request::window::*;

pub use asos_data::data_loader::{download_asos_data, AsosDataLoader};
pub use asos_data::error::AsosDataError;
pub use asos_data::source::AsosSource;

pub use types::asos_frame::*;
pub use types::observation::Observation;

pub use plot::error::PlotError;
pub use plot::meteogram::*;
