//! This module provides the main entry point for fetching one-minute ASOS
//! observations from the Iowa Environmental Mesonet archive.

use crate::asos_data::data_loader::AsosDataLoader;
use crate::asos_data::source::AsosSource;
use crate::clock::{Clock, SystemClock};
use crate::error::MeteogramError;
use crate::request::window::{RequestWindow, ASOS_ONE_MINUTE_ENDPOINT};
use crate::types::asos_frame::AsosFrame;
use bon::bon;
use chrono::{DateTime, Utc};
use log::info;
use reqwest::Client;
use std::sync::Arc;

/// The client for requesting and loading ASOS observations.
///
/// It owns the HTTP client, the [`Clock`] used to default request windows and
/// the archive endpoint. Create one with [`Asos::default`] for the public
/// archive and the wall clock, or with [`Asos::builder`] to inject either.
///
/// # Examples
///
/// ```no_run
/// # use meteogram::{Asos, MeteogramError};
/// # #[tokio::main]
/// # async fn main() -> Result<(), MeteogramError> {
/// let asos = Asos::default();
///
/// // The last 24 hours at Ames, Iowa
/// let frame = asos.fetch().station("AMW").call().await?;
/// println!("{} observations", frame.len());
/// # Ok(())
/// # }
/// ```
pub struct Asos {
    loader: AsosDataLoader,
    clock: Arc<dyn Clock>,
    endpoint: String,
}

impl Default for Asos {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl Asos {
    /// Creates a client, optionally with an injected clock, endpoint or HTTP client.
    ///
    /// `Asos::builder().build()` (or [`Asos::default`]) targets the public
    /// archive with the wall clock.
    ///
    /// # Arguments
    ///
    /// * `.clock(Arc<dyn Clock>)`: Optional. Supplies "now" for windows without an end. Defaults to [`SystemClock`].
    /// * `.endpoint(String)`: Optional. Base URL of the one-minute download service. Defaults to [`ASOS_ONE_MINUTE_ENDPOINT`].
    /// * `.client(reqwest::Client)`: Optional. HTTP client used for downloads.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use meteogram::{Asos, FixedClock};
    /// use std::sync::Arc;
    ///
    /// let now = Utc.with_ymd_and_hms(2018, 3, 26, 12, 0, 0).unwrap();
    /// let asos = Asos::builder().clock(Arc::new(FixedClock(now))).build();
    ///
    /// let url = asos.request_url().station("MLI").call().unwrap();
    /// assert!(url.contains("year1=2018&month1=03&day1=25&hour1=12"));
    /// ```
    #[builder]
    pub fn new(
        clock: Option<Arc<dyn Clock>>,
        endpoint: Option<String>,
        client: Option<Client>,
    ) -> Self {
        Self {
            loader: AsosDataLoader::new(client.unwrap_or_default()),
            clock: clock.unwrap_or_else(|| Arc::new(SystemClock)),
            endpoint: endpoint.unwrap_or_else(|| ASOS_ONE_MINUTE_ENDPOINT.to_string()),
        }
    }

    /// Resolves a request window for `station` with this client's clock.
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::Request`] if the start is after the end.
    #[builder]
    pub fn window(
        &self,
        station: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<RequestWindow, MeteogramError> {
        Ok(RequestWindow::resolve(station, start, end, &self.clock.as_ref())?)
    }

    /// Builds the download URL for `station`.
    ///
    /// A missing `.end()` defaults to now, a missing `.start()` to 24 hours
    /// before the end.
    #[builder]
    pub fn request_url(
        &self,
        station: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<String, MeteogramError> {
        let window = self
            .window()
            .station(station)
            .maybe_start(start)
            .maybe_end(end)
            .call()?;
        Ok(window.url_for(&self.endpoint))
    }

    /// Downloads the observations of `station` between `.start()` and `.end()`.
    ///
    /// Windows without data give an empty [`AsosFrame`].
    ///
    /// # Errors
    ///
    /// Returns [`MeteogramError::Request`] for an inverted window and
    /// [`MeteogramError::AsosData`] for network, HTTP or parse failures.
    #[builder]
    pub async fn fetch(
        &self,
        station: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<AsosFrame, MeteogramError> {
        let url = self
            .request_url()
            .station(station)
            .maybe_start(start)
            .maybe_end(end)
            .call()?;
        let frame = self.load(AsosSource::Url(url)).await?;
        info!("Fetched {} observations for {}", frame.len(), station);
        Ok(frame)
    }

    /// Loads observations from any URL or local file in the archive's CSV format.
    pub async fn load(&self, source: impl Into<AsosSource>) -> Result<AsosFrame, MeteogramError> {
        Ok(self.loader.load(&source.into()).await?)
    }
}
