//! Resolves the time window of an archive request and renders its URL.

use crate::clock::Clock;
use crate::request::error::RequestError;
use chrono::{DateTime, Duration, Utc};
use log::debug;

/// The one-minute ASOS download endpoint of the Iowa Environmental Mesonet.
pub const ASOS_ONE_MINUTE_ENDPOINT: &str =
    "https://mesonet.agron.iastate.edu/request/asos/1min_dl.php";

/// Length of the window when no start is given.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

// Order and names matter: the archive matches on the literal query.
const REQUESTED_VARIABLES: &str =
    "vars%5B%5D=tmpf&vars%5B%5D=dwpf&vars%5B%5D=sknt&vars%5B%5D=drct";
const FORMAT_PARAMETERS: &str = "sample=1min&what=view&delim=comma&gis=yes";

/// A station and the inclusive `[start, end]` span of observations to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestWindow {
    station: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl RequestWindow {
    /// Builds a window, filling in missing bounds.
    ///
    /// A missing `end` becomes `clock.now()`, a missing `start` becomes
    /// 24 hours before the end.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::InvalidRange`] when the resolved start is after
    /// the resolved end.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use meteogram::{FixedClock, RequestWindow};
    ///
    /// let now = Utc.with_ymd_and_hms(2018, 3, 26, 12, 0, 0).unwrap();
    /// let window = RequestWindow::resolve("MLI", None, None, &FixedClock(now)).unwrap();
    ///
    /// assert_eq!(window.end(), now);
    /// assert_eq!(window.start(), Utc.with_ymd_and_hms(2018, 3, 25, 12, 0, 0).unwrap());
    /// ```
    pub fn resolve(
        station: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Result<Self, RequestError> {
        let end = end.unwrap_or_else(|| clock.now());
        let start = start.unwrap_or(end - Duration::hours(DEFAULT_WINDOW_HOURS));

        if start > end {
            return Err(RequestError::InvalidRange { start, end });
        }

        debug!("Resolved request window for {}: {} to {}", station, start, end);
        Ok(Self {
            station: station.to_string(),
            start,
            end,
        })
    }

    pub fn station(&self) -> &str {
        &self.station
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// The request URL against the public archive.
    pub fn url(&self) -> String {
        self.url_for(ASOS_ONE_MINUTE_ENDPOINT)
    }

    /// The request URL against another endpoint serving the same query API,
    /// such as a mirror.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{endpoint}?station%5B%5D={station}&tz=UTC&{start}&{end}&{REQUESTED_VARIABLES}&{FORMAT_PARAMETERS}",
            station = self.station,
            start = self.start.format("year1=%Y&month1=%m&day1=%d&hour1=%H&minute1=%M"),
            end = self.end.format("year2=%Y&month2=%m&day2=%d&hour2=%H&minute2=%M"),
        )
    }
}

/// Builds the archive URL for `station` between `start` and `end`.
///
/// Missing bounds are filled in as described on [`RequestWindow::resolve`].
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use meteogram::{build_asos_request_url, SystemClock};
///
/// let start = Utc.with_ymd_and_hms(2018, 1, 5, 1, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2018, 1, 9, 1, 0, 0).unwrap();
/// let url = build_asos_request_url("FSD", Some(start), Some(end), &SystemClock).unwrap();
///
/// assert!(url.contains("day1=05&hour1=01"));
/// assert!(url.contains("day2=09&hour2=01"));
/// ```
pub fn build_asos_request_url(
    station: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    clock: &impl Clock,
) -> Result<String, RequestError> {
    RequestWindow::resolve(station, start, end, clock).map(|window| window.url())
}
