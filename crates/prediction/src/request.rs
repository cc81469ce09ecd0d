//! Prediction requests and their validation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, FixedOffset, Offset, TimeZone, Utc};
use harmonics::PhaseConvention;
use serde::{Deserialize, Serialize};

use crate::error::{PredictionError, Result};

/// Longest allowed prediction range.
pub const MAX_RANGE_DAYS: i64 = 365;
/// Most output points a single request may produce.
pub const MAX_POINTS: i64 = 10_000;

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Which constituent source answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Per-station CSV tables.
    Csv,
    /// Gridded global model sampled at a location.
    Fes,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Csv => "csv",
            SourceKind::Fes => "fes",
        }
    }

    /// Epoch the source's phases are published against.
    pub fn reference_epoch(&self) -> DateTime<Utc> {
        match self {
            SourceKind::Csv => DateTime::<Utc>::UNIX_EPOCH,
            SourceKind::Fes => Utc
                .with_ymd_and_hms(2012, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            SourceKind::Csv => "Station harmonic constants (CSV)",
            SourceKind::Fes => "FES2014/2022 tidal model",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = PredictionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(SourceKind::Csv),
            "fes" => Ok(SourceKind::Fes),
            other => Err(PredictionError::invalid(format!("unknown source: {other}"))),
        }
    }
}

/// Time zone used for formatted timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputZone {
    #[default]
    Utc,
    /// Japan Standard Time, `+09:00`.
    Jst,
}

impl OutputZone {
    /// `"jst"`/`"JST"` selects JST; anything else is UTC.
    pub fn from_selector(s: &str) -> Self {
        match s {
            "jst" | "JST" => OutputZone::Jst,
            _ => OutputZone::Utc,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OutputZone::Utc => "+00:00",
            OutputZone::Jst => "+09:00",
        }
    }

    pub fn offset(&self) -> FixedOffset {
        match self {
            OutputZone::Utc => Utc.fix(),
            OutputZone::Jst => FixedOffset::east_opt(JST_OFFSET_SECS).unwrap_or(Utc.fix()),
        }
    }
}

/// The validated location selector of a request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selector<'a> {
    Station(&'a str),
    Location { lat: f64, lon: f64 },
}

impl Selector<'_> {
    pub fn source(&self) -> SourceKind {
        match self {
            Selector::Station(_) => SourceKind::Csv,
            Selector::Location { .. } => SourceKind::Fes,
        }
    }

    pub fn location(&self) -> Option<(f64, f64)> {
        match *self {
            Selector::Location { lat, lon } => Some((lat, lon)),
            Selector::Station(_) => None,
        }
    }
}

/// A request for a tide height series and its extrema.
///
/// Exactly one of `location` and `station_id` must be set.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    /// `(lat, lon)` in degrees.
    pub location: Option<(f64, f64)>,
    pub station_id: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub interval: Duration,
    /// Datum label echoed in the response. Defaults to `"MSL"`.
    pub datum: Option<String>,
    /// Explicit source. Must agree with the selector when set.
    pub source: Option<SourceKind>,
    /// Added to every height. Disables the automatic datum offset.
    pub datum_offset_m: Option<f64>,
    pub timezone: OutputZone,
    pub phase_convention: PhaseConvention,
}

impl PredictionRequest {
    pub fn for_location(
        lat: f64,
        lon: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Duration,
    ) -> Self {
        Self::new(Some((lat, lon)), None, start, end, interval)
    }

    pub fn for_station(
        station_id: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Duration,
    ) -> Self {
        Self::new(None, Some(station_id.into()), start, end, interval)
    }

    fn new(
        location: Option<(f64, f64)>,
        station_id: Option<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: Duration,
    ) -> Self {
        Self {
            location,
            station_id,
            start,
            end,
            interval,
            datum: None,
            source: None,
            datum_offset_m: None,
            timezone: OutputZone::Utc,
            phase_convention: PhaseConvention::Greenwich,
        }
    }

    pub fn with_datum_offset(mut self, offset_m: f64) -> Self {
        self.datum_offset_m = Some(offset_m);
        self
    }

    pub fn with_timezone(mut self, zone: OutputZone) -> Self {
        self.timezone = zone;
        self
    }

    pub fn with_phase_convention(mut self, convention: PhaseConvention) -> Self {
        self.phase_convention = convention;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_datum(mut self, datum: impl Into<String>) -> Self {
        self.datum = Some(datum.into());
        self
    }

    /// The single location selector. An empty station id counts as absent.
    pub fn selector(&self) -> Result<Selector<'_>> {
        let station = self.station_id.as_deref().filter(|id| !id.is_empty());
        match (self.location, station) {
            (Some(_), Some(_)) => Err(PredictionError::invalid(
                "lat/lon and station_id are mutually exclusive",
            )),
            (None, None) => Err(PredictionError::invalid(
                "either lat/lon or station_id must be provided",
            )),
            (Some((lat, lon)), None) => Ok(Selector::Location { lat, lon }),
            (None, Some(id)) => Ok(Selector::Station(id)),
        }
    }

    /// Check the selector, coordinates, time range and interval.
    pub fn validate(&self) -> Result<()> {
        let selector = self.selector()?;

        if let Some((lat, lon)) = selector.location() {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(PredictionError::invalid("latitude must be between -90 and 90"));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(PredictionError::invalid("longitude must be between -180 and 180"));
            }
        }

        match (self.source, selector) {
            (Some(SourceKind::Fes), Selector::Station(_)) => {
                return Err(PredictionError::invalid(
                    "FES source does not support station_id - use lat/lon instead",
                ));
            }
            (Some(SourceKind::Csv), Selector::Location { .. }) => {
                return Err(PredictionError::invalid(
                    "CSV source does not support lat/lon - use station_id instead",
                ));
            }
            _ => {}
        }

        if self.start >= self.end {
            return Err(PredictionError::invalid("start time must be before end time"));
        }

        if self.interval < Duration::minutes(1) {
            return Err(PredictionError::invalid("interval must be at least 1 minute"));
        }
        if self.interval > Duration::hours(6) {
            return Err(PredictionError::invalid("interval must be at most 6 hours"));
        }

        let range = self.end - self.start;
        if range > Duration::days(MAX_RANGE_DAYS) {
            return Err(PredictionError::invalid(format!(
                "time range must be at most {MAX_RANGE_DAYS} days"
            )));
        }

        let points = range.num_milliseconds() / self.interval.num_milliseconds();
        if points > MAX_POINTS {
            return Err(PredictionError::invalid(format!(
                "too many prediction points ({points}) - reduce time range or increase interval"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tide_common::Classify;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn location() -> PredictionRequest {
        PredictionRequest::for_location(35.0, 139.0, t0(), t0() + Duration::days(1), Duration::minutes(10))
    }

    fn message(request: &PredictionRequest) -> String {
        let err = request.validate().unwrap_err();
        assert!(err.is_validation());
        err.to_string()
    }

    #[test]
    fn test_valid_requests() {
        assert!(location().validate().is_ok());

        let station = PredictionRequest::for_station("TK", t0(), t0() + Duration::hours(2), Duration::minutes(30));
        assert!(station.validate().is_ok());
        assert_eq!(station.selector().unwrap(), Selector::Station("TK"));
    }

    #[test]
    fn test_selector_exclusive() {
        let mut both = location();
        both.station_id = Some("TK".into());
        assert!(message(&both).contains("mutually exclusive"));

        let mut neither = location();
        neither.location = None;
        assert!(message(&neither).contains("must be provided"));

        // An empty station id is the same as none
        neither.station_id = Some(String::new());
        assert!(message(&neither).contains("must be provided"));
    }

    #[test]
    fn test_coordinate_ranges() {
        let mut request = location();
        request.location = Some((90.5, 0.0));
        assert!(message(&request).contains("latitude"));

        request.location = Some((0.0, -180.5));
        assert!(message(&request).contains("longitude"));

        request.location = Some((-90.0, 180.0));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_source_must_match_selector() {
        let request = location().with_source(SourceKind::Csv);
        assert!(message(&request).contains("CSV source"));

        let request = location().with_source(SourceKind::Fes);
        assert!(request.validate().is_ok());

        let station = PredictionRequest::for_station("TK", t0(), t0() + Duration::hours(2), Duration::minutes(30))
            .with_source(SourceKind::Fes);
        assert!(message(&station).contains("FES source"));
    }

    #[test]
    fn test_time_range() {
        let mut request = location();
        request.end = request.start;
        assert!(message(&request).contains("before end"));

        request.end = request.start + Duration::days(366);
        request.interval = Duration::hours(1);
        assert!(message(&request).contains("365 days"));
    }

    #[test]
    fn test_interval_bounds() {
        let mut request = location();
        request.interval = Duration::seconds(59);
        assert!(message(&request).contains("at least 1 minute"));

        request.interval = Duration::hours(6) + Duration::seconds(1);
        assert!(message(&request).contains("at most 6 hours"));

        request.interval = Duration::hours(6);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_point_limit() {
        let mut request = location();
        request.interval = Duration::minutes(1);

        request.end = request.start + Duration::minutes(10_000);
        assert!(request.validate().is_ok());

        request.end = request.start + Duration::minutes(10_001);
        assert!(message(&request).contains("too many prediction points (10001)"));
    }

    #[test]
    fn test_source_kind() {
        assert_eq!("csv".parse::<SourceKind>().unwrap(), SourceKind::Csv);
        assert_eq!("fes".parse::<SourceKind>().unwrap(), SourceKind::Fes);
        assert!("FES2022".parse::<SourceKind>().is_err());

        assert_eq!(SourceKind::Csv.reference_epoch(), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(
            SourceKind::Fes.reference_epoch(),
            Utc.with_ymd_and_hms(2012, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(SourceKind::Fes.to_string(), "fes");
    }

    #[test]
    fn test_output_zone() {
        assert_eq!(OutputZone::from_selector("jst"), OutputZone::Jst);
        assert_eq!(OutputZone::from_selector("JST"), OutputZone::Jst);
        assert_eq!(OutputZone::from_selector("Asia/Tokyo"), OutputZone::Utc);
        assert_eq!(OutputZone::from_selector(""), OutputZone::Utc);

        assert_eq!(OutputZone::Jst.label(), "+09:00");
        assert_eq!(OutputZone::Utc.label(), "+00:00");
        assert_eq!(OutputZone::Jst.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(OutputZone::Utc.offset().local_minus_utc(), 0);
    }
}
