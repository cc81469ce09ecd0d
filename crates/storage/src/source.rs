//! The two query modes a constituent source may answer.

use harmonics::ConstituentParam;

use crate::error::Result;
use crate::location::LocationGridSampler;
use crate::station::StationCsvSource;

/// Resolves harmonic constants for a station or a location.
///
/// Station-keyed and grid-keyed sources have disjoint inputs, so each
/// implementation answers one mode and rejects the other with
/// [`StoreError::Unsupported`](crate::StoreError::Unsupported).
pub trait ConstituentSource: Send + Sync {
    /// Short source label (`"csv"`, `"fes"`).
    fn kind(&self) -> &'static str;

    fn load_for_station(&self, station_id: &str) -> Result<Vec<ConstituentParam>>;

    fn load_for_location(&self, lat: f64, lon: f64) -> Result<Vec<ConstituentParam>>;
}

/// The closed set of sources the service can be configured with.
#[derive(Debug)]
pub enum ConstituentStore {
    Station(StationCsvSource),
    Location(LocationGridSampler),
}

impl ConstituentSource for ConstituentStore {
    fn kind(&self) -> &'static str {
        match self {
            ConstituentStore::Station(s) => s.kind(),
            ConstituentStore::Location(s) => s.kind(),
        }
    }

    fn load_for_station(&self, station_id: &str) -> Result<Vec<ConstituentParam>> {
        match self {
            ConstituentStore::Station(s) => s.load_for_station(station_id),
            ConstituentStore::Location(s) => s.load_for_station(station_id),
        }
    }

    fn load_for_location(&self, lat: f64, lon: f64) -> Result<Vec<ConstituentParam>> {
        match self {
            ConstituentStore::Station(s) => s.load_for_location(lat, lon),
            ConstituentStore::Location(s) => s.load_for_location(lat, lon),
        }
    }
}

impl From<StationCsvSource> for ConstituentStore {
    fn from(source: StationCsvSource) -> Self {
        ConstituentStore::Station(source)
    }
}

impl From<LocationGridSampler> for ConstituentStore {
    fn from(source: LocationGridSampler) -> Self {
        ConstituentStore::Location(source)
    }
}
