//! Station-keyed constituent tables.
//!
//! Each station has one CSV file `mock_{id}_constituents.csv` in the data
//! directory:
//!
//! ```text
//! constituent,amplitude_m,phase_deg
//! M2,1.0,0.0
//! S2,0.5,30.0
//! ```

use std::path::{Path, PathBuf};

use harmonics::{constituent_speed, ConstituentParam};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::source::ConstituentSource;

const FILE_PREFIX: &str = "mock_";
const FILE_SUFFIX: &str = "_constituents.csv";
const HEADER: [&str; 3] = ["constituent", "amplitude_m", "phase_deg"];

/// Reads per-station constituent tables from a directory.
#[derive(Debug, Clone)]
pub struct StationCsvSource {
    data_dir: PathBuf,
}

impl StationCsvSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the table for `station_id` (ids are matched lower-case).
    pub fn file_path(&self, station_id: &str) -> PathBuf {
        self.data_dir.join(format!(
            "{}{}{}",
            FILE_PREFIX,
            station_id.to_lowercase(),
            FILE_SUFFIX
        ))
    }

    /// Station ids with a table in the data directory.
    pub fn list_stations(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.data_dir).map_err(|e| StoreError::Directory {
            path: self.data_dir.clone(),
            message: e.to_string(),
        })?;

        let mut stations: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let id = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
                (!id.is_empty()).then(|| id.to_string())
            })
            .collect();
        stations.sort();
        Ok(stations)
    }

    fn parse(&self, station_id: &str, path: &Path) -> Result<Vec<ConstituentParam>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| match e.into_kind() {
                csv::ErrorKind::Io(source) => StoreError::StationIo {
                    station: station_id.to_string(),
                    path: path.to_path_buf(),
                    source,
                },
                other => StoreError::invalid_csv(station_id, format!("{:?}", other)),
            })?;

        let header = rdr
            .headers()
            .map_err(|e| StoreError::invalid_csv(station_id, e))?;
        if header.len() != HEADER.len() || header.iter().zip(HEADER).any(|(got, want)| got != want) {
            return Err(StoreError::invalid_csv(
                station_id,
                format!("expected header {:?}, got {:?}", HEADER, header.iter().collect::<Vec<_>>()),
            ));
        }

        let mut constituents = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| StoreError::invalid_csv(station_id, e))?;
            if record.len() != 3 {
                return Err(StoreError::invalid_csv(
                    station_id,
                    format!("expected 3 columns, got {}", record.len()),
                ));
            }

            let name = &record[0];
            let amplitude: f64 = record[1].parse().map_err(|e| {
                StoreError::invalid_csv(station_id, format!("invalid amplitude for constituent {}: {}", name, e))
            })?;
            let phase: f64 = record[2].parse().map_err(|e| {
                StoreError::invalid_csv(station_id, format!("invalid phase for constituent {}: {}", name, e))
            })?;
            let speed = constituent_speed(name)
                .ok_or_else(|| StoreError::UnknownConstituent(name.to_string()))?;

            constituents.push(ConstituentParam::new(name, amplitude, phase, speed));
        }

        if constituents.is_empty() {
            return Err(StoreError::EmptyStation(station_id.to_string()));
        }

        debug!(
            station = %station_id,
            count = constituents.len(),
            path = %path.display(),
            "Loaded station constituents"
        );
        Ok(constituents)
    }
}

impl ConstituentSource for StationCsvSource {
    fn kind(&self) -> &'static str {
        "csv"
    }

    fn load_for_station(&self, station_id: &str) -> Result<Vec<ConstituentParam>> {
        let path = self.file_path(station_id);
        self.parse(station_id, &path)
    }

    fn load_for_location(&self, _lat: f64, _lon: f64) -> Result<Vec<ConstituentParam>> {
        Err(StoreError::unsupported(
            "CSV store does not support lat/lon queries - use a gridded source or specify a station_id",
        ))
    }
}
