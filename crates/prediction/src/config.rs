//! Configuration for the prediction service.

use std::path::PathBuf;

use grid_processor::GridProcessorConfig;
use serde::{Deserialize, Serialize};

/// Where the service finds its data files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// Directory of per-station constituent CSV files.
    pub data_dir: PathBuf,
    /// Root of the gridded constituent files, searched recursively.
    pub fes_dir: PathBuf,
    /// Seabed elevation grid.
    pub bathymetry_gebco_path: Option<PathBuf>,
    /// Mean sea surface grid, heights above the ellipsoid.
    pub bathymetry_mss_path: Option<PathBuf>,
    /// Geoid height grid used to correct the mean sea surface.
    pub geoid_egm2008_path: Option<PathBuf>,
    /// External nodal coefficient table. A missing file disables it.
    pub astro_coeffs_path: PathBuf,
    pub datum_offsets_path: PathBuf,
    pub station_overrides_path: PathBuf,
    /// Window settings for the metadata grids.
    pub grid: GridProcessorConfig,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            fes_dir: PathBuf::from("./data/fes"),
            bathymetry_gebco_path: None,
            bathymetry_mss_path: None,
            geoid_egm2008_path: None,
            astro_coeffs_path: PathBuf::from("data/astro_coeffs.json"),
            datum_offsets_path: PathBuf::from("data/jma_datum_offsets.json"),
            station_overrides_path: PathBuf::from("data/jma_station_overrides.json"),
            grid: GridProcessorConfig::default(),
        }
    }
}

impl PredictionConfig {
    /// Load configuration from environment variables.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self {
            grid: GridProcessorConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = env_path("DATA_DIR") {
            config.data_dir = dir;
        }
        if let Some(dir) = env_path("FES_DIR") {
            config.fes_dir = dir;
        }
        config.bathymetry_gebco_path = env_path("BATHYMETRY_GEBCO_PATH");
        config.bathymetry_mss_path = env_path("BATHYMETRY_MSS_PATH");
        config.geoid_egm2008_path = env_path("GEOID_EGM2008_PATH");
        if let Some(path) = env_path("ASTRO_COEFFS_PATH") {
            config.astro_coeffs_path = path;
        }
        if let Some(path) = env_path("DATUM_OFFSETS_PATH") {
            config.datum_offsets_path = path;
        }
        if let Some(path) = env_path("STATION_OVERRIDES_PATH") {
            config.station_overrides_path = path;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        if self.fes_dir.as_os_str().is_empty() {
            return Err("fes_dir must not be empty".to_string());
        }

        self.grid.validate()
    }

    /// Whether any metadata grid is configured.
    pub fn has_metadata(&self) -> bool {
        self.bathymetry_gebco_path.is_some() || self.bathymetry_mss_path.is_some()
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}
