//! Constituent parameters sampled from gridded harmonic constants.
//!
//! Global constituent grids run to hundreds of megabytes, so nothing is
//! cached here: every request opens each file, reads the 2×2 block around
//! the query and interpolates it.

use std::path::{Path, PathBuf};

use grid_processor::{Grid2D, IndexWindow};
use harmonics::{constituent_speed, ConstituentParam, LOCATION_PRIORITY};
use netcdf_parser::{names, GridFile, NetCdfError};
use tide_common::{normalize_lon_for_axis, wrap_degrees};
use tracing::{debug, warn};

use crate::discovery::FileIndex;
use crate::error::{Result, StoreError};
use crate::source::ConstituentSource;

/// Path fragment of products whose amplitudes are stored in centimetres.
const CENTIMETRE_PRODUCT: &str = "ocean_tide";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Amplitude,
    Phase,
}

impl Field {
    fn kind(self) -> &'static str {
        match self {
            Field::Amplitude => "amplitude",
            Field::Phase => "phase",
        }
    }

    fn candidates(self) -> &'static [&'static str] {
        match self {
            Field::Amplitude => names::AMPLITUDE,
            Field::Phase => names::PHASE,
        }
    }

    /// Derive the field from a complex harmonic constant.
    fn from_complex(self, re: f64, im: f64) -> f64 {
        match self {
            Field::Amplitude => re.hypot(im),
            Field::Phase => wrap_degrees(im.atan2(re).to_degrees()),
        }
    }
}

/// Samples constituent grids found below a root directory.
#[derive(Debug, Clone)]
pub struct LocationGridSampler {
    root: PathBuf,
}

impl LocationGridSampler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Priority constituents with both amplitude and phase files on disk.
    pub fn available_constituents(&self) -> Result<Vec<&'static str>> {
        let index = FileIndex::scan(&self.root)?;
        Ok(LOCATION_PRIORITY
            .iter()
            .copied()
            .filter(|name| index.constituent_files(name).is_some())
            .collect())
    }

    /// Amplitude and phase of one constituent at `(lat, lon)`.
    pub fn sample_constituent(
        &self,
        amplitude_path: &Path,
        phase_path: &Path,
        name: &str,
        lat: f64,
        lon: f64,
    ) -> Result<ConstituentParam> {
        let speed = constituent_speed(name).ok_or_else(|| StoreError::UnknownConstituent(name.to_string()))?;
        let amplitude = sample_field(amplitude_path, Field::Amplitude, lat, lon)?;
        let phase = sample_field(phase_path, Field::Phase, lat, lon)?;
        Ok(ConstituentParam::new(name, amplitude, wrap_degrees(phase), speed))
    }
}

impl ConstituentSource for LocationGridSampler {
    fn kind(&self) -> &'static str {
        "fes"
    }

    fn load_for_station(&self, _station_id: &str) -> Result<Vec<ConstituentParam>> {
        Err(StoreError::unsupported(
            "gridded store does not support station_id queries - use lat/lon parameters",
        ))
    }

    fn load_for_location(&self, lat: f64, lon: f64) -> Result<Vec<ConstituentParam>> {
        let index = FileIndex::scan(&self.root)?;

        let mut params = Vec::new();
        let mut found_any = false;
        for name in LOCATION_PRIORITY {
            let Some((amp_path, pha_path)) = index.constituent_files(name) else {
                continue;
            };
            found_any = true;

            match self.sample_constituent(amp_path, pha_path, name, lat, lon) {
                Ok(param) => params.push(param),
                Err(StoreError::Grid(source)) if source.is_out_of_bounds() => {
                    return Err(StoreError::OutsideCoverage {
                        constituent: name.to_string(),
                        lat,
                        lon,
                        source,
                    });
                }
                Err(err) => warn!(
                    constituent = %name,
                    path = %amp_path.display(),
                    error = %err,
                    "Skipping constituent that could not be sampled"
                ),
            }
        }

        if !found_any {
            return Err(StoreError::NoGridFiles(self.root.clone()));
        }
        if params.is_empty() {
            return Err(StoreError::NoConstituents { lat, lon });
        }

        debug!(lat, lon, count = params.len(), "Sampled gridded constituents");
        Ok(params)
    }
}

/// Interpolate one field of the grid file at `path`.
///
/// Reads the 2×2 block bracketing the query. Files without a direct
/// amplitude/phase variable fall back to a real/imaginary pair.
fn sample_field(path: &Path, field: Field, lat: f64, lon: f64) -> Result<f64> {
    let file = GridFile::open(path)?;
    let coords = file.read_coordinates()?;
    let window = IndexWindow::cell(&coords.lats, &coords.lons, lat, lon)?;

    let cell = match file.find_variable(field.candidates()) {
        Some(var) => file.read_grid(&var, &coords, window)?,
        None => {
            let (Some(re), Some(im)) = (file.find_variable(names::REAL), file.find_variable(names::IMAG))
            else {
                return Err(NetCdfError::not_found(field.kind(), field.candidates()).into());
            };
            let re_cell = file.read_grid(&re, &coords, window)?;
            let im_values = file.read_window(&im, &coords, window)?;
            let values = re_cell
                .values()
                .iter()
                .zip(&im_values)
                .map(|(&r, &i)| field.from_complex(r, i))
                .collect();
            Grid2D::new(re_cell.x().to_vec(), re_cell.y().to_vec(), values)?
        }
    };

    let lon_q = normalize_lon_for_axis(&coords.lons, lon);
    let mut value = cell.interpolate_at(lon_q, lat)?;
    if field == Field::Amplitude && is_centimetre_product(path) {
        value /= 100.0;
    }
    Ok(value)
}

fn is_centimetre_product(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().contains(CENTIMETRE_PRODUCT)
}
