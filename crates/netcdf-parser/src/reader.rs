//! Windowed reads of 2D lat/lon grids.

use std::path::{Path, PathBuf};

use grid_processor::{Grid2D, IndexWindow};
use netcdf::types::{FloatType, IntType, NcVariableType};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};
use crate::names;
use crate::native::{silence_hdf5_errors, ValueEncoding};

/// Storage order of a 2D data variable relative to the coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimOrder {
    /// `[lat, lon]`, rows are latitudes.
    LatLon,
    /// `[lon, lat]`, read transposed.
    LonLat,
}

/// The two coordinate axes of a grid file.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

impl Coordinates {
    /// Window covering the whole grid.
    pub fn full_window(&self) -> IndexWindow {
        IndexWindow {
            row_start: 0,
            rows: self.lats.len(),
            col_start: 0,
            cols: self.lons.len(),
        }
    }

    /// Decide how `var` is laid out against these axes.
    ///
    /// A square grid matches both orders and is taken as `[lat, lon]`.
    pub fn dim_order(&self, var: &netcdf::Variable) -> NetCdfResult<DimOrder> {
        let dims: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let (n_lat, n_lon) = (self.lats.len(), self.lons.len());

        match dims.as_slice() {
            [d0, d1] if *d0 == n_lat && *d1 == n_lon => Ok(DimOrder::LatLon),
            [d0, d1] if *d0 == n_lon && *d1 == n_lat => Ok(DimOrder::LonLat),
            _ => Err(NetCdfError::DimensionMismatch {
                name: var.name(),
                dims,
                n_lat,
                n_lon,
            }),
        }
    }
}

/// An open grid file.
///
/// The handle is closed on drop, so a `GridFile` is meant to live for one
/// request: open, read a window, drop.
pub struct GridFile {
    path: PathBuf,
    file: netcdf::File,
}

impl std::fmt::Debug for GridFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GridFile").field("path", &self.path).finish()
    }
}

impl GridFile {
    pub fn open(path: impl AsRef<Path>) -> NetCdfResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path).map_err(|e| NetCdfError::Open {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// First candidate name present in the file.
    pub fn find_variable(&self, candidates: &[&str]) -> Option<netcdf::Variable<'_>> {
        candidates.iter().find_map(|name| self.file.variable(name))
    }

    /// Like [`find_variable`](Self::find_variable), failing with the list of
    /// names tried.
    pub fn require_variable(&self, kind: &str, candidates: &[&str]) -> NetCdfResult<netcdf::Variable<'_>> {
        self.find_variable(candidates)
            .ok_or_else(|| NetCdfError::not_found(kind, candidates))
    }

    /// Read the first candidate that exists and is a 1D numeric variable.
    pub fn read_axis(&self, kind: &str, candidates: &[&str]) -> NetCdfResult<Vec<f64>> {
        for name in candidates {
            let Some(var) = self.file.variable(name) else {
                continue;
            };
            match read_1d(&var) {
                Ok(values) => return Ok(values),
                Err(err) => debug!(
                    path = %self.path.display(),
                    variable = %name,
                    error = %err,
                    "Skipping unusable coordinate candidate"
                ),
            }
        }
        Err(NetCdfError::not_found(kind, candidates))
    }

    /// Latitude and longitude axes under their conventional names.
    pub fn read_coordinates(&self) -> NetCdfResult<Coordinates> {
        Ok(Coordinates {
            lats: self.read_axis("latitude", names::LATITUDE)?,
            lons: self.read_axis("longitude", names::LONGITUDE)?,
        })
    }

    /// Read `window` of `var` as row-major `[lat][lon]` physical values.
    ///
    /// Only the window is read from disk. `[lon, lat]` variables are
    /// transposed; fill values become 0 and packed values are unpacked.
    pub fn read_window(
        &self,
        var: &netcdf::Variable,
        coords: &Coordinates,
        window: IndexWindow,
    ) -> NetCdfResult<Vec<f64>> {
        let order = coords.dim_order(var)?;
        if window.row_range().end > coords.lats.len() || window.col_range().end > coords.lons.len() {
            return Err(NetCdfError::read(
                var.name(),
                format!("window {:?} exceeds the {}x{} grid", window, coords.lats.len(), coords.lons.len()),
            ));
        }

        let rows = window.row_range();
        let cols = window.col_range();
        let mut values = match order {
            DimOrder::LatLon => read_widened(var, (rows, cols))?,
            DimOrder::LonLat => {
                let raw = read_widened(var, (cols, rows))?;
                transpose(&raw, window.cols, window.rows)
            }
        };

        ValueEncoding::of(var).apply(&mut values);
        Ok(values)
    }

    /// Read `window` of `var` into a grid over the matching axis slices.
    pub fn read_grid(
        &self,
        var: &netcdf::Variable,
        coords: &Coordinates,
        window: IndexWindow,
    ) -> NetCdfResult<Grid2D> {
        let values = self.read_window(var, coords, window)?;
        let (y, x) = window.slice_axes(&coords.lats, &coords.lons);
        Ok(Grid2D::new(x, y, values)?)
    }

    /// Read all of `var`. For diagnostics and small grids only.
    pub fn read_full_grid(&self, var: &netcdf::Variable, coords: &Coordinates) -> NetCdfResult<Grid2D> {
        self.read_grid(var, coords, coords.full_window())
    }
}

fn read_1d(var: &netcdf::Variable) -> NetCdfResult<Vec<f64>> {
    let ndims = var.dimensions().len();
    if ndims != 1 {
        return Err(NetCdfError::NotOneDimensional {
            name: var.name(),
            ndims,
        });
    }
    read_widened(var, ..)
}

/// Read `extents` of `var` in its stored type and widen to f64.
fn read_widened<E>(var: &netcdf::Variable, extents: E) -> NetCdfResult<Vec<f64>>
where
    E: TryInto<netcdf::Extents>,
    E::Error: Into<netcdf::Error>,
{
    let result = match var.vartype() {
        NcVariableType::Float(FloatType::F64) => var.get_values::<f64, _>(extents),
        NcVariableType::Float(FloatType::F32) => var.get_values::<f32, _>(extents).map(widen),
        NcVariableType::Int(IntType::I32) => var.get_values::<i32, _>(extents).map(widen),
        NcVariableType::Int(IntType::I16) => var.get_values::<i16, _>(extents).map(widen),
        NcVariableType::Int(IntType::I8) => var.get_values::<i8, _>(extents).map(widen),
        NcVariableType::Int(IntType::U32) => var.get_values::<u32, _>(extents).map(widen),
        NcVariableType::Int(IntType::U16) => var.get_values::<u16, _>(extents).map(widen),
        NcVariableType::Int(IntType::U8) => var.get_values::<u8, _>(extents).map(widen),
        other => {
            return Err(NetCdfError::UnsupportedType {
                name: var.name(),
                vartype: type_name(&other).to_string(),
            })
        }
    };
    result.map_err(|e| NetCdfError::read(var.name(), e))
}

fn widen<T: Into<f64>>(values: Vec<T>) -> Vec<f64> {
    values.into_iter().map(Into::into).collect()
}

fn type_name(vartype: &NcVariableType) -> &'static str {
    match vartype {
        NcVariableType::Int(IntType::I64) => "int64",
        NcVariableType::Int(IntType::U64) => "uint64",
        _ => "non-numeric",
    }
}

/// Row-major `rows × cols` to row-major `cols × rows`.
fn transpose(values: &[f64], rows: usize, cols: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    for c in 0..cols {
        for r in 0..rows {
            out.push(values[r * cols + c]);
        }
    }
    out
}
