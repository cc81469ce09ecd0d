//! NetCDF and CSV fixtures.
//!
//! [`GridFixture`] writes small lat/lon grids shaped like the tide, bathymetry
//! and geoid products the readers expect: one or two coordinate variables,
//! any number of 2D data variables, optional fill/packing attributes and
//! either `[lat, lon]` or `[lon, lat]` dimension order.

use std::path::{Path, PathBuf};

/// One 2D data variable of a [`GridFixture`].
#[derive(Debug, Clone)]
struct FixtureVar {
    name: String,
    /// Row-major `[lat][lon]` values.
    values: Vec<f64>,
    fill_value: Option<f64>,
    /// When set, values are stored as i16 `round((v - offset) / scale)`.
    packing: Option<(f64, f64)>,
}

/// Builder for a small NetCDF grid file.
#[derive(Debug, Clone)]
pub struct GridFixture {
    lats: Vec<f64>,
    lons: Vec<f64>,
    lat_name: String,
    lon_name: String,
    lon_lat_order: bool,
    vars: Vec<FixtureVar>,
}

impl GridFixture {
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Self {
        Self {
            lats,
            lons,
            lat_name: "lat".to_string(),
            lon_name: "lon".to_string(),
            lon_lat_order: false,
            vars: Vec::new(),
        }
    }

    /// Name the coordinate variables (dimensions stay `lat`/`lon`).
    pub fn coordinate_names(mut self, lat: &str, lon: &str) -> Self {
        self.lat_name = lat.to_string();
        self.lon_name = lon.to_string();
        self
    }

    /// Store data variables as `[lon, lat]`.
    pub fn transposed(mut self) -> Self {
        self.lon_lat_order = true;
        self
    }

    /// Add a f64 variable from row-major `[lat][lon]` values.
    pub fn variable(mut self, name: &str, values: Vec<f64>) -> Self {
        self.vars.push(FixtureVar {
            name: name.to_string(),
            values,
            fill_value: None,
            packing: None,
        });
        self
    }

    /// Add a f64 variable carrying a `_FillValue` attribute.
    pub fn variable_with_fill(mut self, name: &str, values: Vec<f64>, fill_value: f64) -> Self {
        self.vars.push(FixtureVar {
            name: name.to_string(),
            values,
            fill_value: Some(fill_value),
            packing: None,
        });
        self
    }

    /// Add an i16 variable with `scale_factor`/`add_offset`.
    pub fn packed_variable(mut self, name: &str, values: Vec<f64>, scale: f64, offset: f64) -> Self {
        self.vars.push(FixtureVar {
            name: name.to_string(),
            values,
            fill_value: None,
            packing: Some((scale, offset)),
        });
        self
    }

    /// Write the file, panicking on failure.
    pub fn write(&self, path: &Path) -> PathBuf {
        self.try_write(path).expect("Failed to write NetCDF fixture");
        path.to_path_buf()
    }

    fn try_write(&self, path: &Path) -> Result<(), netcdf::Error> {
        let n_lat = self.lats.len();
        let n_lon = self.lons.len();

        let mut file = netcdf::create(path)?;
        file.add_dimension("lat", n_lat)?;
        file.add_dimension("lon", n_lon)?;

        {
            let mut var = file.add_variable::<f64>(&self.lat_name, &["lat"])?;
            var.put_values(&self.lats, ..)?;
        }
        {
            let mut var = file.add_variable::<f64>(&self.lon_name, &["lon"])?;
            var.put_values(&self.lons, ..)?;
        }

        let dims: &[&str] = if self.lon_lat_order {
            &["lon", "lat"]
        } else {
            &["lat", "lon"]
        };

        for fv in &self.vars {
            assert_eq!(
                fv.values.len(),
                n_lat * n_lon,
                "fixture variable '{}' has the wrong number of values",
                fv.name
            );
            let values = if self.lon_lat_order {
                transpose(&fv.values, n_lat, n_lon)
            } else {
                fv.values.clone()
            };

            match fv.packing {
                Some((scale, offset)) => {
                    let raw: Vec<i16> = values
                        .iter()
                        .map(|v| ((v - offset) / scale).round() as i16)
                        .collect();
                    let mut var = file.add_variable::<i16>(&fv.name, dims)?;
                    var.put_attribute("scale_factor", scale)?;
                    var.put_attribute("add_offset", offset)?;
                    var.put_values(&raw, ..)?;
                }
                None => {
                    let mut var = file.add_variable::<f64>(&fv.name, dims)?;
                    if let Some(fill) = fv.fill_value {
                        var.put_attribute("_FillValue", fill)?;
                    }
                    var.put_values(&values, ..)?;
                }
            }
        }

        Ok(())
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

/// Write `{dir}/{file_name}` holding `amplitude` and `phase` variables.
pub fn write_constituent_grid(
    dir: &Path,
    file_name: &str,
    lats: Vec<f64>,
    lons: Vec<f64>,
    amplitude: Vec<f64>,
    phase: Vec<f64>,
) -> PathBuf {
    GridFixture::new(lats, lons)
        .variable("amplitude", amplitude)
        .variable("phase", phase)
        .write(&dir.join(file_name))
}

/// Write `{dir}/{file_name}` holding a `hRe`/`hIm` complex pair.
pub fn write_complex_grid(
    dir: &Path,
    file_name: &str,
    lats: Vec<f64>,
    lons: Vec<f64>,
    real: Vec<f64>,
    imag: Vec<f64>,
) -> PathBuf {
    GridFixture::new(lats, lons)
        .variable("hRe", real)
        .variable("hIm", imag)
        .write(&dir.join(file_name))
}

/// Write a single-variable grid to `path`.
pub fn write_scalar_grid(path: &Path, var_name: &str, lats: Vec<f64>, lons: Vec<f64>, values: Vec<f64>) -> PathBuf {
    GridFixture::new(lats, lons)
        .variable(var_name, values)
        .write(path)
}

/// Write `{dir}/mock_{id}_constituents.csv` from `(name, amplitude_m, phase_deg)` rows.
pub fn write_station_csv(dir: &Path, station_id: &str, rows: &[(&str, f64, f64)]) -> PathBuf {
    let path = dir.join(format!("mock_{}_constituents.csv", station_id.to_lowercase()));
    let mut body = String::from("constituent,amplitude_m,phase_deg\n");
    for (name, amp, phase) in rows {
        body.push_str(&format!("{},{},{}\n", name, amp, phase));
    }
    std::fs::write(&path, body).expect("Failed to write station CSV fixture");
    path
}
