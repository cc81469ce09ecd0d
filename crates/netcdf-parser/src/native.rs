//! Thin helpers over the native netcdf library.
//!
//! Attribute lookups go through [`has_attr`] first: asking the library for an
//! attribute that does not exist makes HDF5 print a diagnostic to stderr even
//! though the Rust side handles the error.

use std::sync::Once;

/// Attribute names that mark missing values, in lookup order.
pub const FILL_VALUE_ATTRS: [&str; 2] = ["_FillValue", "missing_value"];

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when probing candidate
/// variable names that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// Safe to call any number of times; only the first call has an effect.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
pub fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Numeric attribute widened to f64.
pub fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// How raw stored values map to physical values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueEncoding {
    /// Raw values equal to any of these are missing.
    pub fill_values: Vec<f64>,
    pub scale_factor: f64,
    pub add_offset: f64,
}

impl Default for ValueEncoding {
    fn default() -> Self {
        Self {
            fill_values: Vec::new(),
            scale_factor: 1.0,
            add_offset: 0.0,
        }
    }
}

impl ValueEncoding {
    /// Read `_FillValue`, `missing_value`, `scale_factor` and `add_offset`.
    ///
    /// A zero scale factor is ignored.
    pub fn of(var: &netcdf::Variable) -> Self {
        let fill_values = FILL_VALUE_ATTRS
            .iter()
            .filter_map(|name| get_f64_attr(var, name))
            .collect();
        let scale_factor = get_f64_attr(var, "scale_factor")
            .filter(|s| *s != 0.0 && s.is_finite())
            .unwrap_or(1.0);
        let add_offset = get_f64_attr(var, "add_offset")
            .filter(|o| o.is_finite())
            .unwrap_or(0.0);

        Self {
            fill_values,
            scale_factor,
            add_offset,
        }
    }

    pub fn is_fill(&self, raw: f64) -> bool {
        self.fill_values
            .iter()
            .any(|&fill| raw == fill || (raw.is_nan() && fill.is_nan()))
    }

    /// Physical value of one raw sample. Missing samples decode to 0.
    pub fn decode(&self, raw: f64) -> f64 {
        if self.is_fill(raw) {
            0.0
        } else {
            raw * self.scale_factor + self.add_offset
        }
    }

    /// Decode a buffer in place.
    pub fn apply(&self, values: &mut [f64]) {
        if self.fill_values.is_empty() && self.scale_factor == 1.0 && self.add_offset == 0.0 {
            return;
        }
        for v in values.iter_mut() {
            *v = self.decode(*v);
        }
    }
}
