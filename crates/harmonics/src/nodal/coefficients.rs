//! External per-constituent nodal coefficient table.
//!
//! The table lets operators refine individual constituents without a
//! rebuild. Each entry expresses `f` and `u` either as Fourier series in the
//! lunar node longitude `N` (degrees) or as a nonlinear magnitude/phase pair:
//!
//! ```text
//! f(N) = F0 + Σ FCos[k]·cos(kN) + Σ FSin[k]·sin(kN)
//! u(N) = U0 + Σ UCos[k]·cos(kN) + Σ USin[k]·sin(kN)
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{nonlinear_factors, NodalFactors};
use crate::error::{HarmonicsError, Result};

/// Nonlinear form: `f = √(term1² + term2²)`, `u = atan2(term1, term2)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NonlinearSpec {
    #[serde(default)]
    pub term1_sin: BTreeMap<u32, f64>,
    #[serde(default)]
    pub term2_const: f64,
    #[serde(default)]
    pub term2_cos: BTreeMap<u32, f64>,
}

/// Coefficients for one constituent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodalCoefficients {
    pub name: String,
    #[serde(default)]
    pub f0: f64,
    #[serde(default)]
    pub u0: f64,
    /// Equilibrium argument in degrees.
    #[serde(default)]
    pub v0: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub f_cos: BTreeMap<u32, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub f_sin: BTreeMap<u32, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub u_cos: BTreeMap<u32, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub u_sin: BTreeMap<u32, f64>,
    #[serde(rename = "_nonlinear", default, skip_serializing_if = "Option::is_none")]
    pub nonlinear: Option<NonlinearSpec>,
}

fn fourier(constant: f64, cos: &BTreeMap<u32, f64>, sin: &BTreeMap<u32, f64>, n_deg: f64) -> f64 {
    let cos_sum: f64 = cos
        .iter()
        .map(|(&k, &a)| a * (f64::from(k) * n_deg).to_radians().cos())
        .sum();
    let sin_sum: f64 = sin
        .iter()
        .map(|(&k, &b)| b * (f64::from(k) * n_deg).to_radians().sin())
        .sum();
    constant + cos_sum + sin_sum
}

impl NodalCoefficients {
    /// Amplitude factor from the Fourier form. A zero sum yields 1.
    pub fn eval_f(&self, n_deg: f64) -> f64 {
        let f = fourier(self.f0, &self.f_cos, &self.f_sin, n_deg);
        if f == 0.0 {
            1.0
        } else {
            f
        }
    }

    /// Phase correction (degrees) from the Fourier form.
    pub fn eval_u(&self, n_deg: f64) -> f64 {
        fourier(self.u0, &self.u_cos, &self.u_sin, n_deg)
    }

    /// Factors from the nonlinear form, when present.
    pub fn eval_nonlinear(&self, n_deg: f64) -> Option<NodalFactors> {
        let spec = self.nonlinear.as_ref()?;
        Some(nonlinear_factors(
            n_deg,
            spec.term1_sin.iter().map(|(&k, &a)| (k, a)),
            spec.term2_const,
            spec.term2_cos.iter().map(|(&k, &b)| (k, b)),
        ))
    }

    /// Resolve factors: nonlinear form first, then Fourier. `f == 0` becomes 1.
    pub fn factors(&self, n_deg: f64) -> NodalFactors {
        match self.eval_nonlinear(n_deg) {
            Some(mut factors) => {
                if factors.f == 0.0 {
                    factors.f = 1.0;
                }
                factors
            }
            None => NodalFactors::new(self.eval_f(n_deg), self.eval_u(n_deg)),
        }
    }
}

/// Coefficient entries indexed by constituent name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoefficientTable {
    pub coeffs: Vec<NodalCoefficients>,
    #[serde(skip)]
    by_name: HashMap<String, usize>,
}

impl CoefficientTable {
    pub fn new(coeffs: Vec<NodalCoefficients>) -> Self {
        let mut table = Self {
            coeffs,
            by_name: HashMap::new(),
        };
        table.reindex();
        table
    }

    /// Parse a table from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: CoefficientTable = serde_json::from_str(json)?;
        Ok(Self::new(table.coeffs))
    }

    /// Load a table from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| HarmonicsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&json)?;
        debug!(path = %path.display(), entries = table.len(), "Loaded nodal coefficient table");
        Ok(table)
    }

    /// Load a table if the file exists.
    ///
    /// A missing file means no table is configured and yields `Ok(None)`.
    pub fn load_optional(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        Self::from_path(path).map(Some)
    }

    /// Entry for `name`. When names repeat, the last entry wins.
    pub fn get(&self, name: &str) -> Option<&NodalCoefficients> {
        self.by_name.get(name).and_then(|&idx| self.coeffs.get(idx))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn reindex(&mut self) {
        self.by_name = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.name.clone(), idx))
            .collect();
    }
}
