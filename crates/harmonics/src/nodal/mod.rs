//! Nodal corrections: amplitude factor `f`, phase correction `u` and
//! equilibrium argument `V` per constituent.
//!
//! Two strategies implement [`NodalCorrection`]:
//!
//! - [`IdentityNodal`]: `f = 1`, `u = 0`, `V = 0` for everything.
//! - [`AstronomicalNodal`]: evaluates the lunar node longitude `N` and
//!   resolves each constituent through, in order, an optional external
//!   [`CoefficientTable`], the built-in nonlinear series, the closed-form
//!   formulas, and finally identity.

mod astronomical;
mod builtin;
mod coefficients;

use std::fmt;

pub use astronomical::{AstronomicalArguments, AstronomicalNodal};
pub use coefficients::{CoefficientTable, NodalCoefficients, NonlinearSpec};

/// Amplitude factor and phase correction for one constituent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodalFactors {
    pub f: f64,
    /// Phase correction in degrees.
    pub u_deg: f64,
}

impl NodalFactors {
    pub const IDENTITY: NodalFactors = NodalFactors { f: 1.0, u_deg: 0.0 };

    pub fn new(f: f64, u_deg: f64) -> Self {
        Self { f, u_deg }
    }
}

/// Source of nodal corrections.
///
/// `hours` is the offset from the epoch the provider was built for.
/// Implementations are read-only after construction and shared across
/// requests.
pub trait NodalCorrection: Send + Sync + fmt::Debug {
    fn factors(&self, constituent: &str, hours: f64) -> NodalFactors;

    /// Equilibrium argument `V` in degrees. Providers without one return 0.
    fn equilibrium_argument(&self, _constituent: &str, _hours: f64) -> f64 {
        0.0
    }
}

/// No correction at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNodal;

impl NodalCorrection for IdentityNodal {
    fn factors(&self, _constituent: &str, _hours: f64) -> NodalFactors {
        NodalFactors::IDENTITY
    }
}

/// Combine a sine series and a constant-plus-cosine series in `N` into a
/// magnitude and phase:
///
/// ```text
/// term1 = Σ a_k sin(kN)
/// term2 = c + Σ b_k cos(kN)
/// f = √(term1² + term2²),  u = atan2(term1, term2)
/// ```
pub(crate) fn nonlinear_factors<S, C>(
    n_deg: f64,
    sin_terms: S,
    constant: f64,
    cos_terms: C,
) -> NodalFactors
where
    S: IntoIterator<Item = (u32, f64)>,
    C: IntoIterator<Item = (u32, f64)>,
{
    let n = n_deg.to_radians();
    let term1: f64 = sin_terms
        .into_iter()
        .map(|(k, a)| a * (f64::from(k) * n).sin())
        .sum();
    let term2 = constant
        + cos_terms
            .into_iter()
            .map(|(k, b)| b * (f64::from(k) * n).cos())
            .sum::<f64>();

    NodalFactors {
        f: term1.hypot(term2),
        u_deg: term1.atan2(term2).to_degrees(),
    }
}
