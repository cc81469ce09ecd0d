//! Astronomical nodal corrections (Schureman 1958, Foreman 1977).

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use super::builtin::{builtin_series, closed_form_factors};
use super::coefficients::CoefficientTable;
use super::{NodalCorrection, NodalFactors};
use crate::types::hours_between;
use tide_common::wrap_degrees;

const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

/// Fundamental astronomical arguments, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AstronomicalArguments {
    /// Mean longitude of the lunar ascending node.
    pub n: f64,
    /// Mean longitude of lunar perigee.
    pub p: f64,
    /// Mean longitude of solar perigee.
    pub ps: f64,
    /// Inclination of the lunar orbit to the equator.
    pub i: f64,
    /// Nutation in right ascension.
    pub nu: f64,
    pub xi: f64,
}

impl AstronomicalArguments {
    /// Evaluate the arguments at `t` Julian centuries since J2000.0.
    pub fn at_julian_centuries(t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;

        let n = wrap_degrees(125.04452 - 1934.136261 * t + 0.0020708 * t2 + t3 / 450000.0);
        let p = wrap_degrees(83.35324 + 4069.01363 * t - 0.0103238 * t2 - t3 / 80053.0);
        let ps = wrap_degrees(282.94 + 1.7192 * t);

        let n_rad = n.to_radians();
        let i = (0.91370 - 0.03569 * n_rad.cos()).acos();
        let nu = (0.08978 * n_rad.sin() / i.sin()).asin();
        let nu_deg = nu.to_degrees();

        Self {
            n,
            p,
            ps,
            i: i.to_degrees(),
            nu: nu_deg,
            xi: n - 2.0 * nu_deg,
        }
    }
}

/// J2000.0: 2000-01-01T12:00:00Z.
fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Nodal correction driven by the lunar node longitude.
///
/// The `hours` passed to [`NodalCorrection::factors`] are counted from
/// `epoch`, which lets the same model serve predictions whose phases use
/// different reference times.
#[derive(Debug, Clone)]
pub struct AstronomicalNodal {
    epoch: DateTime<Utc>,
    /// Offset of `epoch` from J2000.0 in days.
    epoch_days_from_j2000: f64,
    coefficients: Option<Arc<CoefficientTable>>,
    use_builtin: bool,
}

impl AstronomicalNodal {
    /// Model whose time argument is counted from `epoch`.
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            epoch_days_from_j2000: hours_between(epoch, j2000()) / 24.0,
            coefficients: None,
            use_builtin: true,
        }
    }

    /// Model whose time argument is hours since the Unix epoch.
    pub fn unix_epoch() -> Self {
        Self::new(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Consult an external coefficient table before anything else.
    pub fn with_coefficients(mut self, table: Arc<CoefficientTable>) -> Self {
        self.coefficients = Some(table);
        self
    }

    /// Skip the built-in nonlinear series and use the closed-form formulas
    /// for the major constituents.
    pub fn closed_form(mut self) -> Self {
        self.use_builtin = false;
        self
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn coefficients(&self) -> Option<&CoefficientTable> {
        self.coefficients.as_deref()
    }

    /// Astronomical arguments at `hours` after the model epoch.
    pub fn arguments(&self, hours: f64) -> AstronomicalArguments {
        let days = self.epoch_days_from_j2000 + hours / 24.0;
        AstronomicalArguments::at_julian_centuries(days / DAYS_PER_JULIAN_CENTURY)
    }
}

impl Default for AstronomicalNodal {
    fn default() -> Self {
        Self::unix_epoch()
    }
}

impl NodalCorrection for AstronomicalNodal {
    fn factors(&self, constituent: &str, hours: f64) -> NodalFactors {
        let args = self.arguments(hours);

        if let Some(coeffs) = self.coefficients.as_ref().and_then(|t| t.get(constituent)) {
            return coeffs.factors(args.n);
        }

        if self.use_builtin {
            if let Some(series) = builtin_series(constituent) {
                return series.evaluate(args.n);
            }
        }

        closed_form_factors(constituent, &args).unwrap_or(NodalFactors::IDENTITY)
    }

    fn equilibrium_argument(&self, constituent: &str, _hours: f64) -> f64 {
        self.coefficients
            .as_ref()
            .and_then(|t| t.get(constituent))
            .map(|c| c.v0)
            .unwrap_or(0.0)
    }
}
