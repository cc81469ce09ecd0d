//! Built-in nodal coefficients for the 8 major constituents.

use super::astronomical::AstronomicalArguments;
use super::{nonlinear_factors, NodalFactors};

/// Nonlinear series in N (radians) with a unit constant on the cosine side.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NonlinearSeries {
    pub sin_terms: &'static [(u32, f64)],
    pub cos_terms: &'static [(u32, f64)],
}

impl NonlinearSeries {
    pub fn evaluate(&self, n_deg: f64) -> NodalFactors {
        nonlinear_factors(
            n_deg,
            self.sin_terms.iter().copied(),
            1.0,
            self.cos_terms.iter().copied(),
        )
    }
}

const M2_TERMS: &[(u32, f64)] = &[(1, -0.03731), (2, 0.00052)];
const S2_TERMS: &[(u32, f64)] = &[(1, 0.00225)];
const O1_TERMS: &[(u32, f64)] = &[(1, 0.189), (2, -0.0058)];
const P1_TERMS: &[(u32, f64)] = &[(1, -0.0112)];
const Q1_TERMS: &[(u32, f64)] = &[(1, 0.1886)];

/// Built-in series for `name`, if any.
pub(crate) fn builtin_series(name: &str) -> Option<NonlinearSeries> {
    let series = match name {
        "M2" | "N2" => NonlinearSeries {
            sin_terms: M2_TERMS,
            cos_terms: M2_TERMS,
        },
        "S2" => NonlinearSeries {
            sin_terms: S2_TERMS,
            cos_terms: S2_TERMS,
        },
        "K2" => NonlinearSeries {
            sin_terms: &[(1, -0.3108), (2, -0.0324)],
            cos_terms: &[(1, 0.2852), (2, 0.0324)],
        },
        "K1" => NonlinearSeries {
            sin_terms: &[(1, -0.1554), (2, 0.0029)],
            cos_terms: &[(1, 0.1158), (2, -0.0029)],
        },
        "O1" => NonlinearSeries {
            sin_terms: O1_TERMS,
            cos_terms: O1_TERMS,
        },
        "P1" => NonlinearSeries {
            sin_terms: P1_TERMS,
            cos_terms: P1_TERMS,
        },
        "Q1" => NonlinearSeries {
            sin_terms: Q1_TERMS,
            cos_terms: Q1_TERMS,
        },
        _ => return None,
    };
    Some(series)
}

/// Closed-form phase corrections (Schureman). Amplitude factors are 1.
pub(crate) fn closed_form_factors(name: &str, args: &AstronomicalArguments) -> Option<NodalFactors> {
    let i = args.i.to_radians();
    let nu = args.nu.to_radians();

    let u_deg = match name {
        "M2" | "N2" => -2.1 * i.sin().powi(2),
        "S2" | "P1" => 0.0,
        "K2" => (0.1689 * (2.0 * i).sin())
            .atan2(0.2523 + 0.1689 * i.cos())
            .to_degrees(),
        "K1" => -8.86 * nu.sin() + 0.68 * (2.0 * nu).sin(),
        "O1" | "Q1" => 10.8 * nu.sin() - 1.3 * (2.0 * nu).sin(),
        _ => return None,
    };

    Some(NodalFactors::new(1.0, u_deg))
}
