//! Tidal harmonic prediction engine.
//!
//! Heights are synthesized as a sum of cosine terms, one per tidal
//! constituent, each scaled and shifted by a slowly varying nodal
//! correction:
//!
//! ```text
//! h(t) = MSL + Σ f_k · A_k · cos(θ_k)
//!
//! Greenwich:             θ_k = ω_k·Δt − φ_k + λ + u_k
//! Equilibrium argument:  θ_k = ω_k·Δt + V_k + u_k − φ_k
//! ```
//!
//! # Architecture
//!
//! ```text
//! PredictionParams ──► synthesize(start, end, interval)
//!                           │
//!                           ├─► NodalCorrection::factors(name, Δt)   (f, u)
//!                           ├─► NodalCorrection::equilibrium_argument (V)
//!                           │
//!                           ▼
//!                     Vec<TideLevel>
//!                           │
//!                           ├─► find_extrema   (strict local max/min)
//!                           └─► refine_extrema (3-point parabola)
//!                                     │
//!                                     ▼
//!                                  Extrema
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{Duration, TimeZone, Utc};
//! use harmonics::{synthesize, ConstituentParam, IdentityNodal, PhaseConvention, PredictionParams};
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let params = PredictionParams {
//!     constituents: vec![ConstituentParam::from_catalogue("M2", 1.0, 0.0).unwrap()],
//!     msl_m: 0.0,
//!     longitude_deg: 0.0,
//!     nodal: Arc::new(IdentityNodal),
//!     reference_time: start,
//!     phase_convention: PhaseConvention::Greenwich,
//! };
//!
//! let series = synthesize(start, start + Duration::hours(2), Duration::minutes(30), &params);
//! assert_eq!(series.len(), 5);
//! assert!((series[0].height_m - 1.0).abs() < 1e-9);
//! ```

pub mod constituents;
pub mod error;
pub mod extrema;
pub mod nodal;
pub mod synthesis;
pub mod types;

pub use constituents::{
    all_constituents, constituent_speed, find_constituent_ignore_case, Constituent,
    LOCATION_PRIORITY,
};
pub use error::{HarmonicsError, Result};
pub use extrema::{find_extrema, refine_extrema, refine_extremum};
pub use nodal::{
    AstronomicalArguments, AstronomicalNodal, CoefficientTable, IdentityNodal, NodalCoefficients,
    NodalCorrection, NodalFactors, NonlinearSpec,
};
pub use synthesis::{synthesize, tide_height, time_steps, TimeSteps};
pub use types::{
    hours_between, ConstituentParam, Extrema, PhaseConvention, PredictionParams, TideLevel,
};
