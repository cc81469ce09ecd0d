//! Harmonic synthesis of tide heights.

use chrono::{DateTime, Duration, Utc};

use crate::types::{hours_between, PhaseConvention, PredictionParams, TideLevel};

/// Height at `t` in meters.
///
/// Sums `f·A·cos(θ)` over all constituents on top of the mean sea level.
/// The phase angle is not wrapped before taking the cosine.
pub fn tide_height(t: DateTime<Utc>, params: &PredictionParams) -> f64 {
    let dt_hours = hours_between(t, params.reference_time);

    params
        .constituents
        .iter()
        .fold(params.msl_m, |height, c| {
            let factors = params.nodal.factors(&c.name, dt_hours);

            let theta_deg = match params.phase_convention {
                PhaseConvention::Greenwich => {
                    c.speed_deg_per_hour * dt_hours - c.phase_deg
                        + params.longitude_deg
                        + factors.u_deg
                }
                PhaseConvention::EquilibriumArgument => {
                    let v = params.nodal.equilibrium_argument(&c.name, dt_hours);
                    c.speed_deg_per_hour * dt_hours + v + factors.u_deg - c.phase_deg
                }
            };

            height + factors.f * c.amplitude_m * theta_deg.to_radians().cos()
        })
}

/// Sample times from `start` to `end` at a fixed step.
///
/// `end` is included when it falls on the step grid. A non-positive step
/// yields nothing. The iterator is `Clone`, so a sequence can be replayed.
#[derive(Debug, Clone)]
pub struct TimeSteps {
    next: Option<DateTime<Utc>>,
    end: DateTime<Utc>,
    step: Duration,
}

impl Iterator for TimeSteps {
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = current.checked_add_signed(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            Some(current) if current <= self.end => {
                let span = (self.end - current).num_microseconds();
                let step = self.step.num_microseconds();
                match (span, step) {
                    (Some(span), Some(step)) if step > 0 => {
                        let n = (span / step) as usize + 1;
                        (n, Some(n))
                    }
                    _ => (1, None),
                }
            }
            _ => (0, Some(0)),
        }
    }
}

/// Fixed-step sample times over `[start, end]`.
pub fn time_steps(start: DateTime<Utc>, end: DateTime<Utc>, step: Duration) -> TimeSteps {
    let next = if step > Duration::zero() {
        Some(start)
    } else {
        None
    };
    TimeSteps { next, end, step }
}

/// Evaluate heights at every sample time from `start` to `end`.
pub fn synthesize(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Duration,
    params: &PredictionParams,
) -> Vec<TideLevel> {
    time_steps(start, end, interval)
        .map(|t| TideLevel::new(t, tide_height(t, params)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodal::{IdentityNodal, NodalCorrection, NodalFactors};
    use crate::types::ConstituentParam;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn params(constituents: Vec<ConstituentParam>) -> PredictionParams {
        PredictionParams {
            constituents,
            msl_m: 0.0,
            longitude_deg: 0.0,
            nodal: Arc::new(IdentityNodal),
            reference_time: t0(),
            phase_convention: PhaseConvention::Greenwich,
        }
    }

    #[derive(Debug)]
    struct FixedNodal {
        f: f64,
        u: f64,
        v: f64,
    }

    impl NodalCorrection for FixedNodal {
        fn factors(&self, _constituent: &str, _hours: f64) -> NodalFactors {
            NodalFactors::new(self.f, self.u)
        }

        fn equilibrium_argument(&self, _constituent: &str, _hours: f64) -> f64 {
            self.v
        }
    }

    #[test]
    fn test_msl_only() {
        let mut p = params(vec![]);
        p.msl_m = 1.25;
        assert_eq!(tide_height(t0() + Duration::hours(7), &p), 1.25);
    }

    #[test]
    fn test_greenwich_adds_longitude() {
        let mut p = params(vec![ConstituentParam::new("M2", 2.0, 30.0, 28.9841042)]);
        p.longitude_deg = 90.0;
        // θ = 0 − 30 + 90 = 60°
        assert!((tide_height(t0(), &p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equilibrium_argument_ignores_longitude() {
        let mut p = params(vec![ConstituentParam::new("M2", 1.0, 10.0, 28.9841042)]);
        p.longitude_deg = 135.0;
        p.phase_convention = PhaseConvention::EquilibriumArgument;
        p.nodal = Arc::new(FixedNodal {
            f: 2.0,
            u: 5.0,
            v: 65.0,
        });
        // θ = 0 + 65 + 5 − 10 = 60°, height = 2·1·0.5
        assert!((tide_height(t0(), &p) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_steps_inclusive_end() {
        let steps: Vec<_> = time_steps(t0(), t0() + Duration::hours(1), Duration::minutes(20)).collect();
        assert_eq!(steps.len(), 4);
        assert_eq!(steps[3], t0() + Duration::hours(1));
    }

    #[test]
    fn test_time_steps_unaligned_end() {
        let it = time_steps(t0(), t0() + Duration::minutes(50), Duration::minutes(20));
        assert_eq!(it.size_hint(), (3, Some(3)));
        let steps: Vec<_> = it.collect();
        assert_eq!(steps.last(), Some(&(t0() + Duration::minutes(40))));
    }

    #[test]
    fn test_time_steps_degenerate() {
        assert_eq!(time_steps(t0(), t0(), Duration::minutes(1)).count(), 1);
        assert_eq!(time_steps(t0(), t0() - Duration::hours(1), Duration::minutes(1)).count(), 0);
        assert_eq!(time_steps(t0(), t0() + Duration::hours(1), Duration::zero()).count(), 0);
        assert_eq!(time_steps(t0(), t0() + Duration::hours(1), Duration::minutes(-5)).count(), 0);
    }

    #[test]
    fn test_time_steps_restartable() {
        let steps = time_steps(t0(), t0() + Duration::hours(3), Duration::hours(1));
        let first: Vec<_> = steps.clone().collect();
        let second: Vec<_> = steps.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_synthesize_strictly_increasing() {
        let p = params(vec![ConstituentParam::new("K1", 0.4, 0.0, 15.0410686)]);
        let series = synthesize(t0(), t0() + Duration::days(1), Duration::minutes(10), &p);
        assert_eq!(series.len(), 145);
        assert!(series.windows(2).all(|w| w[0].time < w[1].time));
    }
}
