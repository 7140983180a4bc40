//! Damped-spring easing used by settle animations.
//!
//! The curve is a unit mass-spring-damper released from rest at `from` and
//! pulled toward `to`. `response` is the undamped period in seconds and
//! `damping_fraction` the damping ratio. Ratios at or above 1 are treated as
//! critically damped.

use std::{f64::consts::TAU, time::Duration};

use shared::protocol::Easing;

pub const DEFAULT_RESPONSE_SECS: f64 = 0.55;
pub const DEFAULT_DAMPING_FRACTION: f64 = 0.825;
/// Fraction of the initial displacement below which the spring counts as settled.
pub const SETTLE_EPSILON: f64 = 0.001;

pub const MIN_RESPONSE_SECS: f64 = 0.01;
pub const MAX_RESPONSE_SECS: f64 = 10.0;
pub const MIN_DAMPING_FRACTION: f64 = 0.05;
pub const MAX_DAMPING_FRACTION: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCurve {
    response: f64,
    damping_fraction: f64,
}

impl Default for SpringCurve {
    fn default() -> Self {
        Self::new(DEFAULT_RESPONSE_SECS, DEFAULT_DAMPING_FRACTION)
    }
}

impl From<Easing> for SpringCurve {
    fn from(value: Easing) -> Self {
        match value {
            Easing::Spring {
                response,
                damping_fraction,
            } => Self::new(response, damping_fraction),
        }
    }
}

impl SpringCurve {
    pub fn new(response: f64, damping_fraction: f64) -> Self {
        let response = if response.is_finite() {
            response.clamp(MIN_RESPONSE_SECS, MAX_RESPONSE_SECS)
        } else {
            DEFAULT_RESPONSE_SECS
        };
        let damping_fraction = if damping_fraction.is_finite() {
            damping_fraction.clamp(MIN_DAMPING_FRACTION, MAX_DAMPING_FRACTION)
        } else {
            DEFAULT_DAMPING_FRACTION
        };
        Self {
            response,
            damping_fraction,
        }
    }

    pub fn response(&self) -> f64 {
        self.response
    }

    pub fn damping_fraction(&self) -> f64 {
        self.damping_fraction
    }

    pub fn easing(&self) -> Easing {
        Easing::Spring {
            response: self.response,
            damping_fraction: self.damping_fraction,
        }
    }

    fn angular_frequency(&self) -> f64 {
        TAU / self.response
    }

    fn is_critically_damped(&self) -> bool {
        self.damping_fraction >= 1.0
    }

    /// Remaining share of the initial displacement after `t` seconds.
    /// Starts at 1, converges to 0, dips below 0 on overshoot.
    pub fn displacement(&self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        let omega = self.angular_frequency();
        if self.is_critically_damped() {
            return (1.0 + omega * t) * (-omega * t).exp();
        }
        let zeta = self.damping_fraction;
        let damped = omega * (1.0 - zeta * zeta).sqrt();
        let envelope = (-zeta * omega * t).exp();
        envelope * ((damped * t).cos() + (zeta * omega / damped) * (damped * t).sin())
    }

    /// Time until the displacement envelope stays under [`SETTLE_EPSILON`].
    pub fn settle_duration(&self) -> Duration {
        let omega = self.angular_frequency();
        let log_eps = -SETTLE_EPSILON.ln();
        let secs = if self.is_critically_damped() {
            // Solve (1 + wt) e^{-wt} = eps by fixed-point iteration.
            let mut wt = log_eps;
            for _ in 0..8 {
                wt = log_eps + (1.0 + wt).ln();
            }
            wt / omega
        } else {
            // The oscillating factor is bounded by 1/sqrt(1 - zeta^2).
            let zeta = self.damping_fraction;
            let amplitude = 1.0 / (1.0 - zeta * zeta).sqrt();
            (log_eps + amplitude.ln()) / (zeta * omega)
        };
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }

    pub fn value_at(&self, from: f64, to: f64, elapsed: Duration) -> f64 {
        if elapsed >= self.settle_duration() {
            return to;
        }
        to + (from - to) * self.displacement(elapsed.as_secs_f64())
    }

    /// Eased progress in `[0, 1]`; overshoot is clamped.
    pub fn progress_at(&self, elapsed: Duration) -> f64 {
        if elapsed >= self.settle_duration() {
            return 1.0;
        }
        (1.0 - self.displacement(elapsed.as_secs_f64())).clamp(0.0, 1.0)
    }
}
