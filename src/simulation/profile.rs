//! Throttle schedules applied by the simulation driver.

/// Throttle command as a function of simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleProfile {
    Constant(f64),
    /// `before` until `at_s`, `after` from then on.
    Step { before: f64, after: f64, at_s: f64 },
    /// Linear from `from` to `to` over `duration_s`, then held.
    Ramp { from: f64, to: f64, duration_s: f64 },
}

impl ThrottleProfile {
    pub fn throttle_at(&self, time_s: f64) -> f64 {
        match *self {
            ThrottleProfile::Constant(throttle) => throttle,
            ThrottleProfile::Step { before, after, at_s } => {
                if time_s < at_s {
                    before
                } else {
                    after
                }
            }
            ThrottleProfile::Ramp {
                from,
                to,
                duration_s,
            } => {
                if duration_s <= 0.0 {
                    return to;
                }
                let fraction = (time_s / duration_s).clamp(0.0, 1.0);
                from + (to - from) * fraction
            }
        }
    }
}
