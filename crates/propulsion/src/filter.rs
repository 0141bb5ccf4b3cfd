//! First-order lag filter on feedback measurements.

use motor_core::time::floor_time_step;

/// Exponential smoothing discretized for a variable time step.
///
/// With `tau <= 0` the filter is disabled: [`LagFilter::update`] returns its input and
/// leaves the stored state alone. Otherwise each update blends the new sample with the
/// previous output using `alpha = 1 / (1 + tau / dt)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LagFilter {
    tau: f64,
    state: f64,
}

impl LagFilter {
    /// Create a filter with time constant `tau` (s), seeded at zero.
    pub fn new(tau: f64) -> Self {
        Self { tau, state: 0.0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.tau > 0.0
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Last filtered output (zero before the first enabled update).
    pub fn state(&self) -> f64 {
        self.state
    }

    /// Blend factor for a given step; `dt` is floored before dividing.
    pub fn alpha(&self, dt: f64) -> f64 {
        1.0 / (1.0 + self.tau / floor_time_step(dt))
    }

    /// Feed one raw sample and return the filtered value.
    pub fn update(&mut self, raw: f64, dt: f64) -> f64 {
        if !self.is_enabled() {
            return raw;
        }
        let alpha = self.alpha(dt);
        self.state = alpha * raw + (1.0 - alpha) * self.state;
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn disabled_filter_passes_through_and_keeps_state() {
        let mut filter = LagFilter::new(0.0);
        assert_eq!(filter.update(42.0, 0.01), 42.0);
        assert_eq!(filter.update(-7.5, 0.01), -7.5);
        assert_eq!(filter.state(), 0.0);
    }

    #[test]
    fn first_update_blends_against_zero_seed() {
        let mut filter = LagFilter::new(1.0);
        let out = filter.update(100.0, 1.0);
        // alpha = 1 / (1 + 1) = 0.5
        assert_relative_eq!(out, 50.0);
        assert_relative_eq!(filter.state(), 50.0);
        let out = filter.update(100.0, 1.0);
        assert_relative_eq!(out, 75.0);
    }

    #[test]
    fn alpha_tracks_ratio_of_dt_to_tau() {
        let filter = LagFilter::new(0.5);
        assert!(filter.alpha(10.0) > 0.95);
        assert!(filter.alpha(0.001) < 0.01);
        // zero dt is floored instead of dividing by zero
        assert!(filter.alpha(0.0).is_finite());
        assert!(filter.alpha(0.0) > 0.0);
    }
}
