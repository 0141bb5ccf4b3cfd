//! Core units, constants, and shared primitives for the electric motor workspace.
//!
//! Power flows through the simulation in ft-lbf/s and rotational speed in
//! rev/min; the helpers below convert the configured and reported quantities.

/// Conversion factors between the unit systems used by engine definitions.
pub mod constants {
    /// Horsepower per watt.
    pub const WATTS_TO_HP: f64 = 0.001_341_022;
    /// ft-lbf/s per horsepower.
    pub const HP_TO_FTLB_S: f64 = 550.0;
    /// rad/s per rev/min.
    pub const RPM_TO_RAD_S: f64 = 0.104_719_755;
    /// Watts per kilowatt.
    pub const KW_TO_WATTS: f64 = 1_000.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::{HP_TO_FTLB_S, KW_TO_WATTS, RPM_TO_RAD_S, WATTS_TO_HP};

    /// Convert watts to horsepower.
    #[inline]
    pub fn watts_to_hp(v: f64) -> f64 {
        v * WATTS_TO_HP
    }

    /// Convert horsepower to watts.
    #[inline]
    pub fn hp_to_watts(v: f64) -> f64 {
        v / WATTS_TO_HP
    }

    /// Convert kilowatts to watts.
    #[inline]
    pub fn kw_to_watts(v: f64) -> f64 {
        v * KW_TO_WATTS
    }

    /// Convert horsepower to ft-lbf/s.
    #[inline]
    pub fn hp_to_ftlb_s(v: f64) -> f64 {
        v * HP_TO_FTLB_S
    }

    /// Convert ft-lbf/s to horsepower.
    #[inline]
    pub fn ftlb_s_to_hp(v: f64) -> f64 {
        v / HP_TO_FTLB_S
    }

    /// Convert watts straight to ft-lbf/s (via horsepower).
    #[inline]
    pub fn watts_to_ftlb_s(v: f64) -> f64 {
        hp_to_ftlb_s(watts_to_hp(v))
    }

    /// Convert rev/min to rad/s.
    #[inline]
    pub fn rpm_to_rad_s(v: f64) -> f64 {
        v * RPM_TO_RAD_S
    }

    /// Convert rad/s to rev/min.
    #[inline]
    pub fn rad_s_to_rpm(v: f64) -> f64 {
        v / RPM_TO_RAD_S
    }
}

/// Time-step helpers shared across crates.
pub mod time {
    /// Smallest time step used in any division by `dt` (s).
    pub const MIN_TIME_STEP_S: f64 = 1.0e-4;

    /// Floor a frame time step so it can safely divide.
    #[inline]
    pub fn floor_time_step(dt: f64) -> f64 {
        dt.max(MIN_TIME_STEP_S)
    }
}
