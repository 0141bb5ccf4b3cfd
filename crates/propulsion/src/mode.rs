//! Control mode descriptors.

/// How the throttle command is interpreted. Chosen once when the motor is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMode {
    /// Throttle scales a fraction of `max_rpm`; power closes the RPM error through torque.
    RpmCommanded { max_rpm: f64 },
    /// Throttle scales a fraction of the rated power.
    PowerCommanded,
}

impl ControlMode {
    /// Select the mode from the configured maximum RPM (zero means not configured).
    pub fn from_max_rpm(max_rpm: f64) -> Self {
        if max_rpm > 0.0 {
            ControlMode::RpmCommanded { max_rpm }
        } else {
            ControlMode::PowerCommanded
        }
    }

    pub fn is_rpm_commanded(&self) -> bool {
        matches!(self, ControlMode::RpmCommanded { .. })
    }

    /// Short label used in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            ControlMode::RpmCommanded { .. } => "rpm",
            ControlMode::PowerCommanded => "power",
        }
    }
}
