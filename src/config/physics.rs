use super::traits::{invalid, ConfigSection};
use crate::error::PoleBalanceError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Physical constants and episode limits of the cart-pole simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Magnitude of the bang-bang force [newtons]
    pub force_magnitude: f64,
    /// Pole length measured from the pivot [meters]
    pub pole_length: f64,
    /// [kilograms]
    pub pole_mass: f64,
    /// [kilograms]
    pub cart_mass: f64,
    /// Signed gravitational acceleration [m/s^2]
    pub gravity: f64,
    pub time_step_ms: u32,
    pub time_total_ms: u32,
    /// Episode ends once |position| reaches this [meters]
    pub fail_position_m: f64,
    /// Episode ends once |angle| exceeds this [radians]
    pub fail_angle_rad: f64,
    pub numeric_policy: NumericPolicy,
}

/// What to do when the integrated state stops being finite.
///
/// Both acceleration denominators stay away from zero for positive masses, but
/// extreme gains or constants can still overflow into infinities and then NaN.
/// Without a guard, NaN compares false against both failure limits and the
/// episode silently survives to the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericPolicy {
    /// Treat a non-finite state as a failure at that step.
    #[default]
    FailOnNonFinite,
    /// Keep integrating; NaN never trips the failure check.
    Propagate,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            force_magnitude: 10.0,
            pole_length: 0.5,
            pole_mass: 0.1,
            cart_mass: 1.0,
            gravity: -9.81,
            time_step_ms: 25,
            time_total_ms: 60_000,
            fail_position_m: 2.4,
            fail_angle_rad: PI / 6.0,
            numeric_policy: NumericPolicy::default(),
        }
    }
}

impl PhysicsConfig {
    /// Integration step in seconds
    pub fn delta_seconds(&self) -> f64 {
        f64::from(self.time_step_ms) / 1000.0
    }

    /// Number of steps in a full-length episode
    pub fn max_steps(&self) -> u32 {
        self.time_total_ms / self.time_step_ms.max(1)
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), PoleBalanceError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            PhysicsConfig::section_name(),
            format!("{} must be a positive finite number, got {}", name, value),
        ));
    }
    Ok(())
}

impl ConfigSection for PhysicsConfig {
    fn section_name() -> &'static str {
        "physics"
    }

    fn validate(&self) -> Result<(), PoleBalanceError> {
        require_positive("force_magnitude", self.force_magnitude)?;
        require_positive("pole_length", self.pole_length)?;
        require_positive("pole_mass", self.pole_mass)?;
        require_positive("cart_mass", self.cart_mass)?;
        require_positive("fail_position_m", self.fail_position_m)?;
        require_positive("fail_angle_rad", self.fail_angle_rad)?;

        if !self.gravity.is_finite() {
            return Err(invalid(Self::section_name(), "gravity must be finite"));
        }
        if self.fail_angle_rad > PI {
            return Err(invalid(Self::section_name(), "fail_angle_rad must not exceed pi"));
        }
        if self.time_step_ms == 0 {
            return Err(invalid(Self::section_name(), "time_step_ms must be at least 1"));
        }
        if self.time_total_ms == 0 {
            return Err(invalid(Self::section_name(), "time_total_ms must be at least 1"));
        }
        if self.time_total_ms % self.time_step_ms != 0 {
            return Err(invalid(
                Self::section_name(),
                format!(
                    "time_total_ms ({}) must be a multiple of time_step_ms ({})",
                    self.time_total_ms, self.time_step_ms
                ),
            ));
        }
        Ok(())
    }
}
