//! Proportional-derivative controller that rights the hull without touching yaw.

use crate::error::ConfigError;
use engine_core::{ForceMode, RigidBodyForces, Transform, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tilt axes shorter than this are treated as upright (or fully capsized) and skipped.
const MIN_TILT_AXIS: f32 = 1e-6;

/// Upright PD gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilizerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_spring_gain")]
    pub spring_gain: f32,
    #[serde(default = "default_damping_gain")]
    pub damping_gain: f32,
}

fn default_true() -> bool {
    true
}
fn default_spring_gain() -> f32 {
    14.0
}
fn default_damping_gain() -> f32 {
    5.0
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            spring_gain: default_spring_gain(),
            damping_gain: default_damping_gain(),
        }
    }
}

impl StabilizerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("upright_spring_gain", self.spring_gain)?;
        ConfigError::non_negative("upright_damping_gain", self.damping_gain)
    }
}

/// Restores the body's up axis toward world up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UprightStabilizer {
    #[serde(default)]
    pub config: StabilizerConfig,
}

impl UprightStabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self { config }
    }

    /// Angular acceleration for the current pose and angular velocity.
    ///
    /// `None` when disabled, when the hull is upright or exactly inverted, or when the
    /// tilt axis has no roll/pitch component.
    pub fn angular_acceleration(&self, pose: &Transform, angular_velocity: Vec3) -> Option<Vec3> {
        if !self.config.enabled {
            return None;
        }

        let axis = pose.up().cross(WORLD_UP);
        let magnitude = axis.length();
        if magnitude < MIN_TILT_AXIS {
            return None;
        }
        let axis = axis / magnitude;
        let angle = magnitude.clamp(0.0, 1.0).asin();

        // Drop the hull-local yaw part so steering stays independent.
        let mut local = pose.inverse_transform_direction(axis);
        local.y = 0.0;
        if local.length_squared() < MIN_TILT_AXIS {
            return None;
        }
        let axis = pose.transform_direction(local.normalize());

        Some(axis * (angle * self.config.spring_gain) - angular_velocity * self.config.damping_gain)
    }

    /// Apply the restoring torque as an acceleration.
    pub fn apply(&self, body: &mut dyn RigidBodyForces) -> Option<Vec3> {
        let alpha = self.angular_acceleration(&body.pose(), body.angular_velocity())?;
        body.apply_torque(alpha, ForceMode::Acceleration);
        Some(alpha)
    }
}
