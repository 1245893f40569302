//! Angular velocity split into yaw and roll/pitch for independent damping.
//!
//! Low yaw damping keeps differential steering responsive while high roll/pitch
//! damping suppresses wave-induced rocking.

use crate::error::ConfigError;
use engine_core::{ForceMode, RigidBodyForces, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Angular velocity separated about an up axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularSplit {
    /// Component along the up axis.
    pub yaw: Vec3,
    /// Everything else.
    pub roll_pitch: Vec3,
}

/// Project `angular_velocity` onto `up` for yaw; the remainder is roll/pitch.
pub fn split(angular_velocity: Vec3, up: Vec3) -> AngularSplit {
    let yaw = angular_velocity.project_onto(up);
    AngularSplit {
        yaw,
        roll_pitch: angular_velocity - yaw,
    }
}

/// Independent yaw and roll/pitch damping gains, applied as angular accelerations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngularDampingConfig {
    #[serde(default)]
    pub yaw: f32,
    #[serde(default)]
    pub roll_pitch: f32,
}

impl AngularDampingConfig {
    pub fn new(yaw: f32, roll_pitch: f32) -> Self {
        Self { yaw, roll_pitch }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("yaw_damping", self.yaw)?;
        ConfigError::non_negative("roll_pitch_damping", self.roll_pitch)
    }

    /// Damping acceleration for `angular_velocity`.
    pub fn acceleration(&self, angular_velocity: Vec3) -> Vec3 {
        let parts = split(angular_velocity, WORLD_UP);
        -parts.yaw * self.yaw - parts.roll_pitch * self.roll_pitch
    }

    /// Apply both damping terms to `body`. Returns the angular acceleration requested.
    pub fn apply(&self, body: &mut dyn RigidBodyForces) -> Vec3 {
        let alpha = self.acceleration(body.angular_velocity());
        if alpha != Vec3::ZERO {
            body.apply_torque(alpha, ForceMode::Acceleration);
        }
        alpha
    }
}
