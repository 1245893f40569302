//! Water drag split into planar (horizontal) and normal (vertical) parts.

use crate::error::ConfigError;
use engine_core::{ForceMode, RigidBodyForces, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Split `velocity` into the part in the plane perpendicular to `up` and the part along `up`.
pub fn decompose(velocity: Vec3, up: Vec3) -> (Vec3, Vec3) {
    let normal = up * velocity.dot(up);
    (velocity - normal, normal)
}

/// Planar and normal drag coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Horizontal resistance while submerged.
    #[serde(default = "default_planar")]
    pub planar: f32,
    /// Resistance to motion along the surface normal.
    #[serde(default = "default_normal")]
    pub normal: f32,
}

fn default_planar() -> f32 {
    0.8
}
fn default_normal() -> f32 {
    0.4
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            planar: default_planar(),
            normal: default_normal(),
        }
    }
}

impl DragConfig {
    /// Same coefficient in every direction.
    pub fn isotropic(coefficient: f32) -> Self {
        Self {
            planar: coefficient,
            normal: coefficient,
        }
    }

    /// Planar drag only.
    pub fn planar_only(coefficient: f32) -> Self {
        Self {
            planar: coefficient,
            normal: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("planar_drag", self.planar)?;
        ConfigError::non_negative("normal_drag", self.normal)
    }

    /// Drag opposing `velocity`, scaled by submersion and sample weight.
    pub fn force(&self, velocity: Vec3, submersion: f32, weight: f32) -> Vec3 {
        if submersion <= 0.0 {
            return Vec3::ZERO;
        }
        let (planar, normal) = decompose(velocity, WORLD_UP);
        -(planar * self.planar + normal * self.normal) * submersion * weight
    }

    /// Apply drag at a submerged world point using that point's velocity on the body.
    pub fn apply_at_point(
        &self,
        body: &mut dyn RigidBodyForces,
        point: Vec3,
        submersion: f32,
        weight: f32,
    ) -> Vec3 {
        let force = self.force(body.point_velocity(point), submersion, weight);
        if force != Vec3::ZERO {
            body.apply_force_at_point(force, point, ForceMode::Force);
        }
        force
    }
}

/// Drag on the body as a whole: the centre of mass is the only sample point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WholeBodyDrag {
    #[serde(default)]
    pub linear: DragConfig,
    /// Damping of the full angular velocity.
    #[serde(default)]
    pub angular: f32,
}

impl WholeBodyDrag {
    /// Returns the (linear acceleration, angular acceleration) that was applied.
    pub fn apply(&self, body: &mut dyn RigidBodyForces, submersion: f32) -> (Vec3, Vec3) {
        if submersion <= 0.0 {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        let linear = self.linear.force(body.linear_velocity(), submersion, 1.0);
        let angular = -body.angular_velocity() * self.angular * submersion;
        body.apply_force(linear, ForceMode::Acceleration);
        body.apply_torque(angular, ForceMode::Acceleration);
        (linear, angular)
    }
}
