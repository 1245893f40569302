//! Dynamic hull bodies and the ECS component that links them to rapier.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

/// Component linking an ECS entity to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: RigidBodyHandle,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    pub fn with_collider(rigid_body: RigidBodyHandle, collider: ColliderHandle) -> Self {
        Self {
            rigid_body,
            collider: Some(collider),
        }
    }
}

/// Everything needed to create a box-shaped floating hull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HullBodyDesc {
    pub position: Vec3,
    pub rotation: Quat,
    /// Half sizes of the hull box along its local axes.
    pub half_extents: Vec3,
    pub mass: f32,
    /// Body-local shift of the centre of mass from the box centre.
    pub center_of_mass_offset: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// 0 when gravity is applied by the force model instead of the engine.
    pub gravity_scale: f32,
}

impl Default for HullBodyDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            half_extents: Vec3::new(1.5, 0.25, 0.75),
            mass: 100.0,
            center_of_mass_offset: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.0,
            gravity_scale: 1.0,
        }
    }
}

impl HullBodyDesc {
    /// Solid-box principal moments about the box centre.
    pub fn principal_inertia(&self) -> Vec3 {
        let h2 = self.half_extents * self.half_extents;
        Vec3::new(h2.y + h2.z, h2.x + h2.z, h2.x + h2.y) * (self.mass / 3.0)
    }

    pub(crate) fn mass_properties(&self) -> MassProperties {
        let com = self.center_of_mass_offset;
        let inertia = self.principal_inertia();
        MassProperties::new(
            point![com.x, com.y, com.z],
            self.mass,
            vector![inertia.x, inertia.y, inertia.z],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_inertia_is_symmetric() {
        let desc = HullBodyDesc {
            half_extents: Vec3::splat(0.5),
            mass: 6.0,
            ..Default::default()
        };
        // m * (1^2 + 1^2) / 12 = 1 for a unit cube of mass 6.
        assert!((desc.principal_inertia() - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn long_hull_resists_pitch_more_than_roll() {
        let desc = HullBodyDesc {
            half_extents: Vec3::new(2.0, 0.3, 0.8),
            ..Default::default()
        };
        let inertia = desc.principal_inertia();
        assert!(inertia.z > inertia.x);
        assert!(inertia.y > inertia.z);
    }
}
