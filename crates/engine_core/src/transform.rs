//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Map a point from local space to world space (scale, then rotate, then translate).
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (local * self.scale)
    }

    /// Map a point from world space back to local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (world - self.position);
        unrotated / self.scale
    }

    /// Rotate a local direction into world space. Scale is ignored.
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Rotate a world direction into local space. Scale is ignored.
    pub fn inverse_transform_direction(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * world
    }

    /// Rotate around the world Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_y(angle) * self.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_roundtrip_with_scale() {
        let t = Transform {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
            scale: Vec3::new(2.0, 1.0, 0.5),
        };
        let local = Vec3::new(0.3, -0.4, 1.2);
        let back = t.inverse_transform_point(t.transform_point(local));
        assert!((back - local).length() < 1e-5);
    }

    #[test]
    fn direction_ignores_translation_and_scale() {
        let t = Transform {
            position: Vec3::new(10.0, 0.0, 0.0),
            rotation: Quat::IDENTITY,
            scale: Vec3::splat(3.0),
        };
        assert_eq!(t.transform_direction(Vec3::X), Vec3::X);
        assert_eq!(t.inverse_transform_direction(Vec3::Y), Vec3::Y);
    }

    #[test]
    fn rotate_y_turns_right_axis() {
        let mut t = Transform::default();
        t.rotate_y(std::f32::consts::FRAC_PI_2);
        assert!((t.right() - -Vec3::Z).length() < 1e-5);
        assert!((t.up() - Vec3::Y).length() < 1e-5);
    }
}
