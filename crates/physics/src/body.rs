//! `RigidBodyForces` for rapier bodies.

use engine_core::{RigidBodyForces, Transform};
use glam::{Quat, Vec3};
use rapier3d::prelude::*;

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// World pose of a rapier body.
pub fn body_transform(body: &RigidBody) -> Transform {
    let pos = body.translation();
    let rot = body.rotation();
    Transform {
        position: Vec3::new(pos.x, pos.y, pos.z),
        rotation: Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w),
        scale: Vec3::ONE,
    }
}

/// Mutable view of a rapier body for the force model.
///
/// Forces and torques land in rapier's user force accumulators, which persist across
/// steps; call [`crate::PhysicsWorld::reset_forces`] before each step's contributions.
pub struct RapierBody<'a> {
    body: &'a mut RigidBody,
}

impl<'a> RapierBody<'a> {
    pub fn new(body: &'a mut RigidBody) -> Self {
        Self { body }
    }

    pub fn inner(&self) -> &RigidBody {
        self.body
    }
}

impl RigidBodyForces for RapierBody<'_> {
    fn pose(&self) -> Transform {
        body_transform(self.body)
    }

    fn linear_velocity(&self) -> Vec3 {
        from_vector(self.body.linvel())
    }

    fn angular_velocity(&self) -> Vec3 {
        from_vector(self.body.angvel())
    }

    fn mass(&self) -> f32 {
        self.body.mass()
    }

    fn center_of_mass(&self) -> Vec3 {
        let com = self.body.center_of_mass();
        Vec3::new(com.x, com.y, com.z)
    }

    fn inertia_torque(&self, alpha: Vec3) -> Vec3 {
        let local = &self.body.mass_properties().local_mprops;
        let frame = self.body.rotation() * local.principal_inertia_local_frame;
        let principal = local.principal_inertia();
        let a = frame.inverse_transform_vector(&to_vector(alpha));
        let t = vector![a.x * principal.x, a.y * principal.y, a.z * principal.z];
        from_vector(&(frame * t))
    }

    fn add_force(&mut self, force: Vec3) {
        self.body.add_force(to_vector(force), true);
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.body.add_torque(to_vector(torque), true);
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.body.add_force_at_point(to_vector(force), to_point(point), true);
    }

    fn point_velocity(&self, point: Vec3) -> Vec3 {
        from_vector(&self.body.velocity_at_point(&to_point(point)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HullBodyDesc, PhysicsWorld};
    use engine_core::ForceMode;

    fn world_with_hull(desc: HullBodyDesc) -> (PhysicsWorld, RigidBodyHandle) {
        let mut world = PhysicsWorld::new(Vec3::new(0.0, -9.81, 0.0));
        let body = world.add_hull_body(&desc).unwrap();
        (world, body.rigid_body)
    }

    #[test]
    fn point_velocity_includes_spin() {
        let (mut world, handle) = world_with_hull(HullBodyDesc::default());
        let rb = world.rigid_body_set.get_mut(handle).unwrap();
        rb.set_linvel(vector![1.0, 0.0, 0.0], true);
        rb.set_angvel(vector![0.0, 2.0, 0.0], true);
        let body = RapierBody::new(rb);
        let com = body.center_of_mass();
        let v = body.point_velocity(com + Vec3::new(0.0, 0.0, 1.0));
        // 2 rad/s about Y at +1 Z moves along +X.
        assert!((v - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn acceleration_mode_scales_by_mass() {
        let (mut world, handle) = world_with_hull(HullBodyDesc {
            mass: 120.0,
            ..Default::default()
        });
        let mut body = RapierBody::new(world.rigid_body_set.get_mut(handle).unwrap());
        assert!((body.mass() - 120.0).abs() < 1e-3);
        body.apply_force(Vec3::new(0.0, 2.0, 0.0), ForceMode::Acceleration);
        let f = body.inner().user_force();
        assert!((f.y - 240.0).abs() < 1e-2);
    }

    #[test]
    fn forces_accumulate_until_reset() {
        let (mut world, handle) = world_with_hull(HullBodyDesc::default());
        {
            let mut body = world.body_forces(handle).unwrap();
            body.add_force(Vec3::X);
            body.add_force(Vec3::X);
            body.add_torque(Vec3::Y);
        }
        let rb = world.rigid_body_set.get(handle).unwrap();
        assert!((rb.user_force().x - 2.0).abs() < 1e-6);
        assert!((rb.user_torque().y - 1.0).abs() < 1e-6);

        world.reset_forces();
        let rb = world.rigid_body_set.get(handle).unwrap();
        assert_eq!(rb.user_force().norm(), 0.0);
        assert_eq!(rb.user_torque().norm(), 0.0);
    }

    #[test]
    fn lowered_center_of_mass_is_reported_in_world() {
        let (mut world, handle) = world_with_hull(HullBodyDesc {
            position: Vec3::new(5.0, 1.0, 0.0),
            center_of_mass_offset: Vec3::new(0.0, -0.3, 0.0),
            ..Default::default()
        });
        let body = world.body_forces(handle).unwrap();
        assert!((body.center_of_mass() - Vec3::new(5.0, 0.7, 0.0)).length() < 1e-5);
    }

    #[test]
    fn inertia_torque_follows_body_rotation() {
        let desc = HullBodyDesc {
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            half_extents: Vec3::new(2.0, 0.5, 1.0),
            mass: 12.0,
            ..Default::default()
        };
        let inertia = desc.principal_inertia();
        let (mut world, handle) = world_with_hull(desc);
        let body = world.body_forces(handle).unwrap();
        // After a quarter turn about Y, world Z lies along the body's X axis.
        let torque = body.inertia_torque(Vec3::Z);
        assert!((torque - Vec3::Z * inertia.x).length() < 1e-3);
        let torque = body.inertia_torque(Vec3::Y);
        assert!((torque - Vec3::Y * inertia.y).length() < 1e-3);
    }

    #[test]
    fn hovering_body_stays_put() {
        let (mut world, handle) = world_with_hull(HullBodyDesc::default());
        for _ in 0..10 {
            world.reset_forces();
            let mut body = world.body_forces(handle).unwrap();
            body.apply_force(Vec3::new(0.0, 9.81, 0.0), ForceMode::Acceleration);
            world.step();
        }
        let rb = world.rigid_body_set.get(handle).unwrap();
        assert!(rb.linvel().norm() < 1e-3);
    }
}
