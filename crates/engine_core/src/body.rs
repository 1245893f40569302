//! Rigid-body force contract shared by the force model and the physics backend.
//!
//! The physics engine owns and integrates the body. Everything else only reads its
//! state and pushes forces and torques through this trait, so the force model can run
//! against rapier in the simulator and against an analytic body in tests.

use crate::Transform;
use glam::Vec3;

/// How a force or torque value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForceMode {
    /// Newtons (or newton-metres for torques).
    #[default]
    Force,
    /// Mass-independent acceleration: forces are scaled by mass, torques by the
    /// world-space inertia tensor.
    Acceleration,
}

/// A dynamic rigid body that accepts force and torque contributions for the current step.
///
/// Forces added during a step are additive and applied together when the engine integrates.
pub trait RigidBodyForces {
    /// World pose of the body origin.
    fn pose(&self) -> Transform;

    /// Linear velocity of the centre of mass.
    fn linear_velocity(&self) -> Vec3;

    /// Angular velocity in world space.
    fn angular_velocity(&self) -> Vec3;

    /// Total mass.
    fn mass(&self) -> f32;

    /// Centre of mass in world space.
    fn center_of_mass(&self) -> Vec3;

    /// Torque needed to produce angular acceleration `alpha` (world inertia times alpha).
    fn inertia_torque(&self, alpha: Vec3) -> Vec3;

    /// Add a force through the centre of mass.
    fn add_force(&mut self, force: Vec3);

    /// Add a torque about the centre of mass.
    fn add_torque(&mut self, torque: Vec3);

    /// Add a force at a world point; produces the matching moment about the centre of mass.
    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        let arm = point - self.center_of_mass();
        self.add_force(force);
        self.add_torque(arm.cross(force));
    }

    /// Instantaneous velocity of the material point of the body at `point`.
    fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.linear_velocity() + self.angular_velocity().cross(point - self.center_of_mass())
    }

    /// Add a force through the centre of mass using `mode`.
    fn apply_force(&mut self, force: Vec3, mode: ForceMode) {
        let force = match mode {
            ForceMode::Force => force,
            ForceMode::Acceleration => force * self.mass(),
        };
        self.add_force(force);
    }

    /// Add a force at a world point using `mode`.
    fn apply_force_at_point(&mut self, force: Vec3, point: Vec3, mode: ForceMode) {
        let force = match mode {
            ForceMode::Force => force,
            ForceMode::Acceleration => force * self.mass(),
        };
        self.add_force_at_point(force, point);
    }

    /// Add a torque using `mode`.
    fn apply_torque(&mut self, torque: Vec3, mode: ForceMode) {
        let torque = match mode {
            ForceMode::Force => torque,
            ForceMode::Acceleration => self.inertia_torque(torque),
        };
        self.add_torque(torque);
    }
}
