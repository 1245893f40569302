//! Reduce-then-apply: gather a step's contributions, then touch the body once.

use engine_core::{RigidBodyForces, Transform};
use glam::Vec3;

/// Net force through the centre of mass and net torque about it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NetLoad {
    pub force: Vec3,
    pub torque: Vec3,
}

impl NetLoad {
    /// Push the load into `body` in a single write.
    pub fn apply_to(&self, body: &mut dyn RigidBodyForces) {
        if self.force != Vec3::ZERO {
            body.add_force(self.force);
        }
        if self.torque != Vec3::ZERO {
            body.add_torque(self.torque);
        }
    }
}

/// Read-through view of a body that sums contributions instead of applying them.
///
/// State queries (pose, velocities, point velocity) are answered by the wrapped body.
/// Point forces are reduced to a force plus a moment about the centre of mass, which
/// is what the engine does with them anyway.
pub struct ForceAccumulator<'a> {
    body: &'a dyn RigidBodyForces,
    center_of_mass: Vec3,
    load: NetLoad,
}

impl<'a> ForceAccumulator<'a> {
    pub fn new(body: &'a dyn RigidBodyForces) -> Self {
        Self {
            body,
            center_of_mass: body.center_of_mass(),
            load: NetLoad::default(),
        }
    }

    /// The load gathered so far.
    pub fn load(&self) -> NetLoad {
        self.load
    }

    pub fn finish(self) -> NetLoad {
        self.load
    }
}

impl RigidBodyForces for ForceAccumulator<'_> {
    fn pose(&self) -> Transform {
        self.body.pose()
    }

    fn linear_velocity(&self) -> Vec3 {
        self.body.linear_velocity()
    }

    fn angular_velocity(&self) -> Vec3 {
        self.body.angular_velocity()
    }

    fn mass(&self) -> f32 {
        self.body.mass()
    }

    fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    fn inertia_torque(&self, alpha: Vec3) -> Vec3 {
        self.body.inertia_torque(alpha)
    }

    fn add_force(&mut self, force: Vec3) {
        self.load.force += force;
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.load.torque += torque;
    }

    fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.body.point_velocity(point)
    }
}
