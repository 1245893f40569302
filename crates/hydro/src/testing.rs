//! Analytic rigid body used by the unit tests.

use engine_core::{RigidBodyForces, Transform};
use glam::{Quat, Vec3};

/// A force or torque pushed into [`RecordingBody`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Applied {
    Force { force: Vec3, point: Option<Vec3> },
    Torque(Vec3),
}

/// Rigid body with a diagonal inertia tensor that records every contribution.
#[derive(Debug, Clone)]
pub struct RecordingBody {
    pub pose: Transform,
    pub linvel: Vec3,
    pub angvel: Vec3,
    pub mass: f32,
    /// Centre of mass in body-local space.
    pub local_com: Vec3,
    /// Principal moments along the body axes.
    pub principal_inertia: Vec3,
    pub applied: Vec<Applied>,
    pub net_force: Vec3,
    pub net_torque: Vec3,
}

impl RecordingBody {
    pub fn new(mass: f32) -> Self {
        Self {
            pose: Transform::default(),
            linvel: Vec3::ZERO,
            angvel: Vec3::ZERO,
            mass,
            local_com: Vec3::ZERO,
            principal_inertia: Vec3::splat(mass),
            applied: Vec::new(),
            net_force: Vec3::ZERO,
            net_torque: Vec3::ZERO,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.pose.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.pose.rotation = rotation;
        self
    }
}

impl RigidBodyForces for RecordingBody {
    fn pose(&self) -> Transform {
        self.pose
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linvel
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angvel
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn center_of_mass(&self) -> Vec3 {
        self.pose.transform_point(self.local_com)
    }

    fn inertia_torque(&self, alpha: Vec3) -> Vec3 {
        let local = self.pose.rotation.inverse() * alpha;
        self.pose.rotation * (local * self.principal_inertia)
    }

    fn add_force(&mut self, force: Vec3) {
        self.applied.push(Applied::Force { force, point: None });
        self.net_force += force;
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.applied.push(Applied::Torque(torque));
        self.net_torque += torque;
    }

    fn add_force_at_point(&mut self, force: Vec3, point: Vec3) {
        self.applied.push(Applied::Force {
            force,
            point: Some(point),
        });
        self.net_force += force;
        self.net_torque += (point - self.center_of_mass()).cross(force);
    }
}

pub fn assert_vec_near(actual: Vec3, expected: Vec3, eps: f32) {
    assert!(
        (actual - expected).length() < eps,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}
