//! Physics world management with Rapier3D.

use crate::body::{body_transform, from_vector, to_vector, RapierBody};
use crate::hull_body::{HullBodyDesc, PhysicsBody};
use anyhow::{ensure, Result};
use engine_core::{Transform, Vec3};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl PhysicsWorld {
    /// Create an empty world with the given gravity.
    pub fn new(gravity: Vec3) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: to_vector(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    pub fn gravity(&self) -> Vec3 {
        from_vector(&self.gravity)
    }

    /// Seconds advanced by each [`PhysicsWorld::step`].
    pub fn set_timestep(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Step the physics simulation.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a dynamic hull with explicit mass, centre of mass and box inertia.
    ///
    /// The box collider has zero density so the mass properties come from `desc` alone.
    pub fn add_hull_body(&mut self, desc: &HullBodyDesc) -> Result<PhysicsBody> {
        ensure!(
            desc.mass.is_finite() && desc.mass > 0.0,
            "hull mass must be positive, got {}",
            desc.mass
        );
        ensure!(
            desc.half_extents.is_finite() && desc.half_extents.min_element() > 0.0,
            "hull half extents must be positive, got {:?}",
            desc.half_extents
        );

        let p = desc.position;
        let r = desc.rotation;
        let pose = Isometry3::from_parts(
            Translation3::new(p.x, p.y, p.z),
            UnitQuaternion::from_quaternion(Quaternion::new(r.w, r.x, r.y, r.z)),
        );
        let rigid_body = RigidBodyBuilder::dynamic()
            .position(pose)
            .additional_mass_properties(desc.mass_properties())
            .linear_damping(desc.linear_damping)
            .angular_damping(desc.angular_damping)
            .gravity_scale(desc.gravity_scale)
            .can_sleep(false)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);

        let h = desc.half_extents;
        let collider = ColliderBuilder::cuboid(h.x, h.y, h.z).density(0.0).build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.recompute_mass_properties_from_colliders(&self.collider_set);
        }
        log::debug!(
            "Hull body {:?}: mass {:.1} kg, com offset {:?}",
            handle,
            desc.mass,
            desc.center_of_mass_offset
        );
        Ok(PhysicsBody::with_collider(handle, collider))
    }

    /// Force-model view of a body, or `None` if the handle is gone.
    pub fn body_forces(&mut self, handle: RigidBodyHandle) -> Option<RapierBody<'_>> {
        self.rigid_body_set.get_mut(handle).map(RapierBody::new)
    }

    /// Clear user forces and torques on every body before a new step's contributions.
    pub fn reset_forces(&mut self) {
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
    }

    /// Get the transform of a rigid body.
    pub fn get_body_transform(&self, handle: RigidBodyHandle) -> Option<Transform> {
        self.rigid_body_set.get(handle).map(body_transform)
    }

    /// Linear and angular velocity of a rigid body.
    pub fn get_body_velocity(&self, handle: RigidBodyHandle) -> Option<(Vec3, Vec3)> {
        self.rigid_body_set
            .get(handle)
            .map(|body| (from_vector(body.linvel()), from_vector(body.angvel())))
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_massless_hull() {
        let mut world = PhysicsWorld::default();
        let desc = HullBodyDesc {
            mass: 0.0,
            ..Default::default()
        };
        assert!(world.add_hull_body(&desc).is_err());
    }

    #[test]
    fn free_hull_falls_under_engine_gravity() {
        let mut world = PhysicsWorld::default();
        world.set_timestep(0.02);
        let body = world.add_hull_body(&HullBodyDesc::default()).unwrap();
        for _ in 0..50 {
            world.step();
        }
        let (linvel, _) = world.get_body_velocity(body.rigid_body).unwrap();
        // One second of free fall.
        assert!((linvel.y + 9.81).abs() < 0.05);
    }

    #[test]
    fn zero_gravity_scale_floats() {
        let mut world = PhysicsWorld::default();
        let body = world
            .add_hull_body(&HullBodyDesc {
                gravity_scale: 0.0,
                position: Vec3::new(0.0, 2.0, 0.0),
                ..Default::default()
            })
            .unwrap();
        for _ in 0..20 {
            world.step();
        }
        let pose = world.get_body_transform(body.rigid_body).unwrap();
        assert!((pose.position.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn removed_body_has_no_view() {
        let mut world = PhysicsWorld::default();
        let body = world.add_hull_body(&HullBodyDesc::default()).unwrap();
        world.remove_body(body.rigid_body);
        assert!(world.body_forces(body.rigid_body).is_none());
        assert!(world.get_body_transform(body.rigid_body).is_none());
    }
}
