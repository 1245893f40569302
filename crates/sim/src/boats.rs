//! Boat entities: spawning, the per-step force system and transform sync.

use crate::config::{BoatSpec, SimConfig};
use anyhow::{Context, Result};
use engine_core::Transform;
use hecs::{Entity, World};
use glam::{Quat, Vec3};
use hydro::{
    BoatController, DriveInput, ForceKind, HullGeometry, HullMeshes, LogObserver, RecordingObserver,
    StepReport,
};
use physics::{HullBodyDesc, PhysicsBody, PhysicsWorld};

/// Force model state of one hull.
pub struct Boat {
    pub name: String,
    pub controller: BoatController,
    pub observer: RecordingObserver,
    pub last_report: StepReport,
}

/// Running trajectory statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wake {
    pub start: Vec3,
    pub distance: f32,
    pub last_position: Vec3,
    pub peak_lift: f32,
    pub peak_thrust: f32,
    pub max_tilt_degrees: f32,
    pub steps: u64,
}

/// Create the rigid body and force model for `spec` and spawn its entity.
pub fn spawn_boat(
    world: &mut World,
    physics: &mut PhysicsWorld,
    spec: &BoatSpec,
    sim: &SimConfig,
) -> Result<Entity> {
    let mut config = spec.boat.clone();
    config.water.flat_level = sim.water_level;

    let meshes = HullMeshes::render(HullGeometry::cuboid(spec.half_extents));
    let controller = BoatController::new(config, &meshes, spec.mass, sim.gravity)
        .with_context(|| format!("invalid configuration for boat '{}'", spec.name))?;

    let rotation = Quat::from_rotation_y(spec.yaw_degrees.to_radians());
    let desc = HullBodyDesc {
        position: spec.position,
        rotation,
        half_extents: spec.half_extents,
        mass: spec.mass,
        center_of_mass_offset: controller.center_of_mass_offset(),
        linear_damping: spec.linear_damping,
        angular_damping: spec.angular_damping,
        gravity_scale: if controller.uses_engine_gravity() { 1.0 } else { 0.0 },
    };
    let body = physics
        .add_hull_body(&desc)
        .with_context(|| format!("could not create body for boat '{}'", spec.name))?;

    log::info!(
        "Spawned '{}' ({:.0} kg) at {:?}, {}",
        spec.name,
        spec.mass,
        spec.position,
        if controller.config().drive.is_some() { "driven" } else { "drifting" }
    );

    Ok(world.spawn((
        Transform::from_position_rotation(spec.position, rotation),
        body,
        Boat {
            name: spec.name.clone(),
            controller,
            observer: RecordingObserver::default(),
            last_report: StepReport::default(),
        },
        Wake {
            start: spec.position,
            last_position: spec.position,
            ..Default::default()
        },
    )))
}

/// Run every boat's force model for one fixed step. Forces land in rapier's
/// accumulators; the caller steps the physics world afterwards.
pub fn apply_boat_forces(world: &mut World, physics: &mut PhysicsWorld, input: DriveInput) {
    let gravity = physics.gravity();
    physics.reset_forces();

    for (_entity, (body, boat)) in world.query_mut::<(&PhysicsBody, &mut Boat)>() {
        let Some(mut rigid_body) = physics.body_forces(body.rigid_body) else {
            log::debug!("Boat '{}' has no rigid body, skipping", boat.name);
            continue;
        };
        boat.observer.clear();
        let water = boat.controller.water(None);
        boat.last_report = boat
            .controller
            .step(&mut rigid_body, &water, input, gravity, &mut boat.observer);
        if log::log_enabled!(log::Level::Trace) {
            boat.observer.replay(&mut LogObserver::new(boat.name.as_str()));
        }
    }
}

/// Copy rigid-body poses back into entity transforms and update wake statistics.
pub fn sync_boats(world: &mut World, physics: &PhysicsWorld) {
    for (_entity, (transform, body, boat, wake)) in
        world.query_mut::<(&mut Transform, &PhysicsBody, &Boat, &mut Wake)>()
    {
        if let Some(pose) = physics.get_body_transform(body.rigid_body) {
            *transform = pose;
        }

        wake.steps += 1;
        wake.distance += transform.position.distance(wake.last_position);
        wake.last_position = transform.position;
        wake.max_tilt_degrees = wake.max_tilt_degrees.max(tilt_degrees(transform));
        wake.peak_lift = wake
            .peak_lift
            .max(boat.observer.total_force(ForceKind::Buoyancy).y);
        if let Some(drive) = boat.last_report.drive {
            wake.peak_thrust = wake.peak_thrust.max(drive.force.length());
        }
    }
}

/// Angle between the hull's up axis and world up.
pub fn tilt_degrees(transform: &Transform) -> f32 {
    transform.up().dot(Vec3::Y).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Heading of the hull's forward (+X) axis about world up, in degrees.
pub fn heading_degrees(transform: &Transform) -> f32 {
    let forward = transform.right();
    (-forward.z).atan2(forward.x).to_degrees()
}

/// One trajectory line per boat.
pub fn log_boats(world: &World, physics: &PhysicsWorld, time: f32) {
    for (_entity, (transform, body, boat)) in world.query::<(&Transform, &PhysicsBody, &Boat)>().iter() {
        let speed = physics
            .get_body_velocity(body.rigid_body)
            .map(|(v, _)| v.length())
            .unwrap_or(0.0);
        let report = &boat.last_report;
        log::info!(
            "t={:5.1}s {:8} pos=({:6.2}, {:5.2}, {:6.2}) heading={:6.1} tilt={:4.1} speed={:4.2} m/s wet {}/{}",
            time,
            boat.name,
            transform.position.x,
            transform.position.y,
            transform.position.z,
            heading_degrees(transform),
            tilt_degrees(transform),
            speed,
            report.submerged,
            report.samples,
        );
        log::trace!("{} net load {:?}", boat.name, report.load);
    }
}

/// End-of-run summary per boat.
pub fn summarize(world: &World) {
    for (_entity, (transform, boat, wake)) in world.query::<(&Transform, &Boat, &Wake)>().iter() {
        log::info!(
            "{}: travelled {:.1} m (net {:.1} m) over {} steps, peak lift {:.0} N, peak thrust {:.0} N, max tilt {:.1} deg",
            boat.name,
            wake.distance,
            transform.position.distance(wake.start),
            wake.steps,
            wake.peak_lift,
            wake.peak_thrust,
            wake.max_tilt_degrees,
        );
    }
}
