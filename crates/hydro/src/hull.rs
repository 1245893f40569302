//! Mesh-weighted hull buoyancy: area-weighted vertex samples, each with its own lift and drag.

use crate::buoyancy::{BuoyancyConfig, BuoyancyLaw, BuoyancyModel, SampleWeight};
use crate::damping::AngularDampingConfig;
use crate::drag::DragConfig;
use crate::error::ConfigError;
use crate::observer::{ForceKind, ForceObserver};
use crate::samples::{HullGeometry, HullSamples};
use crate::water::WaterOracle;
use engine_core::{RigidBodyForces, Transform};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tuning for [`HullBuoyancy`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HullBuoyancyConfig {
    /// Sample every Nth vertex (1 = all).
    #[serde(default = "default_vertex_stride")]
    pub vertex_stride: usize,
    /// Prefer the collision mesh over the render mesh when both are present.
    #[serde(default)]
    pub use_collision_mesh: bool,
    #[serde(default = "default_water_density")]
    pub water_density: f32,
    #[serde(default = "default_full_force_depth")]
    pub depth_for_full_force: f32,
    #[serde(default = "default_buoyancy_scale")]
    pub buoyancy_scale: f32,
    #[serde(default = "default_planar_drag")]
    pub planar_drag: f32,
    #[serde(default = "default_normal_drag")]
    pub normal_drag: f32,
    /// Kept low so differential steering still turns the hull.
    #[serde(default = "default_yaw_damping")]
    pub yaw_damping: f32,
    #[serde(default = "default_roll_pitch_damping")]
    pub roll_pitch_damping: f32,
}

fn default_vertex_stride() -> usize {
    3
}
fn default_water_density() -> f32 {
    1000.0
}
fn default_full_force_depth() -> f32 {
    0.6
}
fn default_buoyancy_scale() -> f32 {
    1.0
}
fn default_planar_drag() -> f32 {
    0.8
}
fn default_normal_drag() -> f32 {
    0.4
}
fn default_yaw_damping() -> f32 {
    0.1
}
fn default_roll_pitch_damping() -> f32 {
    0.8
}

impl Default for HullBuoyancyConfig {
    fn default() -> Self {
        Self {
            vertex_stride: default_vertex_stride(),
            use_collision_mesh: false,
            water_density: default_water_density(),
            depth_for_full_force: default_full_force_depth(),
            buoyancy_scale: default_buoyancy_scale(),
            planar_drag: default_planar_drag(),
            normal_drag: default_normal_drag(),
            yaw_damping: default_yaw_damping(),
            roll_pitch_damping: default_roll_pitch_damping(),
        }
    }
}

impl HullBuoyancyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertex_stride == 0 {
            return Err(ConfigError::ZeroVertexStride);
        }
        self.buoyancy().validate()?;
        self.drag().validate()?;
        self.angular_damping().validate()
    }

    pub fn buoyancy(&self) -> BuoyancyConfig {
        BuoyancyConfig {
            depth_for_full_force: self.depth_for_full_force,
            strength_scale: self.buoyancy_scale,
            damping_coefficient: 0.0,
            water_density: self.water_density,
        }
    }

    pub fn drag(&self) -> DragConfig {
        DragConfig {
            planar: self.planar_drag,
            normal: self.normal_drag,
        }
    }

    pub fn angular_damping(&self) -> AngularDampingConfig {
        AngularDampingConfig::new(self.yaw_damping, self.roll_pitch_damping)
    }
}

/// Render and collision meshes of one hull; either may be missing.
#[derive(Debug, Clone, Default)]
pub struct HullMeshes {
    pub render: Option<HullGeometry>,
    pub collision: Option<HullGeometry>,
}

impl HullMeshes {
    pub fn render(geometry: HullGeometry) -> Self {
        Self {
            render: Some(geometry),
            collision: None,
        }
    }

    /// The collision mesh when requested and present, otherwise the render mesh.
    pub fn select(&self, use_collision: bool) -> Option<&HullGeometry> {
        match (&self.collision, &self.render) {
            (Some(collision), _) if use_collision => Some(collision),
            (_, Some(render)) => Some(render),
            (Some(collision), None) => Some(collision),
            (None, None) => None,
        }
    }
}

/// Per-step outcome of [`HullBuoyancy::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HullStepStats {
    pub samples: usize,
    pub submerged: usize,
}

/// Buoyancy and drag over area-weighted hull samples.
#[derive(Debug, Clone)]
pub struct HullBuoyancy {
    config: HullBuoyancyConfig,
    model: BuoyancyModel,
    geometry: HullGeometry,
    samples: HullSamples,
    /// Mesh space relative to the body origin.
    mesh_offset: Transform,
}

impl HullBuoyancy {
    /// Build samples from the chosen mesh. Missing or degenerate geometry is allowed
    /// and logged; the hull then produces no buoyancy.
    pub fn new(config: HullBuoyancyConfig, meshes: &HullMeshes) -> Result<Self, ConfigError> {
        config.validate()?;

        let geometry = match meshes.select(config.use_collision_mesh) {
            Some(geometry) => geometry.clone(),
            None => {
                log::warn!("Hull buoyancy has no mesh; it will produce no lift");
                HullGeometry::default()
            }
        };
        let samples = HullSamples::build(&geometry, config.vertex_stride);
        warn_if_degenerate(&geometry, &samples);
        log::debug!(
            "Hull buoyancy: {} samples from {} vertices (stride {})",
            samples.len(),
            geometry.vertices().len(),
            samples.stride()
        );

        Ok(Self {
            config,
            model: BuoyancyModel::new(config.buoyancy(), BuoyancyLaw::DepthProportional),
            geometry,
            samples,
            mesh_offset: Transform::default(),
        })
    }

    pub fn with_mesh_offset(mut self, offset: Transform) -> Self {
        self.mesh_offset = offset;
        self
    }

    pub fn config(&self) -> &HullBuoyancyConfig {
        &self.config
    }

    pub fn samples(&self) -> &HullSamples {
        &self.samples
    }

    /// Change sampling density and rebuild the sample set wholesale.
    pub fn set_vertex_stride(&mut self, stride: usize) {
        let stride = stride.max(1);
        if stride == self.samples.stride() {
            return;
        }
        self.config.vertex_stride = stride;
        self.samples.rebuild(&self.geometry, stride);
    }

    /// World position of every sample under the body's current pose.
    pub fn sample_points(&self, pose: &Transform) -> Vec<Vec3> {
        self.samples
            .samples()
            .iter()
            .map(|s| pose.transform_point(self.mesh_offset.transform_point(s.local_position)))
            .collect()
    }

    /// Apply split angular damping, then lift and drag at every submerged sample.
    pub fn step(
        &self,
        body: &mut dyn RigidBodyForces,
        water: &WaterOracle,
        gravity: Vec3,
        observer: &mut dyn ForceObserver,
    ) -> HullStepStats {
        let mut stats = HullStepStats {
            samples: self.samples.len(),
            submerged: 0,
        };
        if self.samples.is_empty() {
            return stats;
        }

        let alpha = self.config.angular_damping().apply(body);
        observer.on_torque(ForceKind::AngularDamping, alpha);

        let drag = self.config.drag();
        let pose = body.pose();
        for sample in self.samples.samples() {
            let point = pose.transform_point(self.mesh_offset.transform_point(sample.local_position));
            let depth = water.height_at(point) - point.y;
            let Some(lift) = self.model.apply(
                body,
                point,
                depth,
                gravity,
                SampleWeight::Area(sample.weight),
            ) else {
                continue;
            };
            stats.submerged += 1;
            observer.on_force(ForceKind::Buoyancy, point, lift.force);

            let resist = drag.apply_at_point(body, point, lift.submersion, sample.weight);
            observer.on_force(ForceKind::Drag, point, resist);
        }
        stats
    }
}

fn warn_if_degenerate(geometry: &HullGeometry, samples: &HullSamples) {
    if geometry.vertices().is_empty() || geometry.triangles().is_empty() {
        log::warn!("Hull mesh has no vertices or triangles; buoyancy disabled");
    } else if geometry.surface_area() <= 0.0 {
        log::warn!("Hull mesh has zero surface area; buoyancy disabled");
    } else if samples.is_empty() {
        log::warn!("Hull sampling produced no points; buoyancy disabled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{NullObserver, RecordingObserver};
    use crate::testing::{assert_vec_near, RecordingBody};
    use glam::Quat;

    const G: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    fn box_hull(stride: usize) -> HullBuoyancy {
        let config = HullBuoyancyConfig {
            vertex_stride: stride,
            ..Default::default()
        };
        HullBuoyancy::new(config, &HullMeshes::render(HullGeometry::cuboid(Vec3::new(2.0, 0.5, 1.0))))
            .unwrap()
    }

    #[test]
    fn fully_submerged_box_lifts_density_times_g() {
        let hull = box_hull(1);
        let mut body = RecordingBody::new(500.0).at(Vec3::new(0.0, -5.0, 0.0));
        let stats = hull.step(&mut body, &WaterOracle::Flat(0.0), G, &mut NullObserver);
        assert_eq!(stats.samples, 8);
        assert_eq!(stats.submerged, 8);
        // Weights sum to 1, every sample at full submersion.
        assert_vec_near(body.net_force, Vec3::new(0.0, 9810.0, 0.0), 0.5);
        assert_vec_near(body.net_torque, Vec3::ZERO, 1e-2);
    }

    #[test]
    fn dry_hull_only_damps() {
        let hull = box_hull(1);
        let mut body = RecordingBody::new(500.0).at(Vec3::new(0.0, 5.0, 0.0));
        body.angvel = Vec3::new(1.0, 1.0, 0.0);
        let mut observer = RecordingObserver::default();
        let stats = hull.step(&mut body, &WaterOracle::Flat(0.0), G, &mut observer);
        assert_eq!(stats.submerged, 0);
        assert_eq!(observer.count(ForceKind::Buoyancy), 0);
        assert_vec_near(
            observer.total_torque(ForceKind::AngularDamping),
            Vec3::new(-0.8, -0.1, 0.0),
            1e-6,
        );
        assert_vec_near(body.net_force, Vec3::ZERO, 1e-6);
    }

    #[test]
    fn lift_grows_with_draft() {
        let hull = box_hull(1);
        let lift_at = |y: f32| {
            let mut body = RecordingBody::new(500.0).at(Vec3::new(0.0, y, 0.0));
            hull.step(&mut body, &WaterOracle::Flat(0.0), G, &mut NullObserver);
            body.net_force.y
        };
        let shallow = lift_at(0.4);
        let deeper = lift_at(0.0);
        let deepest = lift_at(-0.4);
        assert!(shallow > 0.0);
        assert!(deeper > shallow);
        assert!(deepest > deeper);
    }

    #[test]
    fn heeled_hull_rights_itself() {
        let hull = box_hull(1);
        let mut body = RecordingBody::new(500.0)
            .rotated(Quat::from_rotation_x(0.3))
            .at(Vec3::new(0.0, 0.2, 0.0));
        hull.step(&mut body, &WaterOracle::Flat(0.0), G, &mut NullObserver);
        assert!(body.net_torque.x < 0.0);
    }

    #[test]
    fn drag_opposes_motion_through_water() {
        let hull = box_hull(1);
        let mut body = RecordingBody::new(500.0).at(Vec3::new(0.0, -5.0, 0.0));
        body.linvel = Vec3::new(3.0, -1.0, 0.0);
        let mut observer = RecordingObserver::default();
        hull.step(&mut body, &WaterOracle::Flat(0.0), G, &mut observer);
        // Full submersion, weights summing to 1.
        assert_vec_near(
            observer.total_force(ForceKind::Drag),
            Vec3::new(-3.0 * 0.8, 0.4, 0.0),
            1e-4,
        );
    }

    #[test]
    fn changing_stride_rebuilds_samples() {
        let mut hull = box_hull(1);
        assert_eq!(hull.samples().len(), 8);
        hull.set_vertex_stride(3);
        assert_eq!(hull.samples().len(), 3);
        assert_eq!(hull.config().vertex_stride, 3);
        assert!((hull.samples().total_weight() - 1.0).abs() < 1e-5);
        hull.set_vertex_stride(0);
        assert_eq!(hull.samples().stride(), 1);
        assert_eq!(hull.samples().len(), 8);
    }

    #[test]
    fn missing_mesh_produces_nothing() {
        let hull = HullBuoyancy::new(HullBuoyancyConfig::default(), &HullMeshes::default()).unwrap();
        let mut body = RecordingBody::new(10.0).at(Vec3::new(0.0, -1.0, 0.0));
        body.angvel = Vec3::Y;
        let stats = hull.step(&mut body, &WaterOracle::Flat(0.0), G, &mut NullObserver);
        assert_eq!(stats, HullStepStats::default());
        assert!(body.applied.is_empty());
    }

    #[test]
    fn collision_mesh_used_only_when_asked() {
        let render = HullGeometry::cuboid(Vec3::ONE);
        let collision = HullGeometry::cuboid(Vec3::splat(2.0));
        let meshes = HullMeshes {
            render: Some(render.clone()),
            collision: Some(collision.clone()),
        };
        assert_eq!(meshes.select(false), Some(&render));
        assert_eq!(meshes.select(true), Some(&collision));
        let only_collision = HullMeshes {
            render: None,
            collision: Some(collision.clone()),
        };
        assert_eq!(only_collision.select(false), Some(&collision));
    }

    #[test]
    fn zero_stride_is_rejected() {
        let config = HullBuoyancyConfig {
            vertex_stride: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroVertexStride));
    }

    #[test]
    fn mesh_offset_moves_samples() {
        let hull = box_hull(1).with_mesh_offset(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)));
        let pose = Transform::from_position(Vec3::new(3.0, 0.0, 0.0));
        let points = hull.sample_points(&pose);
        assert_eq!(points.len(), 8);
        for p in points {
            assert!((p.x - 3.0).abs() <= 2.0 + 1e-5);
            assert!((p.y - 1.5).abs() < 1e-5 || (p.y - 0.5).abs() < 1e-5, "y = {}", p.y);
        }
    }
}
