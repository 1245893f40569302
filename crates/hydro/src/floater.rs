//! Single-point floaters mounted at fixed spots on the hull (typically the four corners).
//!
//! Two tunings coexist and are picked per boat through [`FloaterVariant`]:
//! - `Legacy`: depth-proportional lift as an acceleration, with drag on the whole body
//!   scaled by how deep the floater sits. Usually paired with gravity shared across floaters.
//! - `SpringDamper`: spring-damper lift, planar drag at the floater and angular damping
//!   spread evenly over all floaters.

use crate::buoyancy::{BuoyancyConfig, BuoyancyLaw, BuoyancyModel, SampleWeight};
use crate::drag::{DragConfig, WholeBodyDrag};
use crate::error::ConfigError;
use crate::observer::{ForceKind, ForceObserver};
use crate::water::WaterOracle;
use engine_core::{ForceMode, RigidBodyForces};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Depth-proportional floater with whole-body drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegacyFloaterConfig {
    #[serde(default = "default_legacy_depth")]
    pub depth_before_submerged: f32,
    /// Lift multiplier; also scales the drag terms.
    #[serde(default = "default_displacement")]
    pub displacement: f32,
    #[serde(default = "default_water_drag")]
    pub water_drag: f32,
    #[serde(default = "default_angular_drag")]
    pub angular_drag: f32,
}

fn default_legacy_depth() -> f32 {
    1.0
}
fn default_displacement() -> f32 {
    3.0
}
fn default_water_drag() -> f32 {
    0.99
}
fn default_angular_drag() -> f32 {
    0.5
}

impl Default for LegacyFloaterConfig {
    fn default() -> Self {
        Self {
            depth_before_submerged: default_legacy_depth(),
            displacement: default_displacement(),
            water_drag: default_water_drag(),
            angular_drag: default_angular_drag(),
        }
    }
}

/// Spring-damper floater.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringDamperConfig {
    #[serde(default = "default_full_submersion_depth")]
    pub full_submersion_depth: f32,
    /// Newtons at full submersion; `<= 0` derives it from the hull's weight.
    #[serde(default)]
    pub spring_strength: f32,
    /// Newtons per m/s of vertical point velocity.
    #[serde(default = "default_spring_damping")]
    pub damping: f32,
    #[serde(default = "default_horizontal_drag")]
    pub horizontal_drag: f32,
    /// Total angular damping, split evenly over the floaters.
    #[serde(default = "default_angular_damping")]
    pub angular_damping: f32,
}

fn default_full_submersion_depth() -> f32 {
    0.8
}
fn default_spring_damping() -> f32 {
    160.0
}
fn default_horizontal_drag() -> f32 {
    0.9
}
fn default_angular_damping() -> f32 {
    0.6
}

impl Default for SpringDamperConfig {
    fn default() -> Self {
        Self {
            full_submersion_depth: default_full_submersion_depth(),
            spring_strength: 0.0,
            damping: default_spring_damping(),
            horizontal_drag: default_horizontal_drag(),
            angular_damping: default_angular_damping(),
        }
    }
}

/// Which floater tuning a boat uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FloaterVariant {
    Legacy(LegacyFloaterConfig),
    SpringDamper(SpringDamperConfig),
}

impl Default for FloaterVariant {
    fn default() -> Self {
        FloaterVariant::SpringDamper(SpringDamperConfig::default())
    }
}

impl FloaterVariant {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            FloaterVariant::Legacy(c) => {
                ConfigError::finite("depth_before_submerged", c.depth_before_submerged)?;
                ConfigError::finite("displacement", c.displacement)?;
                ConfigError::non_negative("water_drag", c.water_drag)?;
                ConfigError::non_negative("angular_drag", c.angular_drag)
            }
            FloaterVariant::SpringDamper(c) => {
                ConfigError::finite("full_submersion_depth", c.full_submersion_depth)?;
                ConfigError::finite("spring_strength", c.spring_strength)?;
                ConfigError::non_negative("damping", c.damping)?;
                ConfigError::non_negative("horizontal_drag", c.horizontal_drag)?;
                ConfigError::non_negative("angular_damping", c.angular_damping)
            }
        }
    }

    fn model(&self) -> FloaterModel {
        match *self {
            FloaterVariant::Legacy(c) => FloaterModel {
                buoyancy: BuoyancyModel::new(
                    BuoyancyConfig {
                        depth_for_full_force: c.depth_before_submerged,
                        strength_scale: c.displacement,
                        ..Default::default()
                    },
                    BuoyancyLaw::DepthProportional,
                ),
                drag: FloaterDrag::WholeBody(WholeBodyDrag {
                    linear: DragConfig::isotropic(c.water_drag),
                    angular: c.angular_drag,
                }),
            },
            FloaterVariant::SpringDamper(c) => FloaterModel {
                buoyancy: BuoyancyModel::new(
                    BuoyancyConfig {
                        depth_for_full_force: c.full_submersion_depth,
                        damping_coefficient: c.damping,
                        ..Default::default()
                    },
                    BuoyancyLaw::SpringDamper {
                        spring_strength: c.spring_strength,
                    },
                ),
                drag: FloaterDrag::Point {
                    drag: DragConfig::planar_only(c.horizontal_drag),
                    angular_damping: c.angular_damping,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FloaterDrag {
    /// Scaled by submersion times strength, applied at the centre of mass.
    WholeBody(WholeBodyDrag),
    /// At the floater, plus a share of uniform angular damping.
    Point { drag: DragConfig, angular_damping: f32 },
}

/// Resolved lift law and drag for one floater set.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FloaterModel {
    buoyancy: BuoyancyModel,
    drag: FloaterDrag,
}

/// Floaters at hull-local mount points sharing one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FloaterSet {
    mounts: Vec<Vec3>,
    variant: FloaterVariant,
    model: FloaterModel,
}

impl Default for FloaterSet {
    fn default() -> Self {
        Self::new(Vec::new(), FloaterVariant::default())
    }
}

impl FloaterSet {
    pub fn new(mounts: Vec<Vec3>, variant: FloaterVariant) -> Self {
        Self {
            mounts,
            variant,
            model: variant.model(),
        }
    }

    /// Four floaters at the corners of a `length` x `beam` rectangle, `height` below the origin.
    pub fn corners(length: f32, beam: f32, height: f32, variant: FloaterVariant) -> Self {
        let (hl, hb) = (length * 0.5, beam * 0.5);
        let mounts = vec![
            Vec3::new(hl, -height, -hb),
            Vec3::new(-hl, -height, -hb),
            Vec3::new(hl, -height, hb),
            Vec3::new(-hl, -height, hb),
        ];
        Self::new(mounts, variant)
    }

    /// Resolve automatic spring strength for a body of `mass`.
    pub fn resolve(&mut self, mass: f32, gravity: Vec3) {
        let count = self.mounts.len();
        self.model.buoyancy.resolve(mass, gravity, count);
    }

    pub fn mounts(&self) -> &[Vec3] {
        &self.mounts
    }

    pub fn variant(&self) -> &FloaterVariant {
        &self.variant
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Run every floater for one step. Returns how many were submerged.
    ///
    /// With `share_gravity`, each floater also carries `gravity / count` at its mount.
    pub fn step(
        &self,
        body: &mut dyn RigidBodyForces,
        water: &WaterOracle,
        gravity: Vec3,
        share_gravity: bool,
        observer: &mut dyn ForceObserver,
    ) -> usize {
        if self.mounts.is_empty() {
            return 0;
        }
        let count = self.mounts.len() as f32;
        let pose = body.pose();
        let mut submerged = 0;

        for &mount in &self.mounts {
            let point = pose.transform_point(mount);

            if share_gravity {
                let share = gravity / count;
                body.apply_force_at_point(share, point, ForceMode::Acceleration);
                observer.on_force(ForceKind::Gravity, point, share);
            }

            let depth = water.height_at(point) - point.y;
            let Some(lift) = self
                .model
                .buoyancy
                .apply(body, point, depth, gravity, SampleWeight::Unit)
            else {
                continue;
            };
            submerged += 1;
            observer.on_force(ForceKind::Buoyancy, point, lift.force);

            match &self.model.drag {
                FloaterDrag::WholeBody(drag) => {
                    let scale = lift.submersion * self.model.buoyancy.config.strength_scale;
                    let (linear, angular) = drag.apply(body, scale);
                    observer.on_force(ForceKind::Drag, body.center_of_mass(), linear);
                    observer.on_torque(ForceKind::AngularDamping, angular);
                }
                FloaterDrag::Point { drag, angular_damping } => {
                    let force = drag.apply_at_point(body, point, lift.submersion, 1.0);
                    observer.on_force(ForceKind::Drag, point, force);

                    let alpha = -body.angular_velocity() * (angular_damping / count);
                    body.apply_torque(alpha, ForceMode::Acceleration);
                    observer.on_torque(ForceKind::AngularDamping, alpha);
                }
            }
        }
        submerged
    }
}
