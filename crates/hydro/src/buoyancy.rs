//! Per-point buoyancy laws.
//!
//! Two force laws are supported and chosen at configuration time:
//! - [`BuoyancyLaw::DepthProportional`]: upward acceleration `|g| * submersion`, or for
//!   area-weighted hull samples a force `density * |g| * submersion * weight`.
//! - [`BuoyancyLaw::SpringDamper`]: upward force `submersion * k - c * v_y`, where `v_y`
//!   is the vertical velocity of the material point under water.

use crate::error::ConfigError;
use engine_core::{ForceMode, RigidBodyForces, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Smallest depth scale used as a divisor.
pub const MIN_FULL_FORCE_DEPTH: f32 = 1e-4;

/// Fraction of full buoyancy at `depth`: 0 above water, 1 at or below `depth_for_full_force`.
pub fn submersion_factor(depth: f32, depth_for_full_force: f32) -> f32 {
    if depth <= 0.0 {
        return 0.0;
    }
    (depth / depth_for_full_force.max(MIN_FULL_FORCE_DEPTH)).clamp(0.0, 1.0)
}

/// Shared buoyancy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuoyancyConfig {
    /// Submersion depth at which buoyancy reaches its maximum.
    #[serde(default = "default_full_force_depth")]
    pub depth_for_full_force: f32,
    /// Global buoyancy multiplier.
    #[serde(default = "default_one")]
    pub strength_scale: f32,
    /// Spring-damper law: force per unit of vertical point velocity.
    #[serde(default)]
    pub damping_coefficient: f32,
    /// Area-weighted samples: fluid density (kg/m^3).
    #[serde(default = "default_water_density")]
    pub water_density: f32,
}

fn default_full_force_depth() -> f32 {
    0.6
}
fn default_one() -> f32 {
    1.0
}
fn default_water_density() -> f32 {
    1000.0
}

impl Default for BuoyancyConfig {
    fn default() -> Self {
        Self {
            depth_for_full_force: default_full_force_depth(),
            strength_scale: default_one(),
            damping_coefficient: 0.0,
            water_density: default_water_density(),
        }
    }
}

impl BuoyancyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::finite("depth_for_full_force", self.depth_for_full_force)?;
        ConfigError::finite("strength_scale", self.strength_scale)?;
        ConfigError::non_negative("damping_coefficient", self.damping_coefficient)?;
        ConfigError::non_negative("water_density", self.water_density)?;
        if self.depth_for_full_force <= MIN_FULL_FORCE_DEPTH {
            log::warn!(
                "depth_for_full_force {} is degenerate, clamping to {}",
                self.depth_for_full_force,
                MIN_FULL_FORCE_DEPTH
            );
        }
        Ok(())
    }
}

/// Which force law converts submersion into lift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum BuoyancyLaw {
    #[default]
    DepthProportional,
    /// `spring_strength <= 0` is replaced by an automatic value on [`BuoyancyModel::resolve`].
    SpringDamper { spring_strength: f32 },
}

/// How much of the hull a sample point stands for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SampleWeight {
    /// A lone floater or the whole body.
    Unit,
    /// A mesh sample carrying a normalized area weight.
    Area(f32),
}

/// The lift produced at one submerged point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuoyancyContribution {
    pub force: Vec3,
    pub mode: ForceMode,
    /// Submersion factor in `[0, 1]`, reused by the drag pass.
    pub submersion: f32,
}

/// A configured buoyancy law.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuoyancyModel {
    #[serde(default)]
    pub config: BuoyancyConfig,
    #[serde(default)]
    pub law: BuoyancyLaw,
}

impl BuoyancyModel {
    pub fn new(config: BuoyancyConfig, law: BuoyancyLaw) -> Self {
        Self { config, law }
    }

    /// Fill in an automatic spring strength: the body's weight shared across `floaters`.
    pub fn resolve(&mut self, mass: f32, gravity: Vec3, floaters: usize) {
        if let BuoyancyLaw::SpringDamper { spring_strength } = &mut self.law {
            if *spring_strength <= 0.0 {
                *spring_strength = auto_spring_strength(mass, gravity, floaters);
                log::debug!("Auto spring strength {:.1} N per floater", spring_strength);
            }
        }
    }

    pub fn submersion(&self, depth: f32) -> f32 {
        submersion_factor(depth, self.config.depth_for_full_force)
    }

    /// Lift at a point `depth` below the surface moving with `point_velocity`.
    ///
    /// Returns `None` when the point is not submerged.
    pub fn contribution(
        &self,
        depth: f32,
        point_velocity: Vec3,
        gravity: Vec3,
        weight: SampleWeight,
    ) -> Option<BuoyancyContribution> {
        if depth <= 0.0 {
            return None;
        }
        let submersion = self.submersion(depth);
        let cfg = &self.config;

        let (force, mode) = match self.law {
            BuoyancyLaw::DepthProportional => {
                let lift = gravity.y.abs() * submersion * cfg.strength_scale;
                match weight {
                    SampleWeight::Unit => (WORLD_UP * lift, ForceMode::Acceleration),
                    SampleWeight::Area(w) => (WORLD_UP * lift * cfg.water_density * w, ForceMode::Force),
                }
            }
            BuoyancyLaw::SpringDamper { spring_strength } => {
                let spring = submersion * spring_strength * cfg.strength_scale;
                let damping = cfg.damping_coefficient * point_velocity.dot(WORLD_UP);
                let share = match weight {
                    SampleWeight::Unit => 1.0,
                    SampleWeight::Area(w) => w,
                };
                (WORLD_UP * (spring - damping) * share, ForceMode::Force)
            }
        };

        Some(BuoyancyContribution {
            force,
            mode,
            submersion,
        })
    }

    /// Compute and apply the lift at `point` on `body`.
    pub fn apply(
        &self,
        body: &mut dyn RigidBodyForces,
        point: Vec3,
        depth: f32,
        gravity: Vec3,
        weight: SampleWeight,
    ) -> Option<BuoyancyContribution> {
        if depth <= 0.0 {
            return None;
        }
        let point_velocity = match self.law {
            BuoyancyLaw::SpringDamper { .. } => body.point_velocity(point),
            BuoyancyLaw::DepthProportional => Vec3::ZERO,
        };
        let contribution = self.contribution(depth, point_velocity, gravity, weight)?;
        body.apply_force_at_point(contribution.force, point, contribution.mode);
        Some(contribution)
    }
}

/// Spring strength that holds the body's weight when every floater is fully submerged.
pub fn auto_spring_strength(mass: f32, gravity: Vec3, floaters: usize) -> f32 {
    mass * gravity.y.abs() / floaters.max(1) as f32
}
