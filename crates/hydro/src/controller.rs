//! Per-step boat controller: gravity, buoyancy, drive, planting damping and the
//! upright stabilizer, reduced into one net load on the hull.

use crate::accumulator::{ForceAccumulator, NetLoad};
use crate::damping::AngularDampingConfig;
use crate::drag::decompose;
use crate::drive::{DifferentialDrive, DriveInput, DriveOutput};
use crate::error::ConfigError;
use crate::floater::{FloaterSet, FloaterVariant};
use crate::hull::{HullBuoyancy, HullBuoyancyConfig, HullMeshes};
use crate::observer::{ForceKind, ForceObserver};
use crate::stabilizer::{StabilizerConfig, UprightStabilizer};
use crate::water::{WaterConfig, WaterOracle, WaterSurface};
use engine_core::{ForceMode, RigidBodyForces, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Who applies gravity to the hull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GravityMode {
    /// The physics engine integrates gravity itself.
    #[default]
    Engine,
    /// The controller applies it as an acceleration through the centre of mass.
    CenterOfMass,
    /// Split evenly across floater mounts; centre of mass when there are none.
    SharedAcrossFloaters,
}

/// Extra damping that keeps a driven hull planted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlantingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How far the centre of mass is lowered at initialization.
    #[serde(default = "default_com_lowering")]
    pub com_lowering: f32,
    #[serde(default = "default_horizontal_drag")]
    pub horizontal_drag: f32,
    #[serde(default = "default_yaw_damping")]
    pub yaw_damping: f32,
    #[serde(default = "default_roll_pitch_damping")]
    pub roll_pitch_damping: f32,
}

fn default_true() -> bool {
    true
}
fn default_com_lowering() -> f32 {
    0.3
}
fn default_horizontal_drag() -> f32 {
    1.2
}
fn default_yaw_damping() -> f32 {
    0.8
}
fn default_roll_pitch_damping() -> f32 {
    10.0
}

impl Default for PlantingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            com_lowering: default_com_lowering(),
            horizontal_drag: default_horizontal_drag(),
            yaw_damping: default_yaw_damping(),
            roll_pitch_damping: default_roll_pitch_damping(),
        }
    }
}

impl PlantingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::finite("com_lowering", self.com_lowering)?;
        ConfigError::non_negative("horizontal_drag", self.horizontal_drag)?;
        self.angular().validate()
    }

    pub fn angular(&self) -> AngularDampingConfig {
        AngularDampingConfig::new(self.yaw_damping, self.roll_pitch_damping)
    }

    /// Body-local shift applied to the centre of mass once, before the first step.
    pub fn center_of_mass_offset(&self) -> Vec3 {
        if self.enabled {
            -WORLD_UP * self.com_lowering.abs()
        } else {
            Vec3::ZERO
        }
    }

    /// Horizontal linear drag and split angular brakes, all as accelerations.
    pub fn apply(&self, body: &mut dyn RigidBodyForces) -> (Vec3, Vec3) {
        if !self.enabled {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        let (horizontal, _) = decompose(body.linear_velocity(), WORLD_UP);
        let linear = -horizontal * self.horizontal_drag;
        if linear != Vec3::ZERO {
            body.apply_force(linear, ForceMode::Acceleration);
        }
        let angular = self.angular().apply(body);
        (linear, angular)
    }
}

/// Where a boat's lift comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuoyancySetup {
    None,
    /// Area-weighted samples from the hull mesh.
    Hull(HullBuoyancyConfig),
    /// Single-point floaters at hull-local mounts.
    Floaters {
        variant: FloaterVariant,
        mounts: Vec<Vec3>,
    },
}

impl Default for BuoyancySetup {
    fn default() -> Self {
        BuoyancySetup::Hull(HullBuoyancyConfig::default())
    }
}

/// Everything that defines one boat's force model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoatConfig {
    #[serde(default)]
    pub gravity: GravityMode,
    #[serde(default)]
    pub water: WaterConfig,
    #[serde(default)]
    pub buoyancy: BuoyancySetup,
    #[serde(default)]
    pub drive: Option<DifferentialDrive>,
    #[serde(default)]
    pub planting: PlantingConfig,
    #[serde(default)]
    pub stabilizer: StabilizerConfig,
}

impl BoatConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::finite("water.flat_level", self.water.flat_level)?;
        match &self.buoyancy {
            BuoyancySetup::None => {}
            BuoyancySetup::Hull(hull) => hull.validate()?,
            BuoyancySetup::Floaters { variant, mounts } => {
                variant.validate()?;
                if mounts.iter().any(|m| !m.is_finite()) {
                    return Err(ConfigError::NonFinite("floater mount"));
                }
            }
        }
        if let Some(drive) = &self.drive {
            drive.config.validate()?;
        }
        self.planting.validate()?;
        self.stabilizer.validate()
    }
}

/// Built buoyancy component.
#[derive(Debug, Clone)]
pub enum BuoyancySource {
    None,
    Hull(HullBuoyancy),
    Floaters(FloaterSet),
}

/// What one controller step did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Hull samples or floaters under water.
    pub submerged: usize,
    /// Hull samples or floaters evaluated.
    pub samples: usize,
    /// Net force and torque handed to the body.
    pub load: NetLoad,
    pub drive: Option<DriveOutput>,
    /// Upright angular acceleration, when the stabilizer acted.
    pub upright: Option<Vec3>,
}

/// Runs every force component of one boat against its rigid body.
#[derive(Debug, Clone)]
pub struct BoatController {
    config: BoatConfig,
    buoyancy: BuoyancySource,
    stabilizer: UprightStabilizer,
}

impl BoatController {
    /// Validate `config` and build the buoyancy component for a hull of `mass`.
    pub fn new(config: BoatConfig, meshes: &HullMeshes, mass: f32, gravity: Vec3) -> Result<Self, ConfigError> {
        config.validate()?;

        let buoyancy = match &config.buoyancy {
            BuoyancySetup::None => BuoyancySource::None,
            BuoyancySetup::Hull(hull) => BuoyancySource::Hull(HullBuoyancy::new(*hull, meshes)?),
            BuoyancySetup::Floaters { variant, mounts } => {
                if mounts.is_empty() {
                    log::warn!("Floater buoyancy configured without mounts; it will produce no lift");
                }
                let mut set = FloaterSet::new(mounts.clone(), *variant);
                set.resolve(mass, gravity);
                BuoyancySource::Floaters(set)
            }
        };

        Ok(Self {
            stabilizer: UprightStabilizer::new(config.stabilizer),
            config,
            buoyancy,
        })
    }

    pub fn config(&self) -> &BoatConfig {
        &self.config
    }

    pub fn buoyancy(&self) -> &BuoyancySource {
        &self.buoyancy
    }

    /// Whether the physics engine should integrate gravity for this body.
    pub fn uses_engine_gravity(&self) -> bool {
        self.config.gravity == GravityMode::Engine
    }

    /// Centre-of-mass lowering to apply when the body is created.
    pub fn center_of_mass_offset(&self) -> Vec3 {
        if self.config.drive.is_some() {
            self.config.planting.center_of_mass_offset()
        } else {
            Vec3::ZERO
        }
    }

    /// Height oracle for this boat given an optional attached surface.
    pub fn water<'a>(&self, surface: Option<&'a dyn WaterSurface>) -> WaterOracle<'a> {
        WaterOracle::select(&self.config.water, surface)
    }

    /// Compute every contribution for this step, then apply the net load to `body` once.
    pub fn step(
        &self,
        body: &mut dyn RigidBodyForces,
        water: &WaterOracle,
        input: DriveInput,
        gravity: Vec3,
        observer: &mut dyn ForceObserver,
    ) -> StepReport {
        let mut report = StepReport::default();
        let mut acc = ForceAccumulator::new(&*body);

        let floaters_share_gravity = match (&self.config.gravity, &self.buoyancy) {
            (GravityMode::SharedAcrossFloaters, BuoyancySource::Floaters(set)) if !set.is_empty() => true,
            (GravityMode::Engine, _) => false,
            _ => {
                acc.apply_force(gravity, ForceMode::Acceleration);
                observer.on_force(ForceKind::Gravity, acc.center_of_mass(), gravity);
                false
            }
        };

        match &self.buoyancy {
            BuoyancySource::None => {}
            BuoyancySource::Hull(hull) => {
                let stats = hull.step(&mut acc, water, gravity, observer);
                report.samples = stats.samples;
                report.submerged = stats.submerged;
            }
            BuoyancySource::Floaters(set) => {
                report.samples = set.len();
                report.submerged = set.step(&mut acc, water, gravity, floaters_share_gravity, observer);
            }
        }

        if let Some(drive) = &self.config.drive {
            if let Some(out) = drive.apply(&mut acc, input) {
                observer.on_force(ForceKind::Thrust, out.point, out.force);
                if out.yaw_torque != Vec3::ZERO {
                    observer.on_torque(ForceKind::Steering, out.yaw_torque);
                }
                report.drive = Some(out);
            }
            let (linear, angular) = self.config.planting.apply(&mut acc);
            if self.config.planting.enabled {
                observer.on_force(ForceKind::Drag, acc.center_of_mass(), linear);
                observer.on_torque(ForceKind::AngularDamping, angular);
            }
        }

        report.upright = self.stabilizer.apply(&mut acc);
        if let Some(alpha) = report.upright {
            observer.on_torque(ForceKind::Upright, alpha);
        }

        report.load = acc.finish();
        report.load.apply_to(body);
        report
    }
}
