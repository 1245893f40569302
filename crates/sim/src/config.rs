//! Simulation configuration. Loaded from boatsim.ron at startup.

use crate::script::ScriptKey;
use glam::Vec3;
use hydro::{
    BoatConfig, BuoyancySetup, DifferentialDrive, DriveConfig, FloaterVariant, GravityMode,
    HullBuoyancyConfig, LegacyFloaterConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scene, timing and boats for one headless run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Physics rate in Hz.
    #[serde(default = "default_fixed_rate")]
    pub fixed_rate_hz: f64,
    /// Simulated seconds to run.
    #[serde(default = "default_duration")]
    pub duration_seconds: f32,
    /// Seconds between trajectory log lines.
    #[serde(default = "default_log_interval")]
    pub log_interval_seconds: f32,
    #[serde(default = "default_gravity")]
    pub gravity: Vec3,
    /// Height of the flat water plane.
    #[serde(default)]
    pub water_level: f32,
    #[serde(default = "default_boats")]
    pub boats: Vec<BoatSpec>,
    /// Throttle/steer keys, held until the next key.
    #[serde(default = "default_script")]
    pub script: Vec<ScriptKey>,
}

fn default_fixed_rate() -> f64 {
    50.0
}
fn default_duration() -> f32 {
    30.0
}
fn default_log_interval() -> f32 {
    1.0
}
fn default_gravity() -> Vec3 {
    Vec3::new(0.0, -9.81, 0.0)
}
fn default_boats() -> Vec<BoatSpec> {
    vec![BoatSpec::pontoon(), BoatSpec::raft()]
}
fn default_script() -> Vec<ScriptKey> {
    vec![
        ScriptKey::new(0.0, 0.0, 0.0),
        ScriptKey::new(3.0, 1.0, 0.0),
        ScriptKey::new(12.0, 0.6, 0.8),
        ScriptKey::new(18.0, 0.6, -0.8),
        ScriptKey::new(24.0, -0.5, 0.0),
        ScriptKey::new(27.0, 0.0, 0.0),
    ]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_rate_hz: default_fixed_rate(),
            duration_seconds: default_duration(),
            log_interval_seconds: default_log_interval(),
            gravity: default_gravity(),
            water_level: 0.0,
            boats: default_boats(),
            script: default_script(),
        }
    }
}

/// One hull in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatSpec {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Heading about world up.
    #[serde(default)]
    pub yaw_degrees: f32,
    /// Half sizes of the hull box.
    #[serde(default = "default_half_extents")]
    pub half_extents: Vec3,
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Engine-side damping on top of the force model.
    #[serde(default = "default_linear_damping")]
    pub linear_damping: f32,
    #[serde(default = "default_angular_damping")]
    pub angular_damping: f32,
    #[serde(default)]
    pub boat: BoatConfig,
}

fn default_half_extents() -> Vec3 {
    Vec3::new(1.5, 0.25, 0.75)
}
fn default_mass() -> f32 {
    150.0
}
fn default_linear_damping() -> f32 {
    0.3
}
fn default_angular_damping() -> f32 {
    0.4
}

impl BoatSpec {
    /// Twin-motor pontoon with mesh-weighted buoyancy.
    ///
    /// The hull box has only eight vertices, so every one of them is sampled; a
    /// coarser stride would leave whole corners without lift.
    pub fn pontoon() -> Self {
        let h = default_half_extents();
        Self {
            name: "pontoon".into(),
            position: Vec3::new(0.0, 0.5, 0.0),
            yaw_degrees: 0.0,
            half_extents: h,
            mass: default_mass(),
            linear_damping: default_linear_damping(),
            angular_damping: default_angular_damping(),
            boat: BoatConfig {
                buoyancy: BuoyancySetup::Hull(HullBuoyancyConfig {
                    vertex_stride: 1,
                    ..Default::default()
                }),
                drive: Some(DifferentialDrive::new(
                    DriveConfig::default(),
                    Some(Vec3::new(-h.x * 0.9, 0.0, -h.z * 0.8)),
                    Some(Vec3::new(-h.x * 0.9, 0.0, h.z * 0.8)),
                )),
                ..Default::default()
            },
        }
    }

    /// Undriven raft on four corner floaters carrying their own share of gravity.
    pub fn raft() -> Self {
        let h = Vec3::new(1.0, 0.15, 1.0);
        let mounts = vec![
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(-h.x, -h.y, h.z),
        ];
        Self {
            name: "raft".into(),
            position: Vec3::new(0.0, 0.3, 6.0),
            yaw_degrees: 30.0,
            half_extents: h,
            mass: 60.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
            boat: BoatConfig {
                gravity: GravityMode::SharedAcrossFloaters,
                buoyancy: BuoyancySetup::Floaters {
                    variant: FloaterVariant::Legacy(LegacyFloaterConfig::default()),
                    mounts,
                },
                ..Default::default()
            },
        }
    }
}

impl SimConfig {
    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        } else {
            log::info!("No config at {:?}, using defaults", path);
        }
        Self::default()
    }

    /// Fixed timestep in seconds.
    pub fn timestep(&self) -> f32 {
        (1.0 / self.fixed_rate_hz) as f32
    }
}

/// First CLI argument, or `boatsim.ron` in the current directory.
pub fn config_path(arg: Option<String>) -> PathBuf {
    match arg {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("boatsim.ron"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydro::{HullGeometry, HullSamples};

    #[test]
    fn defaults_survive_ron() {
        let config = SimConfig::default();
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let back: SimConfig = ron::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let text = r#"(
            duration_seconds: 5.0,
            boats: [
                (
                    name: "skiff",
                    mass: 90.0,
                    boat: (
                        gravity: CenterOfMass,
                        buoyancy: Floaters(
                            variant: SpringDamper((damping: 120.0)),
                            mounts: [(1.0, -0.2, 0.5), (-1.0, -0.2, -0.5)],
                        ),
                        drive: Some((config: (turn_mix: 1.0))),
                    ),
                ),
            ],
        )"#;
        let config: SimConfig = ron::from_str(text).unwrap();
        assert_eq!(config.duration_seconds, 5.0);
        assert_eq!(config.fixed_rate_hz, 50.0);
        assert_eq!(config.script, default_script());

        let skiff = &config.boats[0];
        assert_eq!(skiff.half_extents, default_half_extents());
        assert_eq!(skiff.boat.gravity, GravityMode::CenterOfMass);
        let drive = skiff.boat.drive.unwrap();
        assert_eq!(drive.config.turn_mix, 1.0);
        assert_eq!(drive.config.max_forward_thrust, 50.0);
        assert!(drive.left_motor.is_none());
        match &skiff.boat.buoyancy {
            BuoyancySetup::Floaters { variant: FloaterVariant::SpringDamper(c), mounts } => {
                assert_eq!(c.damping, 120.0);
                assert_eq!(c.full_submersion_depth, 0.8);
                assert_eq!(mounts.len(), 2);
            }
            other => panic!("unexpected buoyancy {:?}", other),
        }
        assert!(skiff.boat.validate().is_ok());
    }

    #[test]
    fn pontoon_samples_every_bottom_corner() {
        let pontoon = BoatSpec::pontoon();
        let BuoyancySetup::Hull(hull) = &pontoon.boat.buoyancy else {
            panic!("pontoon should use hull buoyancy");
        };
        let samples = HullSamples::build(&HullGeometry::cuboid(pontoon.half_extents), hull.vertex_stride);
        let bottom: Vec<Vec3> = samples
            .samples()
            .iter()
            .map(|s| s.local_position)
            .filter(|p| p.y < 0.0)
            .collect();
        assert_eq!(bottom.len(), 4);
        for (bow, port) in [(true, true), (true, false), (false, true), (false, false)] {
            assert!(
                bottom.iter().any(|p| (p.x > 0.0) == bow && (p.z > 0.0) == port),
                "no bottom sample at bow={} port={}",
                bow,
                port
            );
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = SimConfig::load(Path::new("/nonexistent/boatsim.ron"));
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn explicit_path_wins() {
        assert_eq!(config_path(Some("a.ron".into())), PathBuf::from("a.ron"));
        assert!(config_path(None).ends_with("boatsim.ron"));
    }
}
