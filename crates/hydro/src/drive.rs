//! Differential twin-thruster propulsion.
//!
//! Throttle and steer are mixed into left/right commands. The summed thrust acts at
//! the midpoint between the motors along the horizontal forward direction, and the
//! thrust difference becomes a yaw torque about world up. With either motor
//! missing, a single combined thrust acts through the centre of mass instead.

use crate::error::ConfigError;
use engine_core::{ForceMode, RigidBodyForces, Transform, WORLD_UP};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Forward directions shorter than this (nose pointing straight up or down) produce no thrust.
const MIN_FORWARD_LENGTH: f32 = 1e-4;

/// Throttle and steer commands in `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveInput {
    pub throttle: f32,
    pub steer: f32,
}

impl DriveInput {
    pub fn new(throttle: f32, steer: f32) -> Self {
        Self { throttle, steer }.clamped()
    }

    /// Clamp both axes into `[-1, 1]`; NaN becomes 0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
        Self {
            throttle: clamp(self.throttle),
            steer: clamp(self.steer),
        }
    }
}

/// Thrust limits and mixing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Thrust per motor at full forward command (N).
    #[serde(default = "default_max_forward")]
    pub max_forward_thrust: f32,
    /// Thrust per motor at full reverse command (N).
    #[serde(default = "default_max_reverse")]
    pub max_reverse_thrust: f32,
    /// Steering-to-differential gain in `[0, 1.5]`.
    #[serde(default = "default_turn_mix")]
    pub turn_mix: f32,
    #[serde(default)]
    pub invert_steer: bool,
    /// Hull-local axis the boat drives along.
    #[serde(default = "default_forward_axis")]
    pub forward_axis: Vec3,
    /// Force the single-point path even with both motors present.
    #[serde(default)]
    pub straight_line: bool,
}

fn default_max_forward() -> f32 {
    50.0
}
fn default_max_reverse() -> f32 {
    35.0
}
fn default_turn_mix() -> f32 {
    0.8
}
fn default_forward_axis() -> Vec3 {
    Vec3::X
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            max_forward_thrust: default_max_forward(),
            max_reverse_thrust: default_max_reverse(),
            turn_mix: default_turn_mix(),
            invert_steer: false,
            forward_axis: default_forward_axis(),
            straight_line: false,
        }
    }
}

impl DriveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("max_forward_thrust", self.max_forward_thrust)?;
        ConfigError::non_negative("max_reverse_thrust", self.max_reverse_thrust)?;
        ConfigError::finite("turn_mix", self.turn_mix)?;
        if !(0.0..=1.5).contains(&self.turn_mix) {
            return Err(ConfigError::TurnMixOutOfRange(self.turn_mix));
        }
        if !self.forward_axis.is_finite() || self.forward_axis.length_squared() < 1e-6 {
            return Err(ConfigError::NonFinite("forward_axis"));
        }
        Ok(())
    }

    /// Asymmetric command-to-thrust map.
    pub fn thrust(&self, command: f32) -> f32 {
        if command >= 0.0 {
            command * self.max_forward_thrust
        } else {
            command * self.max_reverse_thrust
        }
    }

    /// Clamp the input and apply steer inversion.
    pub fn shape_input(&self, input: DriveInput) -> DriveInput {
        let mut input = input.clamped();
        if self.invert_steer {
            input.steer = -input.steer;
        }
        input
    }
}

/// Left and right motor commands for `throttle` and `steer`.
pub fn mix(throttle: f32, steer: f32, turn_mix: f32) -> (f32, f32) {
    let left = (throttle - steer * turn_mix).clamp(-1.0, 1.0);
    let right = (throttle + steer * turn_mix).clamp(-1.0, 1.0);
    (left, right)
}

/// The hull's forward axis flattened onto the water plane, or `None` if it points vertically.
pub fn horizontal_forward(pose: &Transform, local_axis: Vec3) -> Option<Vec3> {
    let forward = pose.transform_direction(local_axis);
    let flat = forward - WORLD_UP * forward.dot(WORLD_UP);
    if flat.length() < MIN_FORWARD_LENGTH {
        return None;
    }
    Some(flat.normalize())
}

/// Which propulsion path produced a [`DriveOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveMode {
    Differential,
    SinglePoint,
}

/// Propulsion computed for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveOutput {
    pub mode: DriveMode,
    /// Net translational force.
    pub force: Vec3,
    /// World point the force acts at.
    pub point: Vec3,
    /// Torque about world up from the thrust difference.
    pub yaw_torque: Vec3,
    pub left_thrust: f32,
    pub right_thrust: f32,
}

/// Twin-motor drive with optional motor mounts in hull-local space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DifferentialDrive {
    #[serde(default)]
    pub config: DriveConfig,
    #[serde(default)]
    pub left_motor: Option<Vec3>,
    #[serde(default)]
    pub right_motor: Option<Vec3>,
}

impl DifferentialDrive {
    pub fn new(config: DriveConfig, left_motor: Option<Vec3>, right_motor: Option<Vec3>) -> Self {
        Self {
            config,
            left_motor,
            right_motor,
        }
    }

    /// Propulsion for `input` given the body pose and centre of mass.
    pub fn compute(&self, pose: &Transform, center_of_mass: Vec3, input: DriveInput) -> Option<DriveOutput> {
        let cfg = &self.config;
        let input = cfg.shape_input(input);
        let forward = horizontal_forward(pose, cfg.forward_axis)?;

        let motors = match (self.left_motor, self.right_motor) {
            (Some(l), Some(r)) if !cfg.straight_line => {
                Some((pose.transform_point(l), pose.transform_point(r)))
            }
            _ => None,
        };

        let Some((left_point, right_point)) = motors else {
            // Stand-in for both motors pushing together.
            let thrust = cfg.thrust(input.throttle) * 2.0;
            return Some(DriveOutput {
                mode: DriveMode::SinglePoint,
                force: forward * thrust,
                point: center_of_mass,
                yaw_torque: Vec3::ZERO,
                left_thrust: thrust * 0.5,
                right_thrust: thrust * 0.5,
            });
        };

        let (left_cmd, right_cmd) = mix(input.throttle, input.steer, cfg.turn_mix);
        let left_thrust = cfg.thrust(left_cmd);
        let right_thrust = cfg.thrust(right_cmd);

        let mid = (left_point + right_point) * 0.5;
        let (l_flat, r_flat) = (
            Vec3::new(left_point.x, mid.y, left_point.z),
            Vec3::new(right_point.x, mid.y, right_point.z),
        );
        let half_track = 0.5 * l_flat.distance(r_flat);

        Some(DriveOutput {
            mode: DriveMode::Differential,
            force: forward * (left_thrust + right_thrust),
            point: mid,
            yaw_torque: WORLD_UP * ((right_thrust - left_thrust) * half_track),
            left_thrust,
            right_thrust,
        })
    }

    /// Compute and apply propulsion to `body`.
    pub fn apply(&self, body: &mut dyn RigidBodyForces, input: DriveInput) -> Option<DriveOutput> {
        let out = self.compute(&body.pose(), body.center_of_mass(), input)?;
        match out.mode {
            DriveMode::Differential => {
                body.apply_force_at_point(out.force, out.point, ForceMode::Force);
                body.apply_torque(out.yaw_torque, ForceMode::Force);
            }
            DriveMode::SinglePoint => body.apply_force(out.force, ForceMode::Force),
        }
        Some(out)
    }
}
