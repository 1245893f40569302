//! Core engine types and utilities for the boat simulator.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform and local/world space conversion
//! - Fixed-step time management
//! - The rigid-body force contract implemented by the physics backend

pub mod body;
pub mod time;
pub mod transform;

pub use body::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec3};
pub use hecs::{Entity, World};

/// World up axis. The water surface is measured along this axis.
pub const WORLD_UP: Vec3 = Vec3::Y;
