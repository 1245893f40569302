//! Rapier3D world and the rigid-body adapter used by the hull force model.

pub mod body;
pub mod hull_body;
pub mod physics_world;

pub use body::*;
pub use hull_body::*;
pub use physics_world::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
