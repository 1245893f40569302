//! Hydrodynamic force model for floating hulls.
//!
//! Each fixed step the [`BoatController`] samples the water height under the hull,
//! turns submersion into lift and drag, adds differential-drive thrust and an upright
//! torque, and hands the net load to the rigid body once.

pub mod accumulator;
pub mod buoyancy;
pub mod controller;
pub mod damping;
pub mod drag;
pub mod drive;
pub mod error;
pub mod floater;
pub mod hull;
pub mod observer;
pub mod samples;
pub mod stabilizer;
pub mod water;

#[cfg(test)]
mod testing;

pub use accumulator::*;
pub use buoyancy::*;
pub use controller::*;
pub use damping::*;
pub use drag::*;
pub use drive::*;
pub use error::*;
pub use floater::*;
pub use hull::*;
pub use observer::*;
pub use samples::*;
pub use stabilizer::*;
pub use water::*;
