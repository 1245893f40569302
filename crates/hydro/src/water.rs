//! Water height queries behind a single "height at point" contract.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// External water surface that projects a world point vertically onto the surface.
///
/// Implementations must always answer, even if approximately; there is no
/// "no water here" result.
pub trait WaterSurface {
    fn project_point(&self, point: Vec3) -> Vec3;
}

impl<F> WaterSurface for F
where
    F: Fn(Vec3) -> Vec3,
{
    fn project_point(&self, point: Vec3) -> Vec3 {
        self(point)
    }
}

/// Result of one height query. Recomputed every step, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaterSample {
    pub query_point: Vec3,
    pub surface_height: f32,
}

impl WaterSample {
    /// `surface_height - query_point.y`; positive when the point is under water.
    pub fn depth(&self) -> f32 {
        self.surface_height - self.query_point.y
    }

    pub fn is_submerged(&self) -> bool {
        self.depth() > 0.0
    }
}

/// Which strategy answers height queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterMode {
    /// Ask the external surface, falling back to the flat plane if none is attached.
    #[default]
    Surface,
    /// Always use the flat plane.
    Flat,
}

/// Water source settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterConfig {
    #[serde(default)]
    pub mode: WaterMode,
    /// Height of the flat plane.
    #[serde(default)]
    pub flat_level: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            mode: WaterMode::Surface,
            flat_level: 0.0,
        }
    }
}

/// Height oracle handed to the force model for one step.
#[derive(Clone, Copy)]
pub enum WaterOracle<'a> {
    Surface(&'a dyn WaterSurface),
    Flat(f32),
}

impl<'a> WaterOracle<'a> {
    /// Pick a strategy from configuration and an optional attached surface.
    pub fn select(config: &WaterConfig, surface: Option<&'a dyn WaterSurface>) -> Self {
        match (config.mode, surface) {
            (WaterMode::Surface, Some(surface)) => WaterOracle::Surface(surface),
            _ => WaterOracle::Flat(config.flat_level),
        }
    }

    /// Water surface height under `point`.
    pub fn height_at(&self, point: Vec3) -> f32 {
        match self {
            WaterOracle::Surface(surface) => surface.project_point(point).y,
            WaterOracle::Flat(level) => *level,
        }
    }

    pub fn sample(&self, point: Vec3) -> WaterSample {
        WaterSample {
            query_point: point,
            surface_height: self.height_at(point),
        }
    }
}

impl std::fmt::Debug for WaterOracle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WaterOracle::Surface(_) => f.write_str("WaterOracle::Surface"),
            WaterOracle::Flat(level) => write!(f, "WaterOracle::Flat({})", level),
        }
    }
}
