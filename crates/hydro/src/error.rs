//! Construction-time validation errors.
//!
//! The per-step force model never fails; these only surface when geometry or
//! configuration is built or loaded.

use thiserror::Error;

/// Hull geometry rejected at load time.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("triangle index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    #[error("triangle index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("vertex {0} has a non-finite coordinate")]
    NonFiniteVertex(usize),
}

/// A configuration value outside its accepted range.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("vertex stride must be at least 1")]
    ZeroVertexStride,
    #[error("turn mix {0} outside [0, 1.5]")]
    TurnMixOutOfRange(f32),
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{0} is not a finite number")]
    NonFinite(&'static str),
}

impl ConfigError {
    /// Check that `value` is finite and `>= 0`.
    pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if !value.is_finite() {
            return Err(ConfigError::NonFinite(name));
        }
        if value < 0.0 {
            return Err(ConfigError::Negative { name, value });
        }
        Ok(())
    }

    /// Check that `value` is finite.
    pub(crate) fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::NonFinite(name))
        }
    }
}
