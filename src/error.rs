//! Error types for cloth construction and configuration.

use core::fmt;

/// Errors reported when a cloth cannot be built or addressed.
///
/// Per-step numerical trouble (coincident particles, degenerate shapes) is
/// absorbed by the solver and never surfaces here.
#[derive(Debug, Clone, PartialEq)]
pub enum ClothError {
    /// Grid must have at least two particles along each axis.
    InvalidGridDimensions { width: usize, height: usize },
    /// Density must be at least two particles along the shorter edge.
    InvalidDensity(usize),
    /// Two corners coincide or a corner is not finite.
    DegenerateCorners,
    /// Mass must be positive and finite.
    InvalidMass,
    /// Grid coordinate is outside the cloth.
    ParticleOutOfBounds { col: usize, row: usize, width: usize, height: usize },
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::InvalidGridDimensions { width, height } => {
                write!(f, "grid must be at least 2x2 (got {}x{})", width, height)
            }
            ClothError::InvalidDensity(d) => {
                write!(f, "density must be at least 2 (got {})", d)
            }
            ClothError::DegenerateCorners => write!(f, "cloth corners span a zero-length edge"),
            ClothError::InvalidMass => write!(f, "mass must be positive and finite"),
            ClothError::ParticleOutOfBounds { col, row, width, height } => {
                write!(f, "particle ({}, {}) out of bounds (grid: {}x{})", col, row, width, height)
            }
        }
    }
}
