//! Errors raised when a field is built or resized with invalid input.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldError {
    /// A field needs at least one particle.
    EmptyField,
    /// Bounds must be finite and strictly positive on both axes.
    DegenerateBounds { width: f32, height: f32 },
    /// A spawn range parameter is non-finite, negative or out of order.
    InvalidSpawnRange { name: &'static str, value: f32 },
    /// An explicit particle has non-finite state or a non-positive radius.
    InvalidParticle { index: usize },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::EmptyField => write!(f, "Particle field must contain at least one particle"),
            FieldError::DegenerateBounds { width, height } => {
                write!(f, "Degenerate field bounds: {}x{}", width, height)
            }
            FieldError::InvalidSpawnRange { name, value } => {
                write!(f, "Invalid spawn range: {} = {}", name, value)
            }
            FieldError::InvalidParticle { index } => {
                write!(f, "Particle {} has non-finite state or a non-positive radius", index)
            }
        }
    }
}

impl std::error::Error for FieldError {}
