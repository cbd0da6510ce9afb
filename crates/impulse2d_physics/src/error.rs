//! Physics error types
//!
//! Errors are only produced while building shapes and bodies. Once a body
//! is in a world, stepping the simulation cannot fail.

use std::fmt;

/// Error type for shape and body construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsError {
    /// Circle radius is not a finite positive number
    InvalidRadius(f32),
    /// Box width or height is not a finite positive number
    InvalidSize { width: f32, height: f32 },
    /// Plane normal has zero length or non-finite components
    InvalidNormal,
    /// Mass is zero, negative or NaN
    InvalidMass(f32),
    /// Planes are infinite half-spaces and can only belong to static bodies
    PlaneRequiresInfiniteMass,
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::InvalidRadius(radius) => {
                write!(f, "Invalid circle radius: {} (must be finite and > 0)", radius)
            }
            PhysicsError::InvalidSize { width, height } => {
                write!(f, "Invalid box size: {}x{} (both must be finite and > 0)", width, height)
            }
            PhysicsError::InvalidNormal => write!(f, "Plane normal must be a finite, non-zero vector"),
            PhysicsError::InvalidMass(mass) => write!(f, "Invalid mass: {} (must be > 0)", mass),
            PhysicsError::PlaneRequiresInfiniteMass => {
                write!(f, "Plane shapes can only be attached to infinite-mass bodies")
            }
        }
    }
}

impl std::error::Error for PhysicsError {}
