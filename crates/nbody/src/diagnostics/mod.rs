//! Physical diagnostics over a frame's particles
//!
//! Every function here is pure, treats each particle as having unit mass,
//! and uses a unit gravitational constant. Functions that need at least one
//! particle return [`DiagnosticsError::EmptyInput`] instead of defaulting.

use thiserror::Error;

pub mod distribution;
pub mod energy;

#[cfg(test)]
mod distribution_test;
#[cfg(test)]
mod energy_test;

pub use distribution::{center_of_mass, half_mass_radius, radial_distances};
pub use energy::{EnergySample, kinetic, potential};

/// Gravitational constant in simulation units
pub const G: f64 = 1.0;

/// Errors raised by diagnostics that are undefined for some inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiagnosticsError {
    /// The diagnostic needs at least one particle
    #[error("{diagnostic} requires at least one particle")]
    EmptyInput { diagnostic: &'static str },
}
