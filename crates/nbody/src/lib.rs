//! Particle snapshots and the physics computed from them
//!
//! - [`particle`] and [`frame`] hold the per-step particle records
//! - [`diagnostics`] computes energies and mass-distribution measures
//! - [`oscillator`] gives the closed-form damped oscillator used as a reference

pub mod diagnostics;
pub mod frame;
pub mod oscillator;
pub mod particle;


pub use diagnostics::{DiagnosticsError, EnergySample};
pub use frame::{Frame, MomentumSample};
pub use oscillator::{DampedOscillator, OscillatorParams, OscillatorSolution, Regime};
pub use particle::ParticleState;
