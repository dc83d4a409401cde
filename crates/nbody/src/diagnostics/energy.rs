//! Kinetic and softened gravitational potential energy

use serde::{Deserialize, Serialize};

use crate::diagnostics::G;
use crate::particle::{PARTICLE_MASS, ParticleState};

/// Total kinetic energy, Σ |v|² / 2 with unit masses
///
/// # Examples
///
/// ```
/// use nbody::diagnostics::kinetic;
/// use nbody::particle::ParticleState;
///
/// let particles = [ParticleState::new([0.0; 3], [3.0, 4.0, 0.0])];
/// assert_eq!(kinetic(&particles), 12.5);
/// ```
pub fn kinetic(particles: &[ParticleState]) -> f64 {
    particles.iter().map(|p| p.kinetic_energy()).sum()
}

/// Softened pairwise gravitational potential energy
///
/// Sums `-G m² / sqrt(|rᵢ - rⱼ|² + h²)` over unordered pairs, so each pair
/// contributes exactly once. The softening length `h` keeps the sum finite
/// when two particles coincide.
///
/// # Arguments
///
/// * `particles` - Particles of one frame
/// * `softening` - Softening length `h`, in simulation length units
///
/// # Examples
///
/// ```
/// use nbody::diagnostics::potential;
/// use nbody::particle::ParticleState;
///
/// let particles = [
///     ParticleState::at_rest([1.0, 0.0, 0.0]),
///     ParticleState::at_rest([-1.0, 0.0, 0.0]),
/// ];
/// let u = potential(&particles, 0.05);
/// assert!((u + 1.0 / (4.0_f64 + 0.0025).sqrt()).abs() < 1e-15);
/// ```
pub fn potential(particles: &[ParticleState], softening: f64) -> f64 {
    let h2 = softening * softening;

    particles
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            particles[i + 1..].iter().map(move |b| {
                let r = (a.separation_squared(b) + h2).sqrt();
                -G * PARTICLE_MASS * PARTICLE_MASS / r
            })
        })
        .sum()
}

/// Kinetic, potential and total energy of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergySample {
    pub kinetic: f64,
    pub potential: f64,
    pub total: f64,
}

impl EnergySample {
    /// Computes all three energies for a particle list
    pub fn of(particles: &[ParticleState], softening: f64) -> Self {
        let kinetic = kinetic(particles);
        let potential = potential(particles, softening);

        Self {
            kinetic,
            potential,
            total: kinetic + potential,
        }
    }
}
