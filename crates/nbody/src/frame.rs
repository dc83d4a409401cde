use crate::particle::ParticleState;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One saved simulation snapshot
///
/// Particle order is the order of the records in the step file and is
/// stable across frames of a run, so `particles[i]` refers to the same
/// body in every frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Zero-based index of the saved step
    pub index: usize,
    /// Particles in file order
    pub particles: Vec<ParticleState>,
}

impl Frame {
    /// Creates a frame from an index and its particles
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::frame::Frame;
    /// use nbody::particle::ParticleState;
    ///
    /// let frame = Frame::new(3, vec![ParticleState::at_rest([1.0, 0.0, 0.0])]);
    /// assert_eq!(frame.index, 3);
    /// assert_eq!(frame.particle_count(), 1);
    /// ```
    pub fn new(index: usize, particles: Vec<ParticleState>) -> Self {
        Self { index, particles }
    }

    /// Returns the number of particles in the frame
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Gets a particle by its position in the file
    pub fn particle(&self, idx: usize) -> Option<&ParticleState> {
        self.particles.get(idx)
    }

    /// Returns the total momentum of all particles
    ///
    /// This should stay near zero for an isolated system
    /// (useful for checking numerical drift)
    pub fn total_momentum(&self) -> Vector3<f64> {
        self.particles
            .iter()
            .map(|p| p.momentum())
            .fold(Vector3::zeros(), |acc, p| acc + p)
    }

    /// Returns the total angular momentum about the origin
    pub fn total_angular_momentum(&self) -> Vector3<f64> {
        self.particles
            .iter()
            .map(|p| p.position.coords.cross(&p.momentum()))
            .fold(Vector3::zeros(), |acc, l| acc + l)
    }

    /// Linear and angular momentum of the frame
    pub fn momentum_sample(&self) -> MomentumSample {
        MomentumSample {
            linear: self.total_momentum(),
            angular: self.total_angular_momentum(),
        }
    }
}

/// Conserved momenta of one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentumSample {
    pub linear: Vector3<f64>,
    /// About the origin
    pub angular: Vector3<f64>,
}
