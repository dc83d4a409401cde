use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Mass assigned to every particle. Snapshots do not carry masses.
pub const PARTICLE_MASS: f64 = 1.0;

/// Number of numeric fields describing one particle in a step file
pub const FIELDS_PER_PARTICLE: usize = 6;

/// Position and velocity of a single particle at one saved step
///
/// Values are immutable once parsed. Mass is implicit and always
/// [`PARTICLE_MASS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleState {
    pub position: Point3<f64>,
    pub velocity: Vector3<f64>,
}

impl ParticleState {
    /// Creates a particle from position and velocity components
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::particle::ParticleState;
    ///
    /// let p = ParticleState::new([1.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    /// assert_eq!(p.position.x, 1.0);
    /// assert_eq!(p.velocity.y, 2.0);
    /// ```
    pub fn new(position: [f64; 3], velocity: [f64; 3]) -> Self {
        Self {
            position: Point3::from(position),
            velocity: Vector3::from(velocity),
        }
    }

    /// Creates a particle at rest
    pub fn at_rest(position: [f64; 3]) -> Self {
        Self::new(position, [0.0; 3])
    }

    /// Builds a particle from the six fields of a step-file record,
    /// in `x y z vx vy vz` order.
    pub fn from_fields(fields: [f64; FIELDS_PER_PARTICLE]) -> Self {
        let [x, y, z, vx, vy, vz] = fields;
        Self::new([x, y, z], [vx, vy, vz])
    }

    pub fn speed_squared(&self) -> f64 {
        self.velocity.norm_squared()
    }

    /// Kinetic energy with unit mass: |v|² / 2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * PARTICLE_MASS * self.speed_squared()
    }

    pub fn momentum(&self) -> Vector3<f64> {
        self.velocity.scale(PARTICLE_MASS)
    }

    /// Squared separation from another particle, without the square root
    pub fn separation_squared(&self, other: &ParticleState) -> f64 {
        (self.position - other.position).norm_squared()
    }

    /// Distance from an arbitrary point (e.g. the center of mass)
    pub fn distance_from(&self, point: &Point3<f64>) -> f64 {
        (self.position - *point).norm()
    }
}
