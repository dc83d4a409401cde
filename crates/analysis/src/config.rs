use nbody::particle::ParticleState;
use serde::{Deserialize, Serialize};
use snapshots::RunSetup;

/// Integrator steps between saved frames used by the simulator
pub const DEFAULT_SAVE_INTERVAL: u64 = 10;

/// Softening length used for the galaxy potential
pub const DEFAULT_SOFTENING: f64 = 0.05;

/// Half-mass radius below which a cluster counts as collapsed
pub const DEFAULT_COLLAPSE_THRESHOLD: f64 = 1.0;

/// Cartesian component of a particle's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    X,
    Y,
    Z,
}

impl Axis {
    pub fn position(&self, particle: &ParticleState) -> f64 {
        match self {
            Axis::X => particle.position.x,
            Axis::Y => particle.position.y,
            Axis::Z => particle.position.z,
        }
    }

    pub fn velocity(&self, particle: &ParticleState) -> f64 {
        match self {
            Axis::X => particle.velocity.x,
            Axis::Y => particle.velocity.y,
            Axis::Z => particle.velocity.z,
        }
    }
}

/// Settings for a [`ComparisonDriver`](crate::driver::ComparisonDriver)
///
/// `save_interval` and `dt` come from the simulator run and map frame
/// indices to simulated time; the rest select what is measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Integrator steps between consecutive saved frames
    pub save_interval: u64,
    /// Integrator step size
    pub dt: f64,
    /// Softening length for the potential energy
    pub softening: f64,
    /// Threshold for the half-mass radius crossing scan
    pub collapse_threshold: f64,
    /// Index (file order) of the particle compared with the oscillator
    pub tracked_particle: usize,
    /// Position component compared with the oscillator
    pub axis: Axis,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            save_interval: DEFAULT_SAVE_INTERVAL,
            dt: 1.0,
            softening: DEFAULT_SOFTENING,
            collapse_threshold: DEFAULT_COLLAPSE_THRESHOLD,
            tracked_particle: 0,
            axis: Axis::X,
        }
    }
}

impl AnalysisConfig {
    /// Takes `dt` from the run setup; the save interval is not recorded there
    pub fn from_setup(setup: &RunSetup, save_interval: u64) -> Self {
        Self {
            save_interval,
            dt: setup.dt,
            ..Self::default()
        }
    }

    pub fn with_softening(mut self, softening: f64) -> Self {
        self.softening = softening;
        self
    }

    pub fn with_collapse_threshold(mut self, threshold: f64) -> Self {
        self.collapse_threshold = threshold;
        self
    }

    pub fn with_tracked_particle(mut self, index: usize) -> Self {
        self.tracked_particle = index;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    /// Integrator step at which frame `index` was saved
    pub fn step_of(&self, index: usize) -> u64 {
        index as u64 * self.save_interval
    }

    /// Simulated time of frame `index`, `index · save_interval · dt`
    ///
    /// # Examples
    ///
    /// ```
    /// use analysis::config::AnalysisConfig;
    ///
    /// let config = AnalysisConfig { save_interval: 10, dt: 0.01, ..Default::default() };
    /// assert!((config.time_of(5) - 0.5).abs() < 1e-12);
    /// ```
    pub fn time_of(&self, index: usize) -> f64 {
        self.step_of(index) as f64 * self.dt
    }
}
