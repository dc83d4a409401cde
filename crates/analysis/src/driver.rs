//! Drives a frame stream through the diagnostics.
//!
//! Each mode consumes one fresh pass over the stream, computes a value per
//! frame into a [`TimeSeries`] and derives a summary from it:
//!
//! 1. **Energy** - kinetic, potential and total energy plus momentum per frame
//! 2. **Half-mass radius** - radius per frame plus the collapse crossing
//! 3. **Oscillator** - one particle's position and velocity against the analytic solution
//!
//! A stream cut short by a malformed frame is not an error: the report covers
//! the frames before it and records where it stopped. Frames whose particle
//! count differs from the first frame, and diagnostics that are undefined for
//! a frame, abort the pass with an [`AnalysisError`].

use log::info;
use nalgebra::Vector3;
use nbody::diagnostics::{self, EnergySample};
use nbody::frame::{Frame, MomentumSample};
use nbody::oscillator::OscillatorSolution;
use serde::Serialize;
use snapshots::stream::{FrameStream, Frames};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::series::TimeSeries;
use crate::summary::{
    ThresholdCrossing, mean_relative_energy_drift, mean_squared_error_skipping,
    relative_energy_drift, series_threshold_crossing,
};

/// How far a pass over the stream got
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamOutcome {
    /// Frames in the stream's range
    pub expected_frames: usize,
    /// Frames actually consumed
    pub frames_consumed: usize,
    /// Where the stream stopped early, if it did
    pub truncation: Option<TruncationInfo>,
    /// Simulated time of the last consumed frame
    pub last_time: Option<f64>,
}

/// Serializable summary of a [`Truncation`](snapshots::stream::Truncation)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruncationInfo {
    pub index: usize,
    /// True when the frame was rejected for its content (numerical divergence)
    pub malformed: bool,
    pub reason: String,
}

impl StreamOutcome {
    fn from_frames(frames: &Frames, last_time: Option<f64>) -> Self {
        Self {
            expected_frames: frames.expected(),
            frames_consumed: frames.delivered(),
            truncation: frames.truncation().map(|t| TruncationInfo {
                index: t.index,
                malformed: t.cause.is_malformed(),
                reason: t.cause.to_string(),
            }),
            last_time,
        }
    }

    /// Every frame in the range was consumed
    pub fn is_complete(&self) -> bool {
        self.truncation.is_none() && self.frames_consumed == self.expected_frames
    }

    /// Time of the last well-formed frame when the run diverged
    pub fn diverged_at(&self) -> Option<f64> {
        self.truncation
            .as_ref()
            .filter(|t| t.malformed)
            .and(self.last_time)
    }
}

/// Energy and momentum per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyReport {
    pub series: TimeSeries<EnergySample>,
    /// Linear and angular momentum, conserved by an isolated system
    pub momentum: TimeSeries<MomentumSample>,
    pub outcome: StreamOutcome,
}

impl EnergyReport {
    pub fn totals(&self) -> Vec<f64> {
        self.series.values().iter().map(|e| e.total).collect()
    }

    /// `|E - E₀| / |E₀|` per frame after skipping `skip` transient frames
    pub fn relative_drift(&self, skip: usize) -> Vec<f64> {
        relative_energy_drift(&self.totals(), skip)
    }

    pub fn mean_relative_drift(&self, skip: usize) -> Option<f64> {
        mean_relative_energy_drift(&self.totals(), skip)
    }

    /// Largest `‖P - P₀‖` over the run, `None` for an empty report
    pub fn max_momentum_drift(&self) -> Option<f64> {
        self.max_drift_from_first(|m| m.linear)
    }

    /// Largest `‖L - L₀‖` over the run, `None` for an empty report
    pub fn max_angular_momentum_drift(&self) -> Option<f64> {
        self.max_drift_from_first(|m| m.angular)
    }

    fn max_drift_from_first(
        &self,
        component: impl Fn(&MomentumSample) -> Vector3<f64>,
    ) -> Option<f64> {
        let (_, first) = self.momentum.first()?;
        let reference = component(first);

        Some(
            self.momentum
                .values()
                .iter()
                .map(|m| (component(m) - reference).norm())
                .fold(0.0, f64::max),
        )
    }
}

/// Half-mass radius per frame and its collapse crossing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfMassReport {
    pub series: TimeSeries<f64>,
    pub crossing: ThresholdCrossing,
    pub outcome: StreamOutcome,
}

impl HalfMassReport {
    /// Collapse time `t*` for integrator step size `dt`
    pub fn collapse_time(&self, dt: f64) -> Option<f64> {
        self.crossing.time(dt)
    }

    /// Radii from frame `index` onwards
    pub fn stationary(&self, index: usize) -> &[f64] {
        self.series.since(index)
    }
}

/// Tracked particle against the analytic oscillator
///
/// The error means skip frame 0, where both curves start from the same
/// initial condition. A stream starting later keeps all of its samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OscillatorReport {
    /// Simulated time of each sample
    pub times: Vec<f64>,
    /// Tracked position component per frame
    pub simulated: TimeSeries<f64>,
    /// Analytic position at the same times
    pub analytical: Vec<f64>,
    /// Mean squared position error
    pub mse: Option<f64>,
    /// Tracked velocity component per frame
    pub simulated_velocity: TimeSeries<f64>,
    /// Analytic velocity at the same times
    pub analytical_velocity: Vec<f64>,
    /// Mean squared velocity error
    pub velocity_mse: Option<f64>,
    pub outcome: StreamOutcome,
}

/// Runs the comparison modes over a frame stream
pub struct ComparisonDriver {
    stream: FrameStream,
    config: AnalysisConfig,
}

impl ComparisonDriver {
    pub fn new(stream: FrameStream, config: AnalysisConfig) -> Self {
        Self { stream, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Kinetic, softened potential and total energy of every frame, with
    /// its linear and angular momentum
    ///
    /// Drift in any of them is reported, not treated as an error.
    pub fn energy_series(&self) -> Result<EnergyReport, AnalysisError> {
        let softening = self.config.softening;
        let (samples, outcome) = self.drive(|frame| {
            Ok((
                EnergySample::of(&frame.particles, softening),
                frame.momentum_sample(),
            ))
        })?;
        let series = samples.map(|(energy, _)| *energy);
        let momentum = samples.map(|(_, momentum)| *momentum);

        info!(
            "energy series: {} of {} frames",
            outcome.frames_consumed, outcome.expected_frames
        );

        Ok(EnergyReport {
            series,
            momentum,
            outcome,
        })
    }

    /// Half-mass radius of every frame and the first collapse below the threshold
    pub fn half_mass_radius_series(&self) -> Result<HalfMassReport, AnalysisError> {
        let (series, outcome) = self.drive(|frame| {
            diagnostics::half_mass_radius(&frame.particles).map_err(|source| {
                AnalysisError::Diagnostics {
                    index: frame.index,
                    source,
                }
            })
        })?;

        let crossing = series_threshold_crossing(
            &series,
            self.config.collapse_threshold,
            self.config.save_interval,
        );

        info!(
            "half-mass radius series: {} of {} frames, crossing {:?}",
            outcome.frames_consumed, outcome.expected_frames, crossing
        );

        Ok(HalfMassReport {
            series,
            crossing,
            outcome,
        })
    }

    /// Tracked particle position and velocity compared with `solution` on the
    /// frame time grid
    pub fn oscillator_comparison(
        &self,
        solution: &OscillatorSolution,
    ) -> Result<OscillatorReport, AnalysisError> {
        let tracked = self.config.tracked_particle;
        let axis = self.config.axis;

        let (states, outcome) = self.drive(|frame| {
            frame
                .particle(tracked)
                .map(|p| (axis.position(p), axis.velocity(p)))
                .ok_or(AnalysisError::TrackedParticleOutOfRange {
                    index: frame.index,
                    tracked,
                    count: frame.particle_count(),
                })
        })?;
        let simulated = states.map(|(x, _)| *x);
        let simulated_velocity = states.map(|(_, v)| *v);

        let times: Vec<f64> = states
            .indices()
            .iter()
            .map(|&i| self.config.time_of(i))
            .collect();
        let analytical = solution.positions(&times);
        let analytical_velocity: Vec<f64> =
            times.iter().map(|&t| solution.velocity(t)).collect();

        let skip = usize::from(states.indices().first() == Some(&0));
        let mse = mean_squared_error_skipping(simulated.values(), &analytical, skip);
        let velocity_mse =
            mean_squared_error_skipping(simulated_velocity.values(), &analytical_velocity, skip);

        info!(
            "oscillator comparison: {} of {} frames, mse {:?}",
            outcome.frames_consumed, outcome.expected_frames, mse
        );

        Ok(OscillatorReport {
            times,
            simulated,
            analytical,
            mse,
            simulated_velocity,
            analytical_velocity,
            velocity_mse,
            outcome,
        })
    }

    /// One pass over the stream, checking the particle count of every frame
    fn drive<T>(
        &self,
        mut measure: impl FnMut(&Frame) -> Result<T, AnalysisError>,
    ) -> Result<(TimeSeries<T>, StreamOutcome), AnalysisError> {
        let mut frames = self.stream.stream();
        let mut series = TimeSeries::with_capacity(self.stream.len());
        let mut expected_count = None;

        for frame in frames.by_ref() {
            let expected = *expected_count.get_or_insert(frame.particle_count());
            if frame.particle_count() != expected {
                return Err(AnalysisError::ParticleCountMismatch {
                    index: frame.index,
                    expected,
                    found: frame.particle_count(),
                });
            }

            let value = measure(&frame)?;
            series.push(frame.index, value);
        }

        let last_time = series.last().map(|(i, _)| self.config.time_of(i));
        let outcome = StreamOutcome::from_frames(&frames, last_time);

        Ok((series, outcome))
    }
}
