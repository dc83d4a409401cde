//! Post-run analysis of streamed simulator snapshots
//!
//! Combines a [`snapshots`] frame stream with the [`nbody`] diagnostics:
//!
//! - [`driver`] runs the energy, half-mass radius and oscillator modes
//! - [`summary`] derives scalars (threshold crossing, MSE, energy drift)
//! - [`series`] holds the per-frame results
//! - [`config`] maps frame indices to simulated time

pub mod config;
pub mod driver;
pub mod error;
pub mod series;
pub mod summary;


pub use config::{AnalysisConfig, Axis};
pub use driver::{
    ComparisonDriver, EnergyReport, HalfMassReport, OscillatorReport, StreamOutcome,
    TruncationInfo,
};
pub use error::AnalysisError;
pub use series::TimeSeries;
pub use summary::{ThresholdCrossing, mean_squared_error, threshold_crossing};
