//! Scalar summaries derived from per-frame series

use serde::{Deserialize, Serialize};

use crate::series::TimeSeries;

/// Frames skipped before measuring energy drift, to let initial transients settle
pub const DEFAULT_TRANSIENT_FRAMES: usize = 50;

/// Result of scanning a series for the first value at or below a threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdCrossing {
    /// `frame` is the first frame at or below the threshold; `step` is the
    /// integrator step of the frame before it, `(frame - 1) · save_interval`
    Crossed { frame: usize, step: u64 },
    /// The first observed frame is already at or below the threshold
    InitiallyBelow,
    /// No frame reached the threshold
    NotReached,
}

impl ThresholdCrossing {
    /// Integrator step of the crossing, if there is one
    pub fn step(&self) -> Option<u64> {
        match self {
            Self::Crossed { step, .. } => Some(*step),
            Self::InitiallyBelow | Self::NotReached => None,
        }
    }

    /// Simulated time of the crossing (`t*`), `step · dt`
    pub fn time(&self, dt: f64) -> Option<f64> {
        self.step().map(|step| step as f64 * dt)
    }
}

/// Finds where a series first drops to or below `threshold`
///
/// Position in `values` is taken as the frame index.
///
/// # Examples
///
/// ```
/// use analysis::summary::{ThresholdCrossing, threshold_crossing};
///
/// let crossing = threshold_crossing(&[5.0, 3.0, 2.0, 0.5, 0.4], 1.0, 10);
/// assert_eq!(crossing, ThresholdCrossing::Crossed { frame: 3, step: 20 });
/// ```
pub fn threshold_crossing(values: &[f64], threshold: f64, save_interval: u64) -> ThresholdCrossing {
    scan_crossing(values.iter().copied().enumerate(), threshold, save_interval)
}

/// [`threshold_crossing`] over a series, using its frame indices
pub fn series_threshold_crossing(
    series: &TimeSeries<f64>,
    threshold: f64,
    save_interval: u64,
) -> ThresholdCrossing {
    scan_crossing(
        series.iter().map(|(i, v)| (i, *v)),
        threshold,
        save_interval,
    )
}

fn scan_crossing(
    mut entries: impl Iterator<Item = (usize, f64)>,
    threshold: f64,
    save_interval: u64,
) -> ThresholdCrossing {
    let Some((_, first)) = entries.next() else {
        return ThresholdCrossing::NotReached;
    };
    if first <= threshold {
        return ThresholdCrossing::InitiallyBelow;
    }

    entries
        .find(|&(_, value)| value <= threshold)
        .map_or(ThresholdCrossing::NotReached, |(frame, _)| {
            ThresholdCrossing::Crossed {
                frame,
                step: (frame as u64 - 1) * save_interval,
            }
        })
}

/// Mean squared difference between two curves, skipping the first sample
///
/// Both curves start from the same initial condition, so sample 0 carries
/// no information about divergence. Extra samples in the longer slice are
/// ignored. Returns `None` with fewer than two paired samples.
///
/// # Examples
///
/// ```
/// use analysis::summary::mean_squared_error;
///
/// let mse = mean_squared_error(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0]).unwrap();
/// assert_eq!(mse, (1.0 + 4.0) / 2.0);
/// ```
pub fn mean_squared_error(simulated: &[f64], analytical: &[f64]) -> Option<f64> {
    mean_squared_error_skipping(simulated, analytical, 1)
}

/// Mean squared difference after dropping the first `skip` paired samples
///
/// Returns `None` when no pair remains.
pub fn mean_squared_error_skipping(
    simulated: &[f64],
    analytical: &[f64],
    skip: usize,
) -> Option<f64> {
    let (sum, n) = simulated
        .iter()
        .zip(analytical)
        .skip(skip)
        .fold((0.0, 0usize), |(sum, n), (s, a)| {
            let diff = s - a;
            (sum + diff * diff, n + 1)
        });

    (n > 0).then(|| sum / n as f64)
}

/// Relative total-energy error `|E - E₀| / |E₀|` per frame
///
/// The first `skip` frames are dropped and `E₀` is the first remaining
/// value. Returns an empty vector when nothing remains.
pub fn relative_energy_drift(totals: &[f64], skip: usize) -> Vec<f64> {
    let Some((&reference, _)) = totals.get(skip..).and_then(|rest| rest.split_first()) else {
        return Vec::new();
    };

    totals[skip..]
        .iter()
        .map(|e| (e - reference).abs() / reference.abs())
        .collect()
}

/// Mean of [`relative_energy_drift`], `None` when no frame remains
pub fn mean_relative_energy_drift(totals: &[f64], skip: usize) -> Option<f64> {
    let drift = relative_energy_drift(totals, skip);
    (!drift.is_empty()).then(|| drift.iter().sum::<f64>() / drift.len() as f64)
}
