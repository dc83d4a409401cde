//! End-to-end runs over step directories on disk

use std::fs;
use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use nbody::oscillator::DampedOscillator;
use nbody::particle::ParticleState;
use snapshots::setup::SETUP_FILE_NAME;
use snapshots::source::format_frame;
use snapshots::{FrameSource, FrameStream, RunSetup, StepDirectory, StreamConfig};

use analysis::{AnalysisConfig, ComparisonDriver, ThresholdCrossing};

fn write_step(steps: &Path, index: usize, text: &str) {
    fs::write(steps.join(format!("{}.txt", index)), text).unwrap();
}

/// Writes `setup.txt` and `steps/` under `root`, one file per frame
fn write_run(root: &Path, setup: &str, frames: &[String]) -> StepDirectory {
    fs::write(root.join(SETUP_FILE_NAME), setup).unwrap();
    let steps = root.join("steps");
    fs::create_dir(&steps).unwrap();
    for (i, text) in frames.iter().enumerate() {
        write_step(&steps, i, text);
    }
    StepDirectory::open(&steps).unwrap()
}

fn static_pair() -> String {
    format_frame(&[
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([-1.0, 0.0, 0.0]),
    ])
}

fn driver_for(dir: StepDirectory, config: AnalysisConfig) -> ComparisonDriver {
    let stream = FrameStream::new(Arc::new(dir))
        .with_config(StreamConfig::default().with_read_ahead(4));
    ComparisonDriver::new(stream, config)
}

#[test]
fn test_static_pair_run_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let frames = vec![static_pair(); 50];
    let dir = write_run(tmp.path(), "1000 0.01 verlet\n", &frames);
    assert_eq!(dir.count(), 50);

    let setup = RunSetup::load(tmp.path().join(SETUP_FILE_NAME)).unwrap();
    assert_eq!(setup.total_steps, 1000);
    assert_eq!(setup.integrator, "verlet");

    let config = AnalysisConfig::from_setup(&setup, 10).with_softening(0.05);
    let driver = driver_for(dir, config);

    let energy = driver.energy_series().unwrap();
    assert_eq!(energy.series.len(), 50);
    assert!(energy.outcome.is_complete());
    for (_, sample) in energy.series.iter() {
        assert_eq!(sample.kinetic, 0.0);
        assert_relative_eq!(sample.potential, -1.0 / 4.0025_f64.sqrt(), epsilon = 1e-12);
    }

    let radius = driver.half_mass_radius_series().unwrap();
    assert!(radius.series.values().iter().all(|&r| (r - 1.0).abs() < 1e-12));
    // Radius equals the threshold from frame 0 on
    assert_eq!(radius.crossing, ThresholdCrossing::InitiallyBelow);
    assert_relative_eq!(radius.outcome.last_time.unwrap(), 4.9, epsilon = 1e-9);
}

#[test]
fn test_nan_frame_truncates_run() {
    let tmp = tempfile::tempdir().unwrap();
    let mut frames = vec![static_pair(); 10];
    frames[7] = "nan 0 0 0 0 0\n-1 0 0 0 0 0\n".to_string();
    let dir = write_run(tmp.path(), "100 0.01 verlet\n", &frames);

    let setup = RunSetup::load(tmp.path().join(SETUP_FILE_NAME)).unwrap();
    let driver = driver_for(dir, AnalysisConfig::from_setup(&setup, 10));

    let report = driver.energy_series().unwrap();
    assert_eq!(report.series.len(), 7);
    assert_eq!(report.outcome.expected_frames, 10);

    let truncation = report.outcome.truncation.as_ref().unwrap();
    assert_eq!(truncation.index, 7);
    assert!(truncation.malformed);
    assert_relative_eq!(report.outcome.diverged_at().unwrap(), 0.6, epsilon = 1e-12);
}

#[test]
fn test_collapse_time_from_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let frames: Vec<String> = [5.0, 3.0, 2.0, 0.5, 0.4]
        .iter()
        .map(|&r| {
            format_frame(&[
                ParticleState::at_rest([0.0, r, 0.0]),
                ParticleState::at_rest([0.0, -r, 0.0]),
                ParticleState::at_rest([0.0, 0.0, r]),
                ParticleState::at_rest([0.0, 0.0, -r]),
            ])
        })
        .collect();
    let dir = write_run(tmp.path(), "50 0.01 verlet\n", &frames);

    let setup = RunSetup::load(tmp.path().join(SETUP_FILE_NAME)).unwrap();
    let report = driver_for(dir, AnalysisConfig::from_setup(&setup, 10))
        .half_mass_radius_series()
        .unwrap();

    assert_eq!(report.crossing, ThresholdCrossing::Crossed { frame: 3, step: 20 });
    assert_relative_eq!(report.collapse_time(setup.dt).unwrap(), 0.2, epsilon = 1e-12);
}

#[test]
fn test_oscillator_run_against_analytic_solution() {
    let tmp = tempfile::tempdir().unwrap();
    let oscillator = DampedOscillator::new(1e4, 100.0, 70.0).unwrap();
    let solution = oscillator.solve(1.0, 0.0);

    // Saved every 10 steps of dt = 0.001
    let frames: Vec<String> = (0..100)
        .map(|i| {
            let (x, v) = solution.state(i as f64 * 0.01);
            format_frame(&[ParticleState::new([x, 0.0, 0.0], [v, 0.0, 0.0])])
        })
        .collect();
    let dir = write_run(tmp.path(), "1000 0.001 verlet\n", &frames);

    let setup = RunSetup::load(tmp.path().join(SETUP_FILE_NAME)).unwrap();
    let report = driver_for(dir, AnalysisConfig::from_setup(&setup, 10))
        .oscillator_comparison(&solution)
        .unwrap();

    assert_eq!(report.simulated.len(), 100);
    assert!(report.outcome.is_complete());
    assert!(report.mse.unwrap() < 1e-20);

    // Underdamped: the tracked particle swings through zero
    assert!(report.simulated.values().iter().any(|&x| x < 0.0));
}

#[test]
fn test_gap_in_step_files_ends_stream() {
    let tmp = tempfile::tempdir().unwrap();
    let steps = tmp.path().join("steps");
    fs::create_dir(&steps).unwrap();
    for i in [0, 1, 2, 4] {
        write_step(&steps, i, &static_pair());
    }

    let dir = StepDirectory::open(&steps).unwrap();
    assert_eq!(dir.count(), 4);

    let report = driver_for(dir, AnalysisConfig::default())
        .energy_series()
        .unwrap();

    assert_eq!(report.series.len(), 3);
    assert!(!report.outcome.truncation.as_ref().unwrap().malformed);
    assert_eq!(report.outcome.diverged_at(), None);
}
