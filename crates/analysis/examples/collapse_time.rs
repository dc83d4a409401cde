//! Analyzes a simulator run directory
//!
//! Expects `setup.txt` and a `steps/` directory under the run path. Prints
//! the energy drift, the half-mass radius collapse time and, when an
//! oscillator parameter file is given, the error against the analytic solution.
//!
//! Run with: cargo run --package analysis --example collapse_time -- <run-dir> [params.json]

use std::path::PathBuf;
use std::sync::Arc;
use std::{env, fs, process};

use env_logger::Env;
use log::error;
use nbody::oscillator::OscillatorParams;
use snapshots::setup::SETUP_FILE_NAME;
use snapshots::{FrameSource, FrameStream, RunSetup, StepDirectory};

use analysis::config::DEFAULT_SAVE_INTERVAL;
use analysis::summary::DEFAULT_TRANSIENT_FRAMES;
use analysis::{AnalysisConfig, ComparisonDriver};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let Some(run_dir) = args.next().map(PathBuf::from) else {
        eprintln!("usage: collapse_time <run-dir> [params.json]");
        process::exit(2);
    };
    let params_path = args.next().map(PathBuf::from);

    if let Err(err) = run(run_dir, params_path) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(run_dir: PathBuf, params_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let setup = RunSetup::load(run_dir.join(SETUP_FILE_NAME))?;
    let steps = Arc::new(StepDirectory::open(run_dir.join("steps"))?);

    println!(
        "Run: {} steps of dt = {} ({}), t = {}",
        setup.total_steps,
        setup.dt,
        setup.integrator,
        setup.duration()
    );
    println!("{}", "=".repeat(60));

    let config = AnalysisConfig::from_setup(&setup, DEFAULT_SAVE_INTERVAL);
    let driver = ComparisonDriver::new(FrameStream::new(steps.clone()), config);

    let energy = driver.energy_series()?;
    println!("\nEnergy ({} frames):", energy.series.len());
    if let Some((_, first)) = energy.series.first() {
        println!("  initial total: {:.6}", first.total);
    }
    if let Some(drift) = energy.max_momentum_drift() {
        println!("  max momentum drift: {:.3e}", drift);
    }
    match energy.mean_relative_drift(DEFAULT_TRANSIENT_FRAMES) {
        Some(drift) => println!("  mean relative drift: {:.3e}", drift),
        None => println!(
            "  too few frames for drift after {} transient frames",
            DEFAULT_TRANSIENT_FRAMES
        ),
    }
    if let Some(t) = energy.outcome.diverged_at() {
        println!("  diverged after t = {:.4}", t);
    }

    let radius = driver.half_mass_radius_series()?;
    println!("\nHalf-mass radius:");
    match radius.collapse_time(setup.dt) {
        Some(t) => println!("  collapse time t* = {:.4}", t),
        None => println!("  no collapse ({:?})", radius.crossing),
    }

    if let Some(path) = params_path {
        let params = OscillatorParams::from_json(&fs::read_to_string(path)?)?;
        let oscillator = params.oscillator()?;
        let initial = steps.read(0)?;
        let tracked = initial
            .particle(config.tracked_particle)
            .ok_or("run has no particles to track")?;

        let solution = oscillator.solve(
            config.axis.position(tracked),
            config.axis.velocity(tracked),
        );
        let report = driver.oscillator_comparison(&solution)?;

        println!(
            "\nOscillator ({:?}, ζ = {:.3}):",
            solution.regime(),
            oscillator.damping_ratio()
        );
        match report.mse {
            Some(mse) => println!("  mean squared error: {:.3e}", mse),
            None => println!("  too few frames to compare"),
        }
        if let Some(mse) = report.velocity_mse {
            println!("  velocity mean squared error: {:.3e}", mse);
        }
    }

    println!("\n{}", serde_json::to_string_pretty(&radius.outcome)?);
    Ok(())
}
