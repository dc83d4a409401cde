use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::diagnostics::energy::{EnergySample, kinetic, potential};
use crate::particle::ParticleState;

fn random_cloud(rng: &mut ChaChaRng, n: usize) -> Vec<ParticleState> {
    (0..n)
        .map(|_| {
            ParticleState::new(
                [
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                    rng.random_range(-5.0..5.0),
                ],
                [
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                    rng.random_range(-1.0..1.0),
                ],
            )
        })
        .collect()
}

#[test]
fn test_kinetic_empty_is_zero() {
    assert_eq!(kinetic(&[]), 0.0);
}

#[test]
fn test_kinetic_zero_iff_at_rest() {
    let at_rest = vec![
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([0.0, 2.0, 0.0]),
    ];
    assert_eq!(kinetic(&at_rest), 0.0);

    let mut moving = at_rest.clone();
    moving[1] = ParticleState::new([0.0, 2.0, 0.0], [0.0, 0.0, 1e-8]);
    assert!(kinetic(&moving) > 0.0);
}

#[test]
fn test_kinetic_non_negative_for_random_clouds() {
    let mut rng = ChaChaRng::seed_from_u64(42);

    for n in [1, 2, 10, 50] {
        let particles = random_cloud(&mut rng, n);
        assert!(kinetic(&particles) >= 0.0);
    }
}

#[test]
fn test_kinetic_sums_squared_speeds() {
    let particles = vec![
        ParticleState::new([0.0; 3], [1.0, 0.0, 0.0]),
        ParticleState::new([0.0; 3], [0.0, 2.0, 0.0]),
        ParticleState::new([0.0; 3], [0.0, 0.0, -3.0]),
    ];

    // (1 + 4 + 9) / 2
    assert_eq!(kinetic(&particles), 7.0);
}

#[test]
fn test_potential_symmetric_pair() {
    let particles = vec![
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([-1.0, 0.0, 0.0]),
    ];

    let u = potential(&particles, 0.05);
    assert_relative_eq!(u, -1.0 / (4.0_f64 + 0.0025).sqrt(), epsilon = 1e-15);
}

#[test]
fn test_potential_counts_each_pair_once() {
    // Equilateral triangle with unit sides and no softening: three pairs of -1
    let h = 3.0_f64.sqrt() / 2.0;
    let particles = vec![
        ParticleState::at_rest([0.0, 0.0, 0.0]),
        ParticleState::at_rest([1.0, 0.0, 0.0]),
        ParticleState::at_rest([0.5, h, 0.0]),
    ];

    assert_relative_eq!(potential(&particles, 0.0), -3.0, epsilon = 1e-12);
}

#[test]
fn test_potential_single_particle_is_zero() {
    let particles = vec![ParticleState::at_rest([1.0, 2.0, 3.0])];

    assert_eq!(potential(&particles, 0.05), 0.0);
}

#[test]
fn test_softening_keeps_coincident_particles_finite() {
    let particles = vec![
        ParticleState::at_rest([0.3, 0.3, 0.3]),
        ParticleState::at_rest([0.3, 0.3, 0.3]),
    ];

    let u = potential(&particles, 0.05);
    assert!(u.is_finite());
    assert_relative_eq!(u, -20.0, epsilon = 1e-12);
}

#[test]
fn test_potential_finite_and_negative_for_random_clouds() {
    let mut rng = ChaChaRng::seed_from_u64(7);

    for n in [2, 3, 25, 100] {
        let particles = random_cloud(&mut rng, n);
        let u = potential(&particles, 0.05);
        assert!(u.is_finite(), "potential not finite for n = {}", n);
        assert!(u < 0.0, "potential {} not negative for n = {}", u, n);
    }
}

#[test]
fn test_energy_sample_total() {
    let particles = vec![
        ParticleState::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ParticleState::new([-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]),
    ];

    let sample = EnergySample::of(&particles, 0.05);
    assert_eq!(sample.kinetic, 1.0);
    assert_eq!(sample.total, sample.kinetic + sample.potential);
    assert!(sample.total < sample.kinetic);
}
